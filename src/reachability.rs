//! Commit graph reachability
//!
//! All queries walk parent edges breadth-first from a starting commit,
//! keeping a visited set keyed by hash so history shared through merges is
//! visited once.

use crate::domain::CommitInfo;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Check whether `candidate` is `descendant` or one of its ancestors
///
/// Stops as soon as `candidate` is dequeued. A commit that cannot be read
/// aborts the walk with an error.
pub fn ancestor_of<R: Repository>(repo: &R, candidate: Oid, descendant: Oid) -> Result<bool> {
    if candidate == descendant {
        return Ok(true);
    }

    let mut visited = HashSet::from([descendant]);
    let mut queue = VecDeque::from([descendant]);

    while let Some(oid) = queue.pop_front() {
        if oid == candidate {
            return Ok(true);
        }
        let commit = repo.find_commit(oid)?;
        for parent in commit.parents {
            if visited.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    Ok(false)
}

/// Collect every commit reachable from `start`, including `start` itself
pub fn reachable_from<R: Repository>(repo: &R, start: Oid) -> Result<HashSet<Oid>> {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(oid) = queue.pop_front() {
        let commit = repo.find_commit(oid)?;
        for parent in commit.parents {
            if visited.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    Ok(visited)
}

/// Commits reachable from `until` but not from `older`, newest first
///
/// Commits are returned in breadth-first order from `until`, each emitted the
/// first time it is visited. With no `older` boundary the whole history of
/// `until` is returned.
pub fn commits_in_range<R: Repository>(
    repo: &R,
    older: Option<Oid>,
    until: Oid,
) -> Result<Vec<CommitInfo>> {
    let excluded = match older {
        Some(oid) => reachable_from(repo, oid)?,
        None => HashSet::new(),
    };

    let mut commits = Vec::new();
    if excluded.contains(&until) {
        return Ok(commits);
    }

    let mut visited = HashSet::from([until]);
    let mut queue = VecDeque::from([until]);

    while let Some(oid) = queue.pop_front() {
        let commit = repo.find_commit(oid)?;
        for parent in &commit.parents {
            // every ancestor of an excluded commit is excluded too
            if !excluded.contains(parent) && visited.insert(*parent) {
                queue.push_back(*parent);
            }
        }
        commits.push(commit);
    }

    debug!(
        until = %until,
        older = ?older,
        excluded = excluded.len(),
        count = commits.len(),
        "computed commit range"
    );
    Ok(commits)
}
