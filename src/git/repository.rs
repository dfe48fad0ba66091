use crate::domain::{CommitInfo, TagRef};
use crate::error::{ChangelogError, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    ///
    /// `path` may be the work tree root or any directory inside it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            ChangelogError::repository(format!(
                "Cannot open repository at '{}': {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

/// Convert a git2 signature time into a zoned timestamp
fn author_time(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    offset.timestamp_opt(time.seconds(), 0).single()
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let mut tags = Vec::new();

        self.repo
            .tag_foreach(|oid, name| {
                let name = String::from_utf8_lossy(name);
                let short = name.trim_start_matches("refs/tags/");
                tags.push(TagRef::new(short, oid));
                true
            })
            .map_err(|e| ChangelogError::tag(format!("Cannot list tags: {}", e)))?;

        Ok(tags)
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| ChangelogError::commit(format!("{}: {}", oid, e.message())))?;

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let when = commit.author().when();
        let authored = author_time(when).ok_or_else(|| {
            ChangelogError::commit(format!(
                "{}: author time {} is out of range",
                oid,
                when.seconds()
            ))
        })?;

        Ok(CommitInfo {
            hash: oid,
            parents: commit.parent_ids().collect(),
            message,
            authored,
        })
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self
            .repo
            .head()
            .map_err(|e| ChangelogError::repository(format!("Cannot resolve HEAD: {}", e)))?;

        let commit = head.peel_to_commit().map_err(|e| {
            ChangelogError::repository(format!("Cannot fetch HEAD commit: {}", e))
        })?;

        Ok(commit.id())
    }

    fn peel_to_commit(&self, target: Oid) -> Result<Oid> {
        if let Ok(commit) = self.repo.find_commit(target) {
            return Ok(commit.id());
        }

        let tag = self.repo.find_tag(target).map_err(|e| {
            ChangelogError::tag(format!(
                "Cannot retrieve commit from tag {}: {}",
                target,
                e.message()
            ))
        })?;

        let commit = self.repo.find_commit(tag.target_id()).map_err(|e| {
            ChangelogError::tag(format!(
                "Cannot retrieve commit from tag object {}: {}",
                target,
                e.message()
            ))
        })?;

        Ok(commit.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    fn commit_file(repo: &Git2Repo, message: &str, parents: &[Oid]) -> Oid {
        let sig = git2::Signature::new(
            "Test User",
            "test@example.com",
            &git2::Time::new(1_700_000_000, 60),
        )
        .unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|p| repo.find_commit(*p).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_open_missing_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = Git2Repository::open(temp_dir.path().join("nowhere")).err();
        assert!(matches!(err, Some(ChangelogError::Repository(_))));
    }

    #[test]
    fn test_find_commit_reads_parents_and_time() {
        let temp_dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp_dir.path()).unwrap();
        let first = commit_file(&raw, "feat: first", &[]);
        let second = commit_file(&raw, "fix: second\n\nbody", &[first]);

        let repo = Git2Repository::from_git2(raw);
        let info = repo.find_commit(second).unwrap();
        assert_eq!(info.parents, vec![first]);
        assert_eq!(info.title(), "fix: second");
        assert_eq!(info.authored.offset().local_minus_utc(), 3600);
        assert_eq!(repo.head_oid().unwrap(), second);
    }

    #[test]
    fn test_peel_annotated_and_lightweight_tags() {
        let temp_dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp_dir.path()).unwrap();
        let first = commit_file(&raw, "feat: first", &[]);
        let sig = raw.signature().unwrap_or_else(|_| {
            git2::Signature::now("Test User", "test@example.com").unwrap()
        });
        let annotated = {
            let object = raw.find_object(first, None).unwrap();
            raw.tag_lightweight("v1.0.0", &object, false).unwrap();
            raw.tag("v1.1.0", &object, &sig, "release", false).unwrap()
        };

        let repo = Git2Repository::from_git2(raw);
        let tags = repo.list_tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&TagRef::new("v1.1.0", annotated)));

        assert_eq!(repo.peel_to_commit(first).unwrap(), first);
        assert_eq!(repo.peel_to_commit(annotated).unwrap(), first);
    }

    #[test]
    fn test_head_of_empty_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(temp_dir.path()).unwrap();
        let repo = Git2Repository::from_git2(raw);
        assert!(matches!(
            repo.head_oid(),
            Err(ChangelogError::Repository(_))
        ));
    }

    #[test]
    fn test_author_time_keeps_offset() {
        let time = author_time(git2::Time::new(1_700_000_000, -300)).unwrap();
        assert_eq!(time.offset().local_minus_utc(), -300 * 60);
        assert_eq!(time.format("%Y-%m-%d").to_string(), "2023-11-14");
    }

    #[test]
    fn test_author_time_out_of_range_is_none() {
        assert_eq!(author_time(git2::Time::new(i64::MAX, 0)), None);
    }
}
