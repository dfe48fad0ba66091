//! Release tag discovery and branch filtering

use crate::domain::{ReleaseTag, TagRef};
use crate::error::Result;
use crate::git::Repository;
use crate::reachability::ancestor_of;
use crate::warning::ChangelogWarning;
use git2::Oid;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A release tag resolved to the commit it marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: ReleaseTag,
    pub commit: Oid,
}

/// Releases reachable from the branch tip, oldest first
#[derive(Debug, Clone, Default)]
pub struct ReleaseSet {
    pub releases: Vec<Release>,
    pub warnings: Vec<ChangelogWarning>,
}

impl ReleaseSet {
    /// Most recent release by version
    pub fn latest(&self) -> Option<&Release> {
        self.releases.last()
    }
}

/// Keep the tags whose names are versions, sorted ascending by version
///
/// Tags that are not versions are dropped silently. When two tags normalise
/// to the same version string the later one in enumeration order is kept.
pub fn collect_release_tags(tags: &[TagRef]) -> Vec<ReleaseTag> {
    let mut releases: Vec<ReleaseTag> = Vec::new();
    let mut by_version: HashMap<String, usize> = HashMap::new();

    for tag in tags {
        let Some(release) = ReleaseTag::from_ref(tag) else {
            debug!(tag = %tag.name, "ignoring non-version tag");
            continue;
        };
        let key = release.version.to_string();
        match by_version.get(&key) {
            Some(&index) => releases[index] = release,
            None => {
                by_version.insert(key, releases.len());
                releases.push(release);
            }
        }
    }

    releases.sort_by(|a, b| a.version.cmp(&b.version));
    releases
}

/// Keep only releases whose commit is an ancestor of (or equal to) `tip`
///
/// Each tag target is resolved to a commit first; failing to resolve one is
/// fatal. Tags from diverged release lines are dropped with a warning.
pub fn filter_reachable_tags<R: Repository>(
    repo: &R,
    tags: Vec<ReleaseTag>,
    tip: Oid,
) -> Result<ReleaseSet> {
    let mut set = ReleaseSet::default();

    for tag in tags {
        let commit = repo.peel_to_commit(tag.target)?;
        if ancestor_of(repo, commit, tip)? {
            set.releases.push(Release { tag, commit });
        } else {
            let warning = ChangelogWarning::TagNotAncestor {
                tag: tag.name.clone(),
            };
            warn!("{}", warning);
            set.warnings.push(warning);
        }
    }

    debug!(count = set.releases.len(), "release tags on branch");
    Ok(set)
}

/// Enumerate, parse, sort and filter the repository's release tags
pub fn discover_releases<R: Repository>(repo: &R, tip: Oid) -> Result<ReleaseSet> {
    let tags = repo.list_tags()?;
    let candidates = collect_release_tags(&tags);
    filter_reachable_tags(repo, candidates, tip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::git::mock::{mock_oid, MockRepository};

    fn names(tags: &[ReleaseTag]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_collect_sorts_by_version_not_declaration() {
        let tags = vec![
            TagRef::new("v1.10.0", mock_oid(3)),
            TagRef::new("v1.2.0", mock_oid(2)),
            TagRef::new("nightly", mock_oid(4)),
            TagRef::new("v0.9.0", mock_oid(1)),
        ];
        let collected = collect_release_tags(&tags);
        assert_eq!(names(&collected), vec!["v0.9.0", "v1.2.0", "v1.10.0"]);
    }

    #[test]
    fn test_collect_is_independent_of_input_order() {
        let mut tags = vec![
            TagRef::new("v2.0.0", mock_oid(3)),
            TagRef::new("v1.0.0", mock_oid(1)),
            TagRef::new("v1.5.0", mock_oid(2)),
        ];
        let forward = collect_release_tags(&tags);
        tags.reverse();
        let backward = collect_release_tags(&tags);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_collect_duplicate_version_keeps_later_tag() {
        let tags = vec![
            TagRef::new("v1.0.0", mock_oid(1)),
            TagRef::new("1.0.0", mock_oid(2)),
        ];
        let collected = collect_release_tags(&tags);
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].name, "1.0.0");
        assert_eq!(collected[0].version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_filter_drops_diverged_tag_with_warning() {
        let mut repo = MockRepository::new();
        repo.commit(1, &[], "feat: root");
        let old_line = repo.commit(2, &[1], "fix: on old branch");
        let release = repo.commit(3, &[1], "feat: main line");
        let tip = repo.commit(4, &[3], "fix: after release");
        repo.add_tag("v1.0.0", old_line);
        repo.add_tag("v1.1.0", release);

        let candidates = collect_release_tags(&repo.list_tags().unwrap());
        let set = filter_reachable_tags(&repo, candidates, tip).unwrap();

        assert_eq!(set.releases.len(), 1);
        assert_eq!(set.releases[0].tag.name, "v1.1.0");
        assert_eq!(
            set.warnings,
            vec![ChangelogWarning::TagNotAncestor {
                tag: "v1.0.0".to_string()
            }]
        );
    }

    #[test]
    fn test_filter_keeps_tag_on_tip() {
        let mut repo = MockRepository::new();
        let tip = repo.commit(1, &[], "feat: root");
        repo.add_tag("v0.1.0", tip);

        let set = discover_releases(&repo, tip).unwrap();
        assert_eq!(set.latest().map(|r| r.commit), Some(tip));
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn test_filter_resolves_annotated_tag() {
        let mut repo = MockRepository::new();
        let root = repo.commit(1, &[], "feat: root");
        let tip = repo.commit(2, &[1], "fix: next");
        repo.add_annotated_tag("v1.0.0", mock_oid(50), root);

        let set = discover_releases(&repo, tip).unwrap();
        assert_eq!(set.releases[0].commit, root);
        assert_eq!(set.releases[0].tag.target, mock_oid(50));
    }

    #[test]
    fn test_filter_fails_on_unresolvable_tag() {
        let mut repo = MockRepository::new();
        let tip = repo.commit(1, &[], "feat: root");
        repo.add_tag("v1.0.0", mock_oid(77));

        assert!(discover_releases(&repo, tip).is_err());
    }
}
