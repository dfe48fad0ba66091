use crate::domain::{CommitInfo, TagRef};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::Oid;
use std::collections::HashMap;

/// Mock repository holding an in-memory commit graph
///
/// Commits are addressed by hash in an arena; parent links are plain hash
/// lists. Tags may point straight at a commit or at an annotated tag object
/// registered with [MockRepository::add_annotated_tag].
pub struct MockRepository {
    commits: HashMap<Oid, CommitInfo>,
    tags: Vec<TagRef>,
    tag_objects: HashMap<Oid, Oid>,
    head: Option<Oid>,
}

/// Build a deterministic hash from a small integer id
pub fn mock_oid(id: u32) -> Oid {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&id.to_be_bytes());
    Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
}

/// Author time used for mock commits: one day per id, in UTC
fn mock_time(id: u32) -> DateTime<FixedOffset> {
    let seconds = 1_700_000_000 + i64::from(id) * 86_400;
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_default().into()
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: Vec::new(),
            tag_objects: HashMap::new(),
            head: None,
        }
    }

    /// Add a commit to the mock repository
    pub fn add_commit(&mut self, info: CommitInfo) {
        self.commits.insert(info.hash, info);
    }

    /// Add a commit identified by `id` with the given parent ids and message
    ///
    /// Returns the commit hash. The branch tip moves to the new commit.
    pub fn commit(&mut self, id: u32, parents: &[u32], message: &str) -> Oid {
        let hash = mock_oid(id);
        self.add_commit(CommitInfo {
            hash,
            parents: parents.iter().map(|p| mock_oid(*p)).collect(),
            message: message.to_string(),
            authored: mock_time(id),
        });
        self.head = Some(hash);
        hash
    }

    /// Add a lightweight tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid) {
        self.tags.push(TagRef::new(name, commit));
    }

    /// Add an annotated tag: a tag object `object` that dereferences to `commit`
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, object: Oid, commit: Oid) {
        self.tag_objects.insert(object, commit);
        self.tags.push(TagRef::new(name, object));
    }

    /// Set the branch tip
    pub fn set_head(&mut self, oid: Oid) {
        self.head = Some(oid);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn find_commit(&self, oid: Oid) -> Result<CommitInfo> {
        self.commits
            .get(&oid)
            .cloned()
            .ok_or_else(|| ChangelogError::commit(format!("{}: commit not found", oid)))
    }

    fn head_oid(&self) -> Result<Oid> {
        self.head
            .ok_or_else(|| ChangelogError::repository("Cannot resolve HEAD: no commits"))
    }

    fn peel_to_commit(&self, target: Oid) -> Result<Oid> {
        if self.commits.contains_key(&target) {
            return Ok(target);
        }
        match self.tag_objects.get(&target) {
            Some(commit) if self.commits.contains_key(commit) => Ok(*commit),
            _ => Err(ChangelogError::tag(format!(
                "Cannot retrieve commit from tag {}",
                target
            ))),
        }
    }
}
