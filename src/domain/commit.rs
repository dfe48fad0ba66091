use chrono::{DateTime, FixedOffset};
use git2::Oid;

/// A commit as seen by the changelog engine
///
/// Parents are stored as hashes, never as live references, so history is
/// walked by looking each parent up in the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub hash: Oid,
    pub parents: Vec<Oid>,
    pub message: String,
    /// Author time in the author's own UTC offset
    pub authored: DateTime<FixedOffset>,
}

impl CommitInfo {
    /// First line of the commit message
    pub fn title(&self) -> &str {
        let first = self.message.split('\n').next().unwrap_or_default();
        first.strip_suffix('\r').unwrap_or(first)
    }

    /// Author date rendered as `YYYY-MM-DD`
    pub fn release_date(&self) -> String {
        self.authored.format("%Y-%m-%d").to_string()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
