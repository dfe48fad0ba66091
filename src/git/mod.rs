//! Git operations abstraction layer
//!
//! The changelog engine only ever reads from a repository. Everything it
//! needs is expressed by the [Repository] trait:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! # Usage
//!
//! Engine code depends on the [Repository] trait rather than on a concrete
//! implementation.
//!
//! ```rust
//! # use taglog::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.head_oid()?;
//! let commit = repo.find_commit(head)?;
//! println!("{}", commit.title());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitInfo, TagRef};
use crate::error::Result;
use git2::Oid;

/// Read-only repository access used by the changelog engine
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// backend failures to the matching [crate::error::ChangelogError] variant;
/// a missing commit during traversal is reported as
/// [crate::error::ChangelogError::Commit].
pub trait Repository {
    /// List every tag reference with the object it points at
    ///
    /// The order is whatever the backend enumerates; callers sort by version.
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Look up a commit by hash
    ///
    /// # Returns
    /// * `Ok(CommitInfo)` - Parents, message and author time of the commit
    /// * `Err` - If the hash is unknown or does not name a commit
    fn find_commit(&self, oid: Oid) -> Result<CommitInfo>;

    /// Hash of the commit at the tip of the current branch
    fn head_oid(&self) -> Result<Oid>;

    /// Resolve a tag target to a commit hash
    ///
    /// Lightweight tags already point at a commit and are returned as-is.
    /// Annotated tags are dereferenced one level to the object they tag,
    /// which must itself be a commit.
    ///
    /// # Example
    /// ```rust
    /// # use taglog::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
    /// for tag in repo.list_tags()? {
    ///     let commit = repo.peel_to_commit(tag.target)?;
    ///     println!("{} -> {}", tag.name, commit);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn peel_to_commit(&self, target: Oid) -> Result<Oid>;
}
