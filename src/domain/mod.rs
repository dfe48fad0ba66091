//! Domain logic - pure types independent of git operations

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::CommitInfo;
pub use tag::{ReleaseTag, TagRef};
pub use version::{Version, VersionBump};
