use super::version::Version;
use git2::Oid;

/// A tag reference as enumerated from the repository
///
/// `target` is the object the reference points at: a commit for lightweight
/// tags, a tag object for annotated ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
}

impl TagRef {
    /// Create a new tag reference
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        TagRef {
            name: name.into(),
            target,
        }
    }
}

/// A tag whose name parses as a semantic version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub target: Oid,
    pub version: Version,
}

impl ReleaseTag {
    /// Interpret a tag reference as a release, if its name is a version
    pub fn from_ref(tag: &TagRef) -> Option<Self> {
        let version = Version::parse(&tag.name).ok()?;
        Some(ReleaseTag {
            name: tag.name.clone(),
            target: tag.target,
            version,
        })
    }
}
