use std::fmt;

/// Non-fatal conditions found while assembling a changelog.
/// These do not stop generation but should be reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogWarning {
    /// Release tag points at a commit outside the current branch history
    TagNotAncestor { tag: String },
    /// Explicit unreleased tag sorts below the latest release
    UnreleasedTagLower { tag: String, latest: String },
    /// Explicit unreleased tag equals the latest release
    UnreleasedTagExists { tag: String },
}

impl fmt::Display for ChangelogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangelogWarning::TagNotAncestor { tag } => {
                write!(
                    f,
                    "Tag '{}' is not an ancestor of the current branch tip, skipping",
                    tag
                )
            }
            ChangelogWarning::UnreleasedTagLower { tag, latest } => {
                write!(
                    f,
                    "Unreleased tag \"{}\" is lower than existing tag \"{}\" in the repository.",
                    tag, latest
                )
            }
            ChangelogWarning::UnreleasedTagExists { tag } => {
                write!(
                    f,
                    "Unreleased tag \"{}\" already exists in the repository.",
                    tag
                )
            }
        }
    }
}
