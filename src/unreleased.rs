//! Heading for commits that are not yet tagged

use crate::domain::{Version, VersionBump};
use crate::error::{ChangelogError, Result};
use crate::warning::ChangelogWarning;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// Label used when no increment or explicit version is requested
pub const DEFAULT_UNRELEASED_TAG: &str = "unreleased";

/// Inputs deciding how the unreleased section is labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreleasedOptions {
    pub inc_major: bool,
    pub inc_minor: bool,
    pub inc_patch: bool,
    /// Explicit version for the unreleased section, or the default label
    pub tag: String,
}

impl Default for UnreleasedOptions {
    fn default() -> Self {
        UnreleasedOptions {
            inc_major: false,
            inc_minor: false,
            inc_patch: false,
            tag: DEFAULT_UNRELEASED_TAG.to_string(),
        }
    }
}

/// Resolved heading of the unreleased section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreleasedHeading {
    /// A concrete next version, dated today
    Version { version: Version, date: NaiveDate },
    /// A plain label with no date
    Label(String),
}

impl fmt::Display for UnreleasedHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreleasedHeading::Version { version, date } => {
                write!(f, "## [{}] - {}", version, date.format("%Y-%m-%d"))
            }
            UnreleasedHeading::Label(label) => write!(f, "## [{}]", label),
        }
    }
}

/// Outcome of [resolve_unreleased]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub heading: UnreleasedHeading,
    pub warnings: Vec<ChangelogWarning>,
}

/// Decide the unreleased heading
///
/// Priority: major increment, minor increment, patch increment, explicit
/// version tag, default label. Increments need a `latest` release to bump
/// from and are ignored without one. An explicit tag that is not the default
/// label must parse as a version; one at or below `latest` is used anyway
/// with a warning.
pub fn resolve_unreleased(
    latest: Option<&Version>,
    options: &UnreleasedOptions,
    today: NaiveDate,
) -> Result<Resolution> {
    let bump = if options.inc_major {
        Some(VersionBump::Major)
    } else if options.inc_minor {
        Some(VersionBump::Minor)
    } else if options.inc_patch {
        Some(VersionBump::Patch)
    } else {
        None
    };

    if let (Some(bump), Some(latest)) = (bump, latest) {
        return Ok(Resolution {
            heading: UnreleasedHeading::Version {
                version: latest.bump(bump),
                date: today,
            },
            warnings: Vec::new(),
        });
    }

    if options.tag == DEFAULT_UNRELEASED_TAG {
        return Ok(Resolution {
            heading: UnreleasedHeading::Label(options.tag.clone()),
            warnings: Vec::new(),
        });
    }

    let version = Version::parse(&options.tag).map_err(|e| {
        ChangelogError::version(format!(
            "Unreleased tag '{}' is not a valid version: {}",
            options.tag, e
        ))
    })?;

    let mut warnings = Vec::new();
    if let Some(latest) = latest {
        match version.cmp(latest) {
            Ordering::Less => warnings.push(ChangelogWarning::UnreleasedTagLower {
                tag: version.to_string(),
                latest: latest.to_string(),
            }),
            Ordering::Equal => warnings.push(ChangelogWarning::UnreleasedTagExists {
                tag: version.to_string(),
            }),
            Ordering::Greater => {}
        }
    }

    Ok(Resolution {
        heading: UnreleasedHeading::Version {
            version,
            date: today,
        },
        warnings,
    })
}
