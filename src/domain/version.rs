use crate::error::{ChangelogError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Semantic version parsed from a tag name
///
/// Ordering follows semver precedence: build metadata is ignored and a
/// prerelease sorts below the same version without one.
#[derive(Debug, Clone)]
pub struct Version(semver::Version);

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version(semver::Version::new(major, minor, patch))
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// Accepts an optional `v`/`V` prefix and coerces a missing minor or patch
    /// component to zero, so "v2" and "2.1" are valid tags.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let clean_tag = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let split_at = clean_tag.find(['-', '+']).unwrap_or(clean_tag.len());
        let (core, suffix) = clean_tag.split_at(split_at);

        let parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(ChangelogError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                tag
            )));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(ChangelogError::version(format!(
                    "Invalid version component '{}' in '{}'",
                    part, tag
                )));
            }
            *slot = part.parse::<u64>().map_err(|_| {
                ChangelogError::version(format!("Version component out of range: {}", part))
            })?;
        }

        let normalized = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], suffix);
        semver::Version::parse(&normalized)
            .map(Version)
            .map_err(|e| ChangelogError::version(format!("Invalid version '{}': {}", tag, e)))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// Bump version according to bump type
    ///
    /// A patch bump on a prerelease only drops the prerelease: `1.2.3-rc.1`
    /// becomes `1.2.3`. Build metadata is always dropped.
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        let mut next = semver::Version::new(self.0.major, self.0.minor, self.0.patch);
        match bump_type {
            VersionBump::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
            VersionBump::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            VersionBump::Patch => {
                if !self.is_prerelease() {
                    next.patch += 1;
                }
            }
        }
        Version(next)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .major
            .cmp(&other.0.major)
            .then_with(|| self.0.minor.cmp(&other.0.minor))
            .then_with(|| self.0.patch.cmp(&other.0.patch))
            .then_with(|| self.0.pre.cmp(&other.0.pre))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
