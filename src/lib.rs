pub mod changelog;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod reachability;
pub mod tags;
pub mod ui;
pub mod unreleased;
pub mod warning;

pub use changelog::{Changelog, ChangelogGenerator, ChangelogOptions};
pub use error::{ChangelogError, Result};
