//! Version comparison layer
//!
//! Determines the highest publicly-visible built version of a project and
//! whether the version a reader is looking at is at least as new.
//!
//! # Modules
//!
//! - [`compare`]: failsafe semver parsing and the highest-version computation

pub mod compare;

pub use compare::{VersionCompareData, get_version_compare_data, parse_version_failsafe};
