//! Project/version registry layer
//!
//! The registry is the system-of-record the footer endpoint reads from.
//!
//! # Modules
//!
//! - [`models`]: `Project` and `Version` records plus their enums
//! - [`sqlite`]: SQLite-backed [`ProjectStore`] implementation
//! - [`import`]: JSON fixture seeding for the `import` subcommand
//! - [`error`]: Registry error types

pub mod error;
pub mod import;
pub mod models;
pub mod sqlite;

#[cfg(test)]
use mockall::automock;

use crate::store::error::StoreError;
use crate::store::models::{Project, Version};

/// Read-only view of the project/version registry
///
/// The footer endpoint and the version-compare evaluator only ever read;
/// write paths live on the concrete store.
#[cfg_attr(test, automock)]
pub trait ProjectStore: Send + Sync + 'static {
    /// Look up a project by its slug
    fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError>;

    /// Look up a version by slug within a project, case-insensitively
    fn version_by_slug(&self, project_id: i64, slug: &str)
    -> Result<Option<Version>, StoreError>;

    /// Versions eligible for the highest-version computation:
    /// internal, public, built and active. Ordered by slug.
    fn eligible_versions(&self, project_id: i64) -> Result<Vec<Version>, StoreError>;

    /// Versions shown in the flyout list: internal, public, active and not
    /// hidden. Ordered by slug.
    fn listed_versions(&self, project_id: i64) -> Result<Vec<Version>, StoreError>;
}
