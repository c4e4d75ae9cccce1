//! JSON fixture import for seeding the registry
//!
//! The `import` subcommand reads a file shaped like:
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "slug": "demo",
//!       "name": "Demo",
//!       "repo_url": "https://github.com/acme/demo",
//!       "versions": [
//!         {"slug": "v2.0", "verbose_name": "v2.0", "version_type": "tag",
//!          "built": true, "active": true}
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::store::error::StoreError;
use crate::store::models::{DocumentationType, PrivacyLevel, VersionType};
use crate::store::sqlite::SqliteStore;

#[derive(Debug, Deserialize)]
pub struct ImportFile {
    #[serde(default)]
    pub projects: Vec<ProjectSeed>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSeed {
    pub slug: String,
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default = "default_true")]
    pub show_version_warning: bool,
    #[serde(default)]
    pub versions: Vec<VersionSeed>,
}

#[derive(Debug, Deserialize)]
pub struct VersionSeed {
    pub slug: String,
    pub verbose_name: String,
    #[serde(default = "default_version_type")]
    pub version_type: VersionType,
    #[serde(default = "default_privacy_level")]
    pub privacy_level: PrivacyLevel,
    #[serde(default = "default_documentation_type")]
    pub documentation_type: DocumentationType,
    #[serde(default)]
    pub built: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub has_pdf: bool,
    #[serde(default)]
    pub has_epub: bool,
    #[serde(default)]
    pub has_htmlzip: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_version_type() -> VersionType {
    VersionType::Unknown
}

fn default_privacy_level() -> PrivacyLevel {
    PrivacyLevel::Public
}

fn default_documentation_type() -> DocumentationType {
    DocumentationType::Sphinx
}

/// Parse a fixture file and upsert its contents into the store.
/// Returns the number of (projects, versions) written.
pub fn import_file(store: &SqliteStore, path: &Path) -> anyhow::Result<(usize, usize)> {
    let content = std::fs::read_to_string(path)?;
    let file: ImportFile = serde_json::from_str(&content)?;

    let counts = import_seeds(store, &file.projects)?;
    info!(
        "Imported {} projects and {} versions from {:?}",
        counts.0, counts.1, path
    );
    Ok(counts)
}

/// Upsert parsed seeds into the store.
pub fn import_seeds(
    store: &SqliteStore,
    projects: &[ProjectSeed],
) -> Result<(usize, usize), StoreError> {
    let mut version_count = 0;
    for project in projects {
        let project_id = store.upsert_project(project)?;
        for version in &project.versions {
            store.upsert_version(project_id, version)?;
            version_count += 1;
        }
    }
    Ok((projects.len(), version_count))
}
