//! footer-api: documentation-hosting footer/flyout HTML API
//!
//! Serves `GET /api/v2/footer_html/`: an HTML fragment with version
//! selection, downloads and edit links for a project/version, plus metadata
//! telling the embedding page whether the reader is on an outdated version.
//!
//! # Layers
//!
//! - [`store`]: SQLite project/version registry
//! - [`version`]: highest-version computation
//! - [`render`]: flyout HTML rendering
//! - [`api`]: HTTP endpoint
//! - [`config`]: settings and data paths

pub mod api;
pub mod config;
pub mod render;
pub mod store;
pub mod version;
