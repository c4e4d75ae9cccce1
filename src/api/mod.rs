//! HTTP API layer
//!
//! One endpoint: `GET /api/v2/footer_html/`, returning the rendered flyout
//! HTML plus version metadata as JSON.
//!
//! # Modules
//!
//! - [`footer`]: query parsing and footer response assembly
//! - [`server`]: hyper server setup and routing
//! - [`error`]: API error to HTTP status mapping

pub mod error;
pub mod footer;
pub mod server;
