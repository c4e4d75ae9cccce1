//! The footer endpoint: query parsing and response assembly

use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::api::error::ApiError;
use crate::config::{DEFAULT_SOURCE_SUFFIX, LATEST, Settings};
use crate::render::{FooterContextParams, Renderer, build_footer_context};
use crate::store::ProjectStore;
use crate::version::compare::{VersionCompareData, get_version_compare_data};

/// Query parameters of `GET /api/v2/footer_html/`
#[derive(Debug, Clone, PartialEq)]
pub struct FooterQuery {
    /// Project slug; a missing parameter resolves to nothing
    pub project: Option<String>,
    /// Version slug; present-but-empty is coerced to "latest"
    pub version: Option<String>,
    /// Source page identifier, used for edit links
    pub page: String,
    /// Requesting theme identifier
    pub theme: Option<String>,
    /// Source document root, used for edit links
    pub docroot: String,
    /// Source file suffix, used for edit links
    pub source_suffix: String,
}

impl FooterQuery {
    /// Parse a raw (percent-encoded) query string.
    pub fn from_query(query: &str) -> Self {
        let mut parsed = Self {
            project: None,
            version: None,
            page: String::new(),
            theme: None,
            docroot: String::new(),
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "project" => parsed.project = Some(value.into_owned()),
                "version" => parsed.version = Some(value.into_owned()),
                "page" => parsed.page = value.into_owned(),
                "theme" => parsed.theme = Some(value.into_owned()),
                "docroot" => parsed.docroot = value.into_owned(),
                "source_suffix" => parsed.source_suffix = value.into_owned(),
                _ => {}
            }
        }

        // Integrations deployed with a missing version slug send version=""
        if parsed.version.as_deref() == Some("") {
            parsed.version = Some(LATEST.to_string());
        }

        parsed
    }
}

/// Response body of the footer endpoint
#[derive(Debug, Serialize)]
pub struct FooterResponse {
    pub html: String,
    pub show_version_warning: bool,
    pub version_active: bool,
    pub version_compare: VersionCompareData,
    pub version_supported: bool,
}

/// Render and return footer markup for one project/version.
///
/// The project and version are each resolved exactly once here; everything
/// downstream borrows the resolved records.
pub fn footer_html<S: ProjectStore>(
    store: &S,
    renderer: &Renderer,
    settings: &Settings,
    query: &FooterQuery,
) -> Result<FooterResponse, ApiError> {
    let project_slug = query.project.as_deref().ok_or(ApiError::NotFound)?;
    let project = store
        .project_by_slug(project_slug)?
        .ok_or(ApiError::NotFound)?;

    let version_slug = query.version.as_deref().ok_or(ApiError::NotFound)?;
    let version = store
        .version_by_slug(project.id, version_slug)?
        .ok_or(ApiError::NotFound)?;

    debug!(
        "Serving footer for {}:{} (page {:?})",
        project.slug, version.slug, query.page
    );

    let version_compare = get_version_compare_data(store, &project, Some(&version))?;

    let listed_versions = store.listed_versions(project.id)?;
    let context = build_footer_context(
        settings,
        FooterContextParams {
            project: &project,
            version: &version,
            listed_versions,
            page: &query.page,
            theme: query.theme.as_deref(),
            docroot: &query.docroot,
            source_suffix: &query.source_suffix,
        },
    );
    let html = renderer.render_footer(&context)?;

    let show_version_warning = project.show_version_warning && !version.is_external();

    Ok(FooterResponse {
        html,
        show_version_warning,
        version_active: version.active,
        version_compare,
        version_supported: version.supported(),
    })
}
