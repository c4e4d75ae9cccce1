//! Footer HTML rendering
//!
//! Renders the flyout fragment returned in the `html` field of the footer
//! endpoint: version selector, downloads and edit-on-VCS links.
//!
//! # Modules
//!
//! - [`links`]: edit/view URL construction per VCS host

pub mod links;

use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;
use crate::render::links::{EditLinks, edit_links};
use crate::store::models::{DocumentationType, Project, Version};
use crate::version::compare::sort_versions;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Footer template renderer with the embedded flyout template registered.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("footer", include_str!("../../templates/footer.hbs"))?;
        Ok(Self { handlebars })
    }

    pub fn render_footer(&self, context: &FooterContext) -> Result<String, RenderError> {
        debug!(
            "Rendering footer for {}:{}",
            context.project_slug, context.current_version
        );
        Ok(self.handlebars.render("footer", context)?)
    }
}

/// One row of the flyout version list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionEntry {
    pub slug: String,
    pub url: String,
    /// The version the reader is currently on
    pub current: bool,
}

/// Everything the flyout template needs, assembled per request
#[derive(Debug, Clone, Serialize)]
pub struct FooterContext {
    pub project_name: String,
    pub project_slug: String,
    pub language: String,
    /// Slug of the version being served
    pub current_version: String,
    pub current_version_label: String,
    /// Page path under the version root, empty for the index page
    pub path: String,
    /// Whether the requesting theme embeds the flyout itself
    pub new_theme: bool,
    pub versions: Vec<VersionEntry>,
    /// Download format name -> URL, in display order
    pub downloads: IndexMap<String, String>,
    #[serde(flatten)]
    pub edit: EditLinks,
}

/// Request-scoped inputs for [`build_footer_context`]
pub struct FooterContextParams<'a> {
    pub project: &'a Project,
    pub version: &'a Version,
    /// Versions shown in the flyout, unsorted
    pub listed_versions: Vec<Version>,
    pub page: &'a str,
    pub theme: Option<&'a str>,
    pub docroot: &'a str,
    pub source_suffix: &'a str,
}

pub fn build_footer_context(
    settings: &Settings,
    params: FooterContextParams<'_>,
) -> FooterContext {
    let FooterContextParams {
        project,
        version,
        listed_versions,
        page,
        theme,
        docroot,
        source_suffix,
    } = params;

    let base = settings.docs_base_url.trim_end_matches('/');

    let versions = sort_versions(listed_versions)
        .into_iter()
        .map(|v| VersionEntry {
            url: format!("{}{}", base, project.docs_path(&v.slug)),
            current: v.slug == version.slug,
            slug: v.slug,
        })
        .collect();

    let mut downloads = IndexMap::new();
    if version.has_pdf {
        downloads.insert("PDF".to_string(), download_url(base, project, version, "pdf"));
    }
    if version.has_htmlzip {
        downloads.insert(
            "HTML".to_string(),
            download_url(base, project, version, "htmlzip"),
        );
    }
    if version.has_epub {
        downloads.insert(
            "Epub".to_string(),
            download_url(base, project, version, "epub"),
        );
    }

    FooterContext {
        project_name: project.name.clone(),
        project_slug: project.slug.clone(),
        language: project.language.clone(),
        current_version: version.slug.clone(),
        current_version_label: version.verbose_name.clone(),
        path: page_path(version.documentation_type, page),
        new_theme: theme == Some("sphinx_rtd_theme"),
        versions,
        downloads,
        edit: edit_links(
            project.repo_url.as_deref(),
            &version.verbose_name,
            docroot,
            page,
            source_suffix,
        ),
    }
}

fn download_url(base: &str, project: &Project, version: &Version, format: &str) -> String {
    format!(
        "{}/projects/{}/downloads/{}/{}/",
        base, project.slug, format, version.slug
    )
}

/// Path of a page under its version root.
///
/// The index page maps to the version root. Directory-URL builds strip a
/// trailing "/index" and end in a slash; everything else gets ".html".
pub fn page_path(documentation_type: DocumentationType, page: &str) -> String {
    if page.is_empty() || page == "index" {
        return String::new();
    }
    if documentation_type.uses_directory_urls() {
        format!("{}/", page.strip_suffix("/index").unwrap_or(page))
    } else {
        format!("{page}.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{PrivacyLevel, VersionType};
    use rstest::rstest;

    fn project() -> Project {
        Project {
            id: 1,
            slug: "demo".to_string(),
            name: "Demo".to_string(),
            language: "en".to_string(),
            repo_url: Some("https://github.com/acme/demo".to_string()),
            show_version_warning: true,
        }
    }

    fn version(slug: &str, verbose_name: &str) -> Version {
        Version {
            id: 0,
            project_id: 1,
            slug: slug.to_string(),
            verbose_name: verbose_name.to_string(),
            version_type: VersionType::Tag,
            privacy_level: PrivacyLevel::Public,
            documentation_type: DocumentationType::Sphinx,
            built: true,
            active: true,
            hidden: false,
            has_pdf: false,
            has_epub: false,
            has_htmlzip: false,
        }
    }

    #[rstest]
    #[case(DocumentationType::Sphinx, "", "")]
    #[case(DocumentationType::Sphinx, "index", "")]
    #[case(DocumentationType::Sphinx, "guide/install", "guide/install.html")]
    #[case(DocumentationType::SphinxHtmlDir, "guide/install", "guide/install/")]
    #[case(DocumentationType::SphinxHtmlDir, "guide/index", "guide/")]
    #[case(DocumentationType::Mkdocs, "guide/index", "guide/")]
    #[case(DocumentationType::Mkdocs, "index", "")]
    fn page_path_follows_layout_rules(
        #[case] documentation_type: DocumentationType,
        #[case] page: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(page_path(documentation_type, page), expected);
    }

    #[test]
    fn build_footer_context_sorts_versions_and_marks_current() {
        let current = version("1.0", "1.0");
        let context = build_footer_context(
            &Settings::default(),
            FooterContextParams {
                project: &project(),
                version: &current,
                listed_versions: vec![version("1.0", "1.0"), version("2.0", "2.0")],
                page: "index",
                theme: None,
                docroot: "docs",
                source_suffix: ".rst",
            },
        );

        assert_eq!(
            context.versions,
            vec![
                VersionEntry {
                    slug: "2.0".to_string(),
                    url: "/docs/demo/en/2.0/".to_string(),
                    current: false,
                },
                VersionEntry {
                    slug: "1.0".to_string(),
                    url: "/docs/demo/en/1.0/".to_string(),
                    current: true,
                },
            ]
        );
        assert!(!context.new_theme);
        assert!(context.downloads.is_empty());
    }

    #[test]
    fn build_footer_context_collects_downloads_in_display_order() {
        let mut current = version("2.0", "2.0");
        current.has_pdf = true;
        current.has_epub = true;

        let mut settings = Settings::default();
        settings.docs_base_url = "https://docs.example.com/".to_string();

        let context = build_footer_context(
            &settings,
            FooterContextParams {
                project: &project(),
                version: &current,
                listed_versions: vec![],
                page: "",
                theme: Some("sphinx_rtd_theme"),
                docroot: "",
                source_suffix: ".rst",
            },
        );

        let entries: Vec<(&str, &str)> = context
            .downloads
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (
                    "PDF",
                    "https://docs.example.com/projects/demo/downloads/pdf/2.0/"
                ),
                (
                    "Epub",
                    "https://docs.example.com/projects/demo/downloads/epub/2.0/"
                ),
            ]
        );
        assert!(context.new_theme);
    }

    #[test]
    fn render_footer_produces_version_list_markup() {
        let renderer = Renderer::new().unwrap();
        let current = version("1.0", "1.0");
        let context = build_footer_context(
            &Settings::default(),
            FooterContextParams {
                project: &project(),
                version: &current,
                listed_versions: vec![version("1.0", "1.0"), version("2.0", "2.0")],
                page: "usage",
                theme: None,
                docroot: "docs",
                source_suffix: ".rst",
            },
        );

        let html = renderer.render_footer(&context).unwrap();

        assert!(html.contains(r#"<a href="/docs/demo/en/2.0/">2.0</a>"#));
        assert!(html.contains("current-item"));
        assert!(html.contains("https://github.com/acme/demo/edit/1.0/docs/usage.rst"));
        assert!(!html.contains("Downloads"));
    }
}
