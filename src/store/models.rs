//! Registry records for projects and their documentation versions

use serde::{Deserialize, Serialize};

/// Kind of VCS ref a version was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// Repository branch (e.g. "main", "stable")
    Branch,
    /// Repository tag (e.g. "v2.0")
    Tag,
    /// External contribution build (e.g. a pull request)
    External,
    /// Ref kind not recorded by the build pipeline
    Unknown,
}

impl VersionType {
    /// Returns the string representation of the version type
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Branch => "branch",
            VersionType::Tag => "tag",
            VersionType::External => "external",
            VersionType::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for VersionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "branch" => Ok(VersionType::Branch),
            "tag" => Ok(VersionType::Tag),
            "external" => Ok(VersionType::External),
            "unknown" => Ok(VersionType::Unknown),
            _ => Err(()),
        }
    }
}

/// Visibility of a version to anonymous readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    Public,
    Private,
}

impl PrivacyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "public",
            PrivacyLevel::Private => "private",
        }
    }
}

impl std::str::FromStr for PrivacyLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(PrivacyLevel::Public),
            "private" => Ok(PrivacyLevel::Private),
            _ => Err(()),
        }
    }
}

/// Build tool that produced the documentation, drives page path layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationType {
    /// Sphinx with per-page `.html` files
    Sphinx,
    /// Sphinx with directory-per-page layout
    #[serde(rename = "sphinx_htmldir")]
    SphinxHtmlDir,
    /// MkDocs (directory-per-page)
    Mkdocs,
}

impl DocumentationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentationType::Sphinx => "sphinx",
            DocumentationType::SphinxHtmlDir => "sphinx_htmldir",
            DocumentationType::Mkdocs => "mkdocs",
        }
    }

    /// Whether pages are laid out as directories (`page/` instead of `page.html`)
    pub fn uses_directory_urls(&self) -> bool {
        matches!(
            self,
            DocumentationType::SphinxHtmlDir | DocumentationType::Mkdocs
        )
    }
}

impl std::str::FromStr for DocumentationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sphinx" => Ok(DocumentationType::Sphinx),
            "sphinx_htmldir" => Ok(DocumentationType::SphinxHtmlDir),
            "mkdocs" => Ok(DocumentationType::Mkdocs),
            _ => Err(()),
        }
    }
}

/// A documentation project
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub name: String,
    /// Language code of the documentation (e.g. "en")
    pub language: String,
    /// Browsable repository URL, used to build edit links
    pub repo_url: Option<String>,
    /// Whether outdated-version warnings are ever computed for this project
    pub show_version_warning: bool,
}

impl Project {
    /// Canonical documentation path for one of this project's versions.
    /// Never points at the dashboard; readers may not have access to it.
    pub fn docs_path(&self, version_slug: &str) -> String {
        format!("/docs/{}/{}/{}/", self.slug, self.language, version_slug)
    }
}

/// A buildable unit of documentation, either a VCS tag or branch
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub id: i64,
    pub project_id: i64,
    /// URL-safe identifier, unique per project ("latest" is reserved)
    pub slug: String,
    /// Human-readable ref name, the input to version comparison (e.g. "v2.0")
    pub verbose_name: String,
    pub version_type: VersionType,
    pub privacy_level: PrivacyLevel,
    pub documentation_type: DocumentationType,
    /// A successful build exists
    pub built: bool,
    /// Enabled by the project maintainers
    pub active: bool,
    /// Excluded from the flyout version list
    pub hidden: bool,
    pub has_pdf: bool,
    pub has_epub: bool,
    pub has_htmlzip: bool,
}

impl Version {
    /// Whether this version was built from an external contribution (e.g. a PR).
    pub fn is_external(&self) -> bool {
        self.version_type == VersionType::External
    }

    /// Internal versions are everything not built from an external contribution.
    pub fn is_internal(&self) -> bool {
        !self.is_external()
    }

    pub fn is_public(&self) -> bool {
        self.privacy_level == PrivacyLevel::Public
    }

    /// Whether the hosting platform still supports this version.
    /// External builds are never supported; internal ones are while active.
    pub fn supported(&self) -> bool {
        self.active && self.is_internal()
    }
}
