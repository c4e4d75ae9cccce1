//! "Edit on ..." link construction for the VCS hosts we recognize

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Matches browsable repository URLs on the supported hosts, capturing
/// host, owner and repository name (a trailing ".git" is ignored).
static REPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(github\.com|gitlab\.com|bitbucket\.org)/([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("repo url regex")
});

/// Edit/view URLs for the version being served, one set per supported host.
/// Hosts that don't match the project's repository stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditLinks {
    pub github_edit_url: Option<String>,
    pub github_view_url: Option<String>,
    pub gitlab_edit_url: Option<String>,
    pub gitlab_view_url: Option<String>,
    pub bitbucket_url: Option<String>,
}

/// Build edit/view links for a source document.
///
/// `ref_name` is the VCS ref the version was built from, `docroot` the
/// directory holding the documentation sources, `page` the source page
/// identifier and `source_suffix` its file suffix.
pub fn edit_links(
    repo_url: Option<&str>,
    ref_name: &str,
    docroot: &str,
    page: &str,
    source_suffix: &str,
) -> EditLinks {
    let Some(captures) = repo_url.and_then(|u| REPO_RE.captures(u)) else {
        return EditLinks::default();
    };

    let host = &captures[1];
    let owner = &captures[2];
    let repo = &captures[3];
    let file = source_file_path(docroot, page, source_suffix);

    match host {
        "github.com" => EditLinks {
            github_edit_url: Some(format!(
                "https://github.com/{owner}/{repo}/edit/{ref_name}/{file}"
            )),
            github_view_url: Some(format!(
                "https://github.com/{owner}/{repo}/blob/{ref_name}/{file}"
            )),
            ..EditLinks::default()
        },
        "gitlab.com" => EditLinks {
            gitlab_edit_url: Some(format!(
                "https://gitlab.com/{owner}/{repo}/edit/{ref_name}/{file}"
            )),
            gitlab_view_url: Some(format!(
                "https://gitlab.com/{owner}/{repo}/blob/{ref_name}/{file}"
            )),
            ..EditLinks::default()
        },
        "bitbucket.org" => EditLinks {
            bitbucket_url: Some(format!(
                "https://bitbucket.org/{owner}/{repo}/src/{ref_name}/{file}"
            )),
            ..EditLinks::default()
        },
        _ => EditLinks::default(),
    }
}

/// Join docroot, page and suffix into a repository-relative file path.
fn source_file_path(docroot: &str, page: &str, source_suffix: &str) -> String {
    let docroot = docroot.trim_matches('/');
    let page = page.trim_start_matches('/');
    if docroot.is_empty() {
        format!("{page}{source_suffix}")
    } else {
        format!("{docroot}/{page}{source_suffix}")
    }
}
