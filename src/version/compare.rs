//! Highest-version computation for the outdated-docs warning

use serde::Serialize;

use crate::config::LATEST;
use crate::store::ProjectStore;
use crate::store::error::StoreError;
use crate::store::models::{Project, Version, VersionType};

/// Parse a version label into a semver::Version, normalizing common forms.
///
/// Strips a leading 'v'/'V' and pads partial versions with zeros
/// ("1" -> 1.0.0, "1.2" -> 1.2.0). Returns `None` for anything that still
/// fails to parse; malformed labels never produce an error.
pub fn parse_version_failsafe(verbose_name: &str) -> Option<semver::Version> {
    let trimmed = verbose_name.trim();
    let stripped = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    let parts: Vec<&str> = stripped.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => stripped.to_string(),
    };
    semver::Version::parse(&normalized).ok()
}

/// Select the highest version by parsed verbose name.
///
/// Versions whose labels fail the failsafe parse are skipped. When two
/// versions parse to the same comparable, the lexically greatest slug wins.
pub fn highest_version(versions: &[Version]) -> Option<(&Version, semver::Version)> {
    versions
        .iter()
        .filter_map(|v| parse_version_failsafe(&v.verbose_name).map(|c| (v, c)))
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| a.slug.cmp(&b.slug)))
}

/// Sort versions for display, newest first.
///
/// Versions with parseable labels come first in descending order (same slug
/// tie-break as [`highest_version`]); unparseable labels follow, sorted by
/// slug.
pub fn sort_versions(mut versions: Vec<Version>) -> Vec<Version> {
    versions.sort_by(|a, b| {
        let ca = parse_version_failsafe(&a.verbose_name);
        let cb = parse_version_failsafe(&b.verbose_name);
        match (ca, cb) {
            (Some(ca), Some(cb)) => cb.cmp(&ca).then_with(|| b.slug.cmp(&a.slug)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.slug.cmp(&b.slug),
        }
    });
    versions
}

/// Metadata about the highest version available for a project, and whether
/// the version being viewed is at least as new.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionCompareData {
    pub is_highest: bool,
    /// Comparable form of the highest version (e.g. "3.0.0")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Verbose name of the highest version (e.g. "v3.0")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl VersionCompareData {
    fn not_highest() -> Self {
        Self {
            is_highest: false,
            version: None,
            label: None,
            url: None,
            slug: None,
        }
    }
}

/// Retrieve metadata about the highest version available for this project.
///
/// When `base_version` is given, `is_highest` asserts whether it is also the
/// highest version. Warnings are never computed for external builds or when
/// the project has them disabled.
pub fn get_version_compare_data<S: ProjectStore>(
    store: &S,
    project: &Project,
    base_version: Option<&Version>,
) -> Result<VersionCompareData, StoreError> {
    if !project.show_version_warning || base_version.is_some_and(Version::is_external) {
        return Ok(VersionCompareData::not_highest());
    }

    let mut eligible = store.eligible_versions(project.id)?;

    // Take preference over tags only if the project has at least one tag
    if eligible.iter().any(|v| v.version_type == VersionType::Tag) {
        eligible.retain(|v| v.version_type == VersionType::Tag);
    }

    let highest = highest_version(&eligible);

    let mut data = VersionCompareData {
        is_highest: true,
        version: None,
        label: None,
        url: None,
        slug: None,
    };
    if let Some((version, comparable)) = &highest {
        data.version = Some(comparable.to_string());
        data.label = Some(version.verbose_name.clone());
        data.url = Some(project.docs_path(&version.slug));
        data.slug = Some(version.slug.clone());
    }

    if let Some(base) = base_version
        && base.slug != LATEST
        && let Some((_, highest_comparable)) = &highest
        && let Some(base_comparable) = parse_version_failsafe(&base.verbose_name)
    {
        // The only place is_highest can flip. Labels that fail to parse
        // stay "highest" so non-standard version names never warn.
        data.is_highest = base_comparable >= *highest_comparable;
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockProjectStore;
    use crate::store::models::{DocumentationType, PrivacyLevel};
    use rstest::rstest;

    fn project(show_version_warning: bool) -> Project {
        Project {
            id: 7,
            slug: "demo".to_string(),
            name: "Demo".to_string(),
            language: "en".to_string(),
            repo_url: None,
            show_version_warning,
        }
    }

    fn version(slug: &str, verbose_name: &str, version_type: VersionType) -> Version {
        Version {
            id: 0,
            project_id: 7,
            slug: slug.to_string(),
            verbose_name: verbose_name.to_string(),
            version_type,
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

    fn store_with(versions: Vec<Version>) -> MockProjectStore {
        let mut store = MockProjectStore::new();
        store
            .expect_eligible_versions()
            .returning(move |_| Ok(versions.clone()));
        store
    }

    #[rstest]
    #[case("1", Some("1.0.0"))]
    #[case("1.2", Some("1.2.0"))]
    #[case("1.2.3", Some("1.2.3"))]
    #[case("v2.0", Some("2.0.0"))]
    #[case("V3", Some("3.0.0"))]
    #[case("2.0.0-beta.1", Some("2.0.0-beta.1"))]
    #[case("latest", None)]
    #[case("main", None)]
    #[case("garbage-not-semver", None)]
    #[case("", None)]
    fn parse_version_failsafe_normalizes_or_absorbs(
        #[case] input: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = parse_version_failsafe(input);
        assert_eq!(result.map(|v| v.to_string()), expected.map(str::to_string));
    }

    #[test]
    fn evaluate_returns_not_highest_when_warnings_disabled() {
        let store = MockProjectStore::new();
        let base = version("1.0", "1.0", VersionType::Tag);

        let result = get_version_compare_data(&store, &project(false), Some(&base)).unwrap();

        assert_eq!(result, VersionCompareData::not_highest());
    }

    #[test]
    fn evaluate_returns_not_highest_for_external_base_version() {
        let store = MockProjectStore::new();
        let base = version("pr-42", "42", VersionType::External);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert_eq!(result, VersionCompareData::not_highest());
    }

    #[test]
    fn evaluate_reports_highest_branch_version_for_latest_reader() {
        let store = store_with(vec![
            version("1.0", "1.0", VersionType::Branch),
            version("2.0", "2.0", VersionType::Branch),
            version("3.0", "3.0", VersionType::Branch),
        ]);
        let base = version("latest", "latest", VersionType::Branch);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        // Reader is on "latest": the comparison step is skipped entirely
        assert!(result.is_highest);
        assert_eq!(result.label.as_deref(), Some("3.0"));
        assert_eq!(result.version.as_deref(), Some("3.0.0"));
        assert_eq!(result.slug.as_deref(), Some("3.0"));
        assert_eq!(result.url.as_deref(), Some("/docs/demo/en/3.0/"));
    }

    #[test]
    fn evaluate_prefers_tags_when_project_has_any_tag() {
        let store = store_with(vec![
            version("main", "main", VersionType::Branch),
            version("dev", "9.9", VersionType::Branch),
            version("v2.0", "v2.0", VersionType::Tag),
        ]);

        let result = get_version_compare_data(&store, &project(true), None).unwrap();

        assert_eq!(result.slug.as_deref(), Some("v2.0"));
        assert_eq!(result.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn evaluate_flags_outdated_base_version() {
        let store = store_with(vec![
            version("2.0", "2.0", VersionType::Tag),
            version("3.0", "3.0", VersionType::Tag),
        ]);
        let base = version("2.0", "2.0", VersionType::Tag);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert!(!result.is_highest);
        assert_eq!(result.label.as_deref(), Some("3.0"));
    }

    #[test]
    fn evaluate_keeps_highest_for_base_version_equal_to_highest() {
        let store = store_with(vec![
            version("2.0", "2.0", VersionType::Tag),
            version("3.0", "3.0", VersionType::Tag),
        ]);
        let base = version("3.0", "3.0", VersionType::Tag);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert!(result.is_highest);
    }

    #[test]
    fn evaluate_absorbs_unparseable_base_version() {
        let store = store_with(vec![version("3.0", "3.0", VersionType::Tag)]);
        let base = version("weird", "garbage-not-semver", VersionType::Branch);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert!(result.is_highest);
    }

    #[test]
    fn evaluate_defaults_to_highest_when_no_eligible_versions() {
        let store = store_with(vec![]);
        let base = version("1.0", "1.0", VersionType::Tag);

        let result = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert!(result.is_highest);
        assert_eq!(result.label, None);
        assert_eq!(result.url, None);
        assert_eq!(result.slug, None);
    }

    #[test]
    fn evaluate_is_idempotent_for_fixed_inputs() {
        let versions = vec![
            version("1.0", "1.0", VersionType::Tag),
            version("2.0", "2.0", VersionType::Tag),
        ];
        let store = store_with(versions);
        let base = version("1.0", "1.0", VersionType::Tag);

        let first = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();
        let second = get_version_compare_data(&store, &project(true), Some(&base)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn highest_version_breaks_ties_by_greatest_slug() {
        let versions = vec![
            version("2.0", "2.0", VersionType::Tag),
            version("v2.0", "v2.0.0", VersionType::Tag),
        ];

        let (winner, comparable) = highest_version(&versions).unwrap();

        assert_eq!(winner.slug, "v2.0");
        assert_eq!(comparable.to_string(), "2.0.0");
    }

    #[test]
    fn sort_versions_puts_newest_first_and_unparseable_last() {
        let sorted = sort_versions(vec![
            version("main", "main", VersionType::Branch),
            version("1.0", "1.0", VersionType::Tag),
            version("2.0", "2.0", VersionType::Tag),
            version("dev", "dev", VersionType::Branch),
        ]);

        let slugs: Vec<&str> = sorted.iter().map(|v| v.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2.0", "1.0", "dev", "main"]);
    }

    #[test]
    fn highest_version_skips_unparseable_labels() {
        let versions = vec![
            version("main", "main", VersionType::Branch),
            version("1.0", "1.0", VersionType::Branch),
        ];

        let (winner, _) = highest_version(&versions).unwrap();

        assert_eq!(winner.slug, "1.0");
    }
}
