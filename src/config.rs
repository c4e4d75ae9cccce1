use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// =============================================================================
// Defaults
// =============================================================================

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8765";

/// Default suffix of documentation source files, used for edit links.
pub const DEFAULT_SOURCE_SUFFIX: &str = ".rst";

/// Reserved version slug that always points at the default version.
pub const LATEST: &str = "latest";

/// Service configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Registry database location; defaults to the XDG data directory
    pub db_path: Option<PathBuf>,
    /// Prefix prepended to generated documentation URLs
    pub docs_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("default bind addr"),
            db_path: None,
            docs_base_url: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolved database path: explicit setting or the XDG default.
    pub fn database_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(db_path)
    }
}

/// Returns the path to the data directory for footer-api.
/// Uses $XDG_DATA_HOME/footer-api if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/footer-api,
/// or ./footer-api if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the registry database file.
pub fn db_path() -> PathBuf {
    data_dir().join("registry.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("footer-api.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("footer-api")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Settings>(json!({
            "bindAddr": "0.0.0.0:9000"
        }))
        .unwrap();

        assert_eq!(result.bind_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(result.db_path, None);
        assert_eq!(result.docs_base_url, "");
    }

    #[test]
    fn settings_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Settings>(json!({
            "bindAddr": "127.0.0.1:8080",
            "dbPath": "/var/lib/footer-api/registry.db",
            "docsBaseUrl": "https://docs.example.com"
        }))
        .unwrap();

        assert_eq!(
            result,
            Settings {
                bind_addr: "127.0.0.1:8080".parse().unwrap(),
                db_path: Some(PathBuf::from("/var/lib/footer-api/registry.db")),
                docs_base_url: "https://docs.example.com".to_string(),
            }
        );
    }

    #[test]
    fn database_path_prefers_explicit_setting() {
        let settings = Settings {
            db_path: Some(PathBuf::from("/tmp/explicit.db")),
            ..Settings::default()
        };

        assert_eq!(settings.database_path(), PathBuf::from("/tmp/explicit.db"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/footer-api"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/footer-api"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./footer-api"));
    }
}
