//! Application configuration.
//!
//! Built from CLI/env args plus an optional `config.toml` in the data dir
//! (or an explicit `--config` path). The remote store location is opaque
//! configuration: a base URL and an API key, nothing else. A config file
//! that exists but does not parse is a startup error — a mistyped file is
//! never silently discarded.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

const DEFAULT_TABLE: &str = "tasks";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Resolved configuration handed to the gateway and the UI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote store root, e.g. `https://xyzcompany.supabase.co`.
    pub base_url: String,
    /// API key sent as both `apikey` and bearer token. Empty = no auth
    /// headers (local development store).
    pub api_key: String,
    /// Table name under `/rest/v1/`.
    pub table: String,
    pub request_timeout_secs: u64,
    /// Data directory — holds `config.toml` and the TUI log file.
    pub data_dir: PathBuf,
}

/// `{data_dir}/config.toml` — all fields are optional overrides.
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file: `config_path` when given, else `{data_dir}/config.toml`
    ///   3. Built-in defaults
    ///
    /// An absent default-location file means defaults; an explicit
    /// `config_path` must exist; any file that fails to parse is an error.
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        data_dir: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let toml = load_toml(config_path.as_deref(), &data_dir)?.unwrap_or_default();

        let base_url = base_url
            .filter(|s| !s.is_empty())
            .or(toml.base_url)
            .unwrap_or_default();
        let api_key = api_key
            .filter(|s| !s.is_empty())
            .or(toml.api_key)
            .unwrap_or_default();
        let table = toml.table.unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let request_timeout_secs = toml
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            table,
            request_timeout_secs,
            data_dir,
        })
    }

    /// A usable config names a remote store.
    pub fn has_remote(&self) -> bool {
        !self.base_url.is_empty()
    }
}

fn load_toml(explicit: Option<&Path>, data_dir: &Path) -> Result<Option<TomlConfig>> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (data_dir.join("config.toml"), false),
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read config file {}", path.display()))
        }
    };
    let cfg = toml::from_str::<TomlConfig>(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(Some(cfg))
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/taskdeck
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/taskdeck or ~/.local/share/taskdeck
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            if !xdg.is_empty() {
                return PathBuf::from(xdg).join("taskdeck");
            }
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("taskdeck");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("taskdeck");
        }
    }
    PathBuf::from(".taskdeck")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = AppConfig::new(None, None, Some(dir.path().to_path_buf()), None).expect("config");
        assert_eq!(cfg.table, "tasks");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(!cfg.has_remote());
    }

    #[test]
    fn toml_file_fills_gaps_and_cli_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("config.toml"),
            "base_url = \"https://file.example\"\napi_key = \"file-key\"\ntable = \"todo_items\"\n",
        )
        .expect("write config");

        let cfg = AppConfig::new(
            Some("https://cli.example".into()),
            None,
            Some(dir.path().to_path_buf()),
            None,
        )
        .expect("config");
        assert_eq!(cfg.base_url, "https://cli.example");
        assert_eq!(cfg.api_key, "file-key");
        assert_eq!(cfg.table, "todo_items");
        assert!(cfg.has_remote());
    }

    /// A config file that exists but does not parse must abort startup.
    /// Falling back to defaults here would silently drop whatever the file
    /// tried to set, including the remote base_url.
    #[test]
    fn malformed_toml_is_startup_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("config.toml"),
            "base_url = \"https://real.example\"\nnot [valid toml",
        )
        .expect("write config");

        let err = AppConfig::new(None, None, Some(dir.path().to_path_buf()), None)
            .expect_err("malformed config must fail");
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn explicit_config_path_overrides_default_location() {
        let data = tempfile::tempdir().expect("tempdir");
        let elsewhere = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            data.path().join("config.toml"),
            "table = \"wrong_table\"\n",
        )
        .expect("write config");
        let explicit = elsewhere.path().join("taskdeck.toml");
        std::fs::write(&explicit, "table = \"todo_items\"\n").expect("write config");

        let cfg = AppConfig::new(None, None, Some(data.path().to_path_buf()), Some(explicit))
            .expect("config");
        assert_eq!(cfg.table, "todo_items");
    }

    /// A `--config` path that does not exist is an error, unlike the
    /// optional default-location file.
    #[test]
    fn missing_explicit_config_is_startup_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AppConfig::new(
            None,
            None,
            Some(dir.path().to_path_buf()),
            Some(dir.path().join("nope.toml")),
        )
        .expect_err("missing explicit config must fail");
        assert!(err.to_string().contains("failed to read config file"));
    }
}
