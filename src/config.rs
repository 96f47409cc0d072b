//! Application configuration and data-root resolution.
//!
//! The data root is resolved through a chain:
//!
//! 1. `--root <dir>`: explicit per-invocation override
//! 2. `LOGBOOK_HOME` env var: process/session level
//! 3. `~/.logbook`: the default
//!
//! `config.toml` inside the resolved root is optional; a missing file
//! means defaults.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

/// Env var naming the data root.
pub const HOME_VAR: &str = "LOGBOOK_HOME";

/// Env var holding a trace filter, which wins over `log-filter`.
pub const LOG_VAR: &str = "LOGBOOK_LOG";

/// Error message shown when no data root can be resolved.
pub const ROOT_REQUIRED: &str = "could not determine a data directory: pass --root <dir> \
    or set LOGBOOK_HOME";

/// Logbook configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Trace filter directive, e.g. `"info"` or `"logbook=debug"`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `<root>/config.toml`, or defaults when it doesn't exist.
    pub fn load(root: &Path) -> Result<Self, String> {
        let path = root.join("config.toml");
        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }
}

/// Resolve the data root from the tiered resolution chain.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, String> {
    // 1. Explicit --root flag.
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    // 2. LOGBOOK_HOME environment variable.
    if let Ok(root) = env::var(HOME_VAR)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }

    // 3. ~/.logbook.
    default_root().ok_or_else(|| ROOT_REQUIRED.to_string())
}

/// The default data root: `~/.logbook`.
pub fn default_root() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".logbook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn explicit_wins() {
        // An explicit root is returned without consulting env or home.
        let root = resolve_root(Some(Path::new("/tmp/elsewhere"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn config_reads_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "log-filter = \"debug\"\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "log-filter = 3\n").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.contains("config.toml"));
    }
}
