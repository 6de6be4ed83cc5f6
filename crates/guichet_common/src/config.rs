//! Daemon configuration.
//!
//! Everything has a default; a missing config file runs the daemon with the
//! defaults, and a partial TOML file only overrides the keys it names.
//! Malformed TOML is an error rather than a silent fallback.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuichetError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuichetConfig {
    /// Listen address for the HTTP surface.
    pub bind_addr: String,
    /// Directory holding the ticket ledger.
    pub data_dir: PathBuf,
    /// Sessions idle longer than this are swept back to Idle.
    pub session_ttl_minutes: u64,
    /// How often the sweep task runs.
    pub sweep_interval_secs: u64,
    /// How many locations the dashboard top list carries.
    pub top_locations: usize,
}

impl Default for GuichetConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7841".to_string(),
            data_dir: dirs::data_dir()
                .map(|d| d.join("guichet"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/guichet")),
            session_ttl_minutes: 30,
            sweep_interval_secs: 60,
            top_locations: 5,
        }
    }
}

impl GuichetConfig {
    /// Load from a TOML file. `None` or an absent file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| GuichetError::Validation(format!("config {}: {e}", path.display())))
    }

    pub fn tickets_file(&self) -> PathBuf {
        self.data_dir.join("tickets.json")
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_file_yields_defaults() {
        let config = GuichetConfig::load(None).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7841");
        assert_eq!(config.session_ttl_minutes, 30);

        let config = GuichetConfig::load(Some(Path::new("/nonexistent/guichet.toml"))).unwrap();
        assert_eq!(config.top_locations, 5);
    }

    #[test]
    fn partial_file_keeps_unnamed_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guichet.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:9000\"\nsession_ttl_minutes = 5\n").unwrap();

        let config = GuichetConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.session_ttl(), Duration::from_secs(300));
        assert_eq!(config.sweep_interval_secs, 60);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guichet.toml");
        std::fs::write(&path, "bind_addr = [broken").unwrap();
        assert!(matches!(
            GuichetConfig::load(Some(&path)),
            Err(GuichetError::Validation(_))
        ));
    }
}
