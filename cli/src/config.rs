//! Optional TOML configuration file.
//!
//! File settings are the base; CLI flags and env vars override them. An
//! unreadable or unparsable file is reported and ignored rather than
//! aborting the run.

use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Node host.
    pub host: Option<String>,
    /// Node REST port.
    pub port: Option<u16>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}, using CLI defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {e}, using CLI defaults",
                    path.display()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let config: FileConfig = toml::from_str("host = \"10.0.0.1\"\n").unwrap();
        assert_eq!(config.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(config.port, None);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn parses_full_config() {
        let config: FileConfig =
            toml::from_str("host = \"10.0.0.1\"\nport = 7890\ntimeout_secs = 30\n").unwrap();
        assert_eq!(config.port, Some(7890));
        assert_eq!(config.timeout_secs, Some(30));
    }
}
