//! Connection settings for the supervisor daemon.
//!
//! Precedence: CLI flag > SUPERVISOR_* environment > config file > defaults.
//! Config files are JSON, or YAML when named `*.yaml` / `*.yml`.
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use url::Url;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One layer of partial settings (file, environment or flags).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Read `SUPERVISOR_*` variables through `lookup` (empty values are ignored).
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = get("SUPERVISOR_PORT")
            .map(|v| {
                v.trim()
                    .parse::<u16>()
                    .with_context(|| format!("SUPERVISOR_PORT is not a valid port: '{v}'"))
            })
            .transpose()?;
        let timeout_secs = get("SUPERVISOR_TIMEOUT")
            .map(|v| {
                v.trim().parse::<u64>().with_context(|| {
                    format!("SUPERVISOR_TIMEOUT is not a number of seconds: '{v}'")
                })
            })
            .transpose()?;
        Ok(Self {
            host: get("SUPERVISOR_HOST"),
            port,
            username: get("SUPERVISOR_USERNAME"),
            password: get("SUPERVISOR_PASSWORD"),
            timeout_secs,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load a JSON or YAML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let lower = path.to_string_lossy().to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse JSON config file: {}", path.display()))
        }
    }

    /// Fields set in `self` win over `lower`.
    pub fn over(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            host: self.host.or(lower.host),
            port: self.port.or(lower.port),
            username: self.username.or(lower.username),
            password: self.password.or(lower.password),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
        }
    }
}

impl ConnectionConfig {
    /// Merge layers, highest precedence first, on top of the defaults.
    pub fn resolve(layers: impl IntoIterator<Item = ConfigLayer>) -> Result<Self> {
        let merged = layers
            .into_iter()
            .fold(ConfigLayer::default(), |acc, layer| acc.over(layer));
        let defaults = ConnectionConfig::default();
        let config = ConnectionConfig {
            host: merged.host.unwrap_or(defaults.host),
            port: merged.port.unwrap_or(defaults.port),
            username: merged.username,
            password: merged.password,
            timeout_secs: merged.timeout_secs.unwrap_or(defaults.timeout_secs),
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("supervisor host is empty");
        }
        if self.port == 0 {
            bail!("supervisor port must be non-zero");
        }
        if self.timeout_secs == 0 {
            bail!("timeout must be at least one second");
        }
        if self.password.is_some() && self.username.is_none() {
            bail!("a password was given without a username");
        }
        Ok(())
    }

    /// XML-RPC endpoint of the daemon.
    pub fn endpoint(&self) -> Result<Url> {
        let raw = format!("http://{}:{}/RPC2", self.host.trim(), self.port);
        Url::parse(&raw).with_context(|| format!("Invalid supervisor endpoint: '{raw}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_stock_supervisord() {
        let config = ConnectionConfig::resolve(Vec::new()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9001);
        assert_eq!(config.username, None);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:9001/RPC2"
        );
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let flags = ConfigLayer {
            port: Some(9100),
            ..Default::default()
        };
        let env_layer = ConfigLayer::from_env_with(env(&[
            ("SUPERVISOR_HOST", "supervisor.internal"),
            ("SUPERVISOR_PORT", "9002"),
        ]))
        .unwrap();
        let file = ConfigLayer {
            host: Some("file-host".into()),
            username: Some("admin".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        let config = ConnectionConfig::resolve([flags, env_layer, file]).unwrap();
        assert_eq!(config.host, "supervisor.internal");
        assert_eq!(config.port, 9100);
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("pw"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let layer = ConfigLayer::from_env_with(env(&[("SUPERVISOR_HOST", "  ")])).unwrap();
        assert_eq!(layer.host, None);
    }

    #[test]
    fn bad_env_port_is_rejected() {
        let err = ConfigLayer::from_env_with(env(&[("SUPERVISOR_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("SUPERVISOR_PORT"));
    }

    #[test]
    fn password_requires_username() {
        let layer = ConfigLayer {
            password: Some("pw".into()),
            ..Default::default()
        };
        let err = ConnectionConfig::resolve([layer]).unwrap_err();
        assert!(err.to_string().contains("without a username"));
    }

    #[test]
    fn yaml_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "host: 10.0.0.5\nport: 9010\nusername: ops\npassword: s3cret").unwrap();
        let layer = ConfigLayer::from_file(file.path()).unwrap();
        assert_eq!(layer.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(layer.port, Some(9010));
        assert_eq!(layer.username.as_deref(), Some("ops"));
    }

    #[test]
    fn json_config_file_rejects_unknown_keys() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "host": "h", "hostname": "typo" }}"#).unwrap();
        let err = ConfigLayer::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON config file"));
    }
}
