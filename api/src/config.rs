//! Server configuration module
//! Reads the listening address and the optional seed dataset override from the environment

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_PORT: u16 = 3333;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Alternative seed dataset; the bundled one is used when unset
    pub seed_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            seed_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;

        info!(
            "Server configuration loaded: host={}, port={}, seed={}",
            config.host,
            config.port,
            config
                .seed_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "bundled".to_string())
        );

        Ok(config)
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse::<u16>().map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid PORT '{}': {}", port, e))
            })?;
        }

        if let Some(host) = lookup("HOST") {
            config.host = host.trim().parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid HOST '{}': {}", host, e))
            })?;
        }

        config.seed_path = lookup("MOVIES_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().port(), 3333);
    }

    #[test]
    fn test_port_and_seed_override() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("HOST", "127.0.0.1"),
            ("MOVIES_DATA_PATH", "/srv/movies.json"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:8081".parse().unwrap());
        assert_eq!(config.seed_path, Some(PathBuf::from("/srv/movies.json")));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(msg) if msg.contains("PORT")));

        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn test_invalid_host() {
        assert!(ServerConfig::from_lookup(lookup(&[("HOST", "not-an-ip")])).is_err());
    }
}
