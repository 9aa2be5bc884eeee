use std::env;
use std::path::PathBuf;

use crate::error::ServerError;

pub const HOST_VAR: &str = "WEB_HOST";
pub const PORT_VAR: &str = "WEB_PORT";
pub const OUT_DIR_VAR: &str = "WEB_OUT_DIR";

/// Where the preview server listens and what it serves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fail on an occupied port instead of probing the next one.
    pub strict_port: bool,
    pub out_dir: PathBuf,
    pub assets_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            strict_port: true,
            out_dir: PathBuf::from("dist"),
            assets_dir: "assets".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_VAR).filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(raw) = lookup(PORT_VAR).filter(|p| !p.trim().is_empty()) {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ServerError::InvalidPort(raw.clone()))?;
        }
        if let Some(dir) = lookup(OUT_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config.out_dir = PathBuf::from(dir.trim());
        }
        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.out_dir.join(&self.assets_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.out_dir.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_preview_layout() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8501");
        assert!(config.strict_port);
        assert_eq!(config.assets_path(), PathBuf::from("dist/assets"));
        assert_eq!(config.index_path(), PathBuf::from("dist/index.html"));
    }

    #[test]
    fn from_lookup_overrides() {
        let config = ServerConfig::from_lookup(|name| match name {
            HOST_VAR => Some("127.0.0.1".to_string()),
            PORT_VAR => Some("9000".to_string()),
            OUT_DIR_VAR => Some("/srv/www".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.out_dir, PathBuf::from("/srv/www"));
        assert!(config.strict_port);
    }

    #[test]
    fn from_lookup_rejects_bad_port() {
        let err = ServerConfig::from_lookup(|name| (name == PORT_VAR).then(|| "80800".to_string()))
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidPort(p) if p == "80800"));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = ServerConfig::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(config, ServerConfig::default());
    }
}
