use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TlsBackend {
    Rustls,
    NativeTls,
}

impl Default for TlsBackend {
    fn default() -> Self {
        Self::Rustls
    }
}

/// sora2-admin client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the sora2api backend, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Admin access token sent as a Bearer credential
    #[serde(default)]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_tls_backend")]
    pub tls_backend: TlsBackend,

    /// HTTP proxy URL (optional)
    /// Supported formats: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Proxy authentication username (optional)
    #[serde(default)]
    pub proxy_username: Option<String>,

    /// Proxy authentication password (optional)
    #[serde(default)]
    pub proxy_password: Option<String>,

    /// Config file path (runtime metadata, not written to JSON)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_tls_backend() -> TlsBackend {
    TlsBackend::Rustls
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            tls_backend: default_tls_backend(),
            proxy_url: None,
            proxy_username: None,
            proxy_password: None,
            config_path: None,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // Config file doesn't exist, return default config
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get config file path (if available)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Base URL with any trailing slash removed
    pub fn effective_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.tls_backend, TlsBackend::Rustls);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{"baseUrl": "https://sora.example.com/", "accessToken": "tok"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.effective_base_url(), "https://sora.example.com");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load("definitely-not-here.json").unwrap();
        assert_eq!(config.base_url, default_base_url());
        assert!(config.config_path().is_some());
    }
}
