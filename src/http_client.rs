//! HTTP Client builder module
//!
//! Builds the shared reqwest client from configuration, with proxy support

use reqwest::{Client, Proxy};
use std::time::Duration;

use crate::model::config::{Config, TlsBackend};

/// Build the HTTP client used for all admin API requests
///
/// Timeout, TLS backend and proxy settings come from [`Config`]; the proxy
/// URL supports http/https/socks5 schemes with optional basic auth.
pub fn build_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

    if config.tls_backend == TlsBackend::Rustls {
        builder = builder.use_rustls_tls();
    }

    if let Some(url) = &config.proxy_url {
        let mut proxy = Proxy::all(url)?;

        if let (Some(username), Some(password)) = (&config.proxy_username, &config.proxy_password)
        {
            proxy = proxy.basic_auth(username, password);
        }

        builder = builder.proxy(proxy);
        tracing::debug!("HTTP client using proxy: {}", url);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_default_config() {
        let config = Config::default();
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let mut config = Config::default();
        config.proxy_url = Some("socks5://127.0.0.1:1080".to_string());
        config.proxy_username = Some("user".to_string());
        config.proxy_password = Some("pass".to_string());
        assert!(build_client(&config).is_ok());
    }
}
