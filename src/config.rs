use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Data
    pub data_dir: PathBuf,
    pub preload_translations: bool,

    // Server
    pub host: IpAddr,
    pub port: u16,
    /// Origin used in pagination links. When unset, links are built from the
    /// request's `Host` header.
    pub public_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", port))?,
            None => 8080,
        };

        Ok(Self {
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            preload_translations: var("PRELOAD_TRANSLATIONS")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),

            host: host
                .trim()
                .parse()
                .with_context(|| format!("HOST is not a valid IP address: {}", host))?,
            port,
            public_base_url: var("PUBLIC_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.preload_translations);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.public_base_url, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATA_DIR", "/srv/catalog"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("PUBLIC_BASE_URL", "https://api.example.com/"),
            ("PRELOAD_TRANSLATIONS", "false"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/catalog"));
        assert!(!config.preload_translations);
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.public_base_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_blank_public_base_url_is_unset() {
        let config = config(&[("PUBLIC_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.public_base_url, None);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        assert!(config(&[("HOST", "not-an-ip")]).is_err());
    }
}
