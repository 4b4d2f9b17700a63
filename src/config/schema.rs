//! Configuration schema
//!
//! Defines the structure of the configuration file.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub images: ImageConfig,
}

/// Catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the compressed catalog payload
    #[serde(default = "default_catalog_url")]
    pub url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Number of concurrent image fetches per refresh cycle
    #[serde(default = "default_concurrent_fetches")]
    pub concurrent_fetches: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            concurrent_fetches: default_concurrent_fetches(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Image fetching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// URLs matching a fragment are fetched from a stand-in instead.
    /// Some groups link image hosts that expire or block hotlinking.
    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<UrlSubstitution>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
        }
    }
}

/// One entry of the image substitution table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSubstitution {
    /// Substring that marks a URL for substitution
    pub host_fragment: String,
    /// URL fetched in its place
    pub replacement: String,
}

// Default value functions for serde
fn default_catalog_url() -> String {
    "https://github.com/hangar-sim/catalog/raw/refs/heads/main/groups.bin".to_string()
}
fn default_user_agent() -> String {
    format!("hangar/{}", env!("CARGO_PKG_VERSION"))
}
fn default_concurrent_fetches() -> usize {
    6
}
fn default_timeout() -> u64 {
    30
}
fn default_substitutions() -> Vec<UrlSubstitution> {
    vec![UrlSubstitution {
        host_fragment: "discordapp.".to_string(),
        replacement: "https://1000logos.net/wp-content/uploads/2021/06/Discord-logo.png"
            .to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_fills_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.network.concurrent_fetches, 6);
        assert!(!config.images.substitutions.is_empty());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [network]
            concurrent_fetches = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.network.concurrent_fetches, 4);
        assert_eq!(config.network.timeout_seconds, 30);
    }
}
