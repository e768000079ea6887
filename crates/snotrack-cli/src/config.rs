//! CLI configuration from environment.

use std::env;
use std::time::Duration;

use snotrack_elevation::client::DEFAULT_ELEVATION_URL;

const DEFAULT_TIMEOUT_S: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub elevation_url: String,
    pub mapquest_key: Option<String>,
    pub elevation_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; unset or unparsable values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            elevation_url: lookup("SNOTRACK_ELEVATION_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ELEVATION_URL.to_string()),
            mapquest_key: lookup("SNOTRACK_MAPQUEST_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            elevation_timeout: Duration::from_secs(
                lookup("SNOTRACK_ELEVATION_TIMEOUT_S")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_S),
            ),
        }
    }
}
