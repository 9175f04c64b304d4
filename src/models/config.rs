//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_roster_path() -> String {
    "/api/v1/makler/".to_string()
}

fn default_reorder_path() -> String {
    "/api/v1/makler/positions/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Key material for the flash message cookies, at least 64 bytes.
    pub secret: String,
    pub templates_dir: String,
    /// Base URL of the remote roster REST API, without a trailing slash.
    pub api_base_url: String,
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
    #[serde(default = "default_reorder_path")]
    pub reorder_path: String,
    /// Bearer token presented to the roster API. Requests fail with an
    /// authentication error while it is unset.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn roster_url(&self) -> String {
        join_url(&self.api_base_url, &self.roster_path)
    }

    pub fn reorder_url(&self) -> String {
        join_url(&self.api_base_url, &self.reorder_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
