//! Shared, immutable client configuration.

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

pub const BASE_URL_VAR: &str = "API_BASE_URL";
pub const TIMEOUT_VAR: &str = "API_TIMEOUT_MS";

/// Base URL, timeout and default headers applied to every request.
///
/// Built once at startup and shared behind an `Arc` by `ApiClient`. An empty
/// `base_url` means "same origin": request paths stay relative and the
/// transport resolves them against whatever origin it was given, which is
/// what a reverse-proxy deployment forwarding `/api`-style paths expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    default_headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Config with the stock timeout and `Content-Type: application/json`.
    pub fn new(base_url: &str) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers,
        }
    }

    /// Reads `API_BASE_URL` and `API_TIMEOUT_MS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_default();
        let config = Self::new(base_url.trim());

        match lookup(TIMEOUT_VAR) {
            Some(raw) if !raw.trim().is_empty() => {
                let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    name: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
                config.with_timeout(Duration::from_millis(millis))
            }
            _ => Ok(config),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Adds or replaces a default header. Names compare case-insensitively.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.default_headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn is_same_origin(&self) -> bool {
        self.base_url.is_empty()
    }

    /// `base_url + endpoint` joined by exactly one `/`. With an empty base
    /// URL the endpoint is returned untouched.
    pub fn resolve(&self, endpoint: &str) -> String {
        if self.base_url.is_empty() {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
