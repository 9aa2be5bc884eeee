//! Error types for the planner API client.
//!
//! # Design
//! Callers see exactly one error kind, `ApiError`, which names the verb and
//! endpoint that failed. What went wrong underneath (connection refused,
//! timeout, non-2xx status, bad body) lives in `TransportError` and only
//! shapes the message; the layer never branches on it to recover.

use thiserror::Error;

use crate::http::HttpMethod;

/// The single failure shape returned by every `ApiClient` verb.
#[derive(Debug, Error)]
#[error("{method} {endpoint}: {source}")]
pub struct ApiError {
    pub method: HttpMethod,
    pub endpoint: String,
    #[source]
    pub source: TransportError,
}

impl ApiError {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>, source: TransportError) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            source,
        }
    }

    /// The underlying message without the `"<VERB> <endpoint>: "` prefix.
    pub fn underlying_message(&self) -> String {
        self.source.to_string()
    }
}

/// What actually failed beneath an `ApiError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("{0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("timeout of {millis}ms exceeded")]
    Timeout { millis: u128 },

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    /// The request path could not be turned into an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request payload could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}
