//! Async access layer over a pluggable `Transport`.
//!
//! # Design
//! `ApiClient` holds an `Arc<ClientConfig>` and a transport, nothing else.
//! Every verb runs the same pipeline: `build_request` applies the base URL
//! and default headers, the transport performs the round-trip under the
//! configured timeout, and `parse_response` maps the result to a payload.
//! Any failure on the way out is logged once and returned as `ApiError`.
//! There is no retry and no recovery at this layer.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Query parameters for `get`. `None` in a verb call is the empty map.
pub type Params = serde_json::Map<String, Value>;

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    config: Arc<ClientConfig>,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Client over reqwest. `origin` is where relative paths resolve when the
    /// base URL is empty.
    pub fn over_http(config: ClientConfig, origin: Option<Url>) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(origin, config.timeout())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self::with_shared_config(Arc::new(config), transport)
    }

    pub fn with_shared_config(config: Arc<ClientConfig>, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R>(&self, endpoint: &str, query: Option<&Params>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.call(HttpMethod::Get, endpoint, query, None).await
    }

    /// `body` of `None` is sent as `{}`.
    pub async fn post<R>(&self, endpoint: &str, body: Option<&Value>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let empty = Value::Object(Params::new());
        self.call(HttpMethod::Post, endpoint, None, Some(body.unwrap_or(&empty)))
            .await
    }

    /// `body` of `None` is sent as `{}`.
    pub async fn put<R>(&self, endpoint: &str, body: Option<&Value>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let empty = Value::Object(Params::new());
        self.call(HttpMethod::Put, endpoint, None, Some(body.unwrap_or(&empty)))
            .await
    }

    pub async fn delete<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.call(HttpMethod::Delete, endpoint, None, None).await
    }

    /// Build the request for one call without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Params>,
        body: Option<&Value>,
    ) -> Result<HttpRequest, TransportError> {
        let body = body
            .map(|b| serde_json::to_string(b).map_err(|e| TransportError::Encode(e.to_string())))
            .transpose()?;
        let headers = self
            .config
            .default_headers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(HttpRequest {
            method,
            path: self.config.resolve(endpoint),
            query: query.map(flatten_query).unwrap_or_default(),
            headers,
            body,
        })
    }

    /// Map a raw response to the decoded payload. An empty body decodes as
    /// JSON `null`; a body that is not JSON is handed over as a string.
    pub fn parse_response<R>(&self, response: HttpResponse) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return serde_json::from_value(Value::Null)
                .map_err(|e| TransportError::Decode(e.to_string()));
        }
        match serde_json::from_str(&response.body) {
            Ok(payload) => Ok(payload),
            Err(json_err) => {
                debug!(error = %json_err, "body is not JSON, decoding as text");
                serde_json::from_value(Value::String(response.body))
                    .map_err(|_| TransportError::Decode(json_err.to_string()))
            }
        }
    }

    async fn call<R>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Params>,
        body: Option<&Value>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.round_trip(method, endpoint, query, body)
            .await
            .map_err(|source| {
                let err = ApiError::new(method, endpoint, source);
                error!(method = %method, endpoint, error = %err.source, "API error");
                err
            })
    }

    async fn round_trip<R>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Params>,
        body: Option<&Value>,
    ) -> Result<R, TransportError>
    where
        R: DeserializeOwned,
    {
        let request = self.build_request(method, endpoint, query, body)?;
        debug!(method = %method, path = %request.path, "sending request");

        let timeout = self.config.timeout();
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| TransportError::Timeout {
                millis: timeout.as_millis(),
            })??;

        debug!(method = %method, endpoint, status = response.status, "received response");
        self.parse_response(response)
    }
}

/// Flatten query params into ordered pairs.
///
/// Scalars render as their text, `null` is dropped, arrays become repeated
/// `key[]` pairs and nested objects are sent as JSON text.
pub fn flatten_query(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let name = format!("{key}[]");
                pairs.extend(
                    items
                        .iter()
                        .filter(|v| !v.is_null())
                        .map(|v| (name.clone(), scalar_text(v))),
                );
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
