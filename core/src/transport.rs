//! The network seam between `ApiClient` and an HTTP library.
//!
//! # Design
//! A `Transport` executes one `HttpRequest` and hands back whatever the
//! server said, 4xx and 5xx included. Deciding what counts as success is
//! left to the client so every transport agrees on it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

/// `Transport` backed by a pooled `reqwest::Client`.
///
/// Relative request paths are joined onto `origin`, the address the
/// application was served from.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: Option<Url>,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(origin: Option<Url>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            origin,
            timeout,
        })
    }

    /// Resolves a request path to an absolute URL. Only `http` and `https`
    /// URLs are taken as absolute; `localhost:8000/orders` parses with the
    /// scheme `localhost` and is rejected rather than sent anywhere.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        if let Ok(url) = Url::parse(path) {
            return match url.scheme() {
                "http" | "https" => Ok(url),
                scheme => Err(TransportError::InvalidUrl(format!(
                    "{path}: unsupported scheme {scheme:?}, expected http or https"
                ))),
            };
        }
        match &self.origin {
            Some(origin) => origin
                .join(path)
                .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}"))),
            None => Err(TransportError::InvalidUrl(format!(
                "{path}: relative path with no origin configured"
            ))),
        }
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                millis: self.timeout.as_millis(),
            }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
