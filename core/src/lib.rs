//! Async HTTP access layer for the production planning API.
//!
//! # Overview
//! `ApiClient` exposes `get`, `post`, `put` and `delete` over one immutable
//! `ClientConfig` (base URL, timeout, default headers). Every failure, be it
//! a refused connection, a timeout or a non-2xx status, comes back as a
//! single `ApiError` reading `"<VERB> <endpoint>: <message>"` and is logged
//! through `tracing` before it is returned.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   only a `Transport` performs I/O, so tests run against in-memory ones.
//! - `ReqwestTransport` is the production transport. With an empty base URL
//!   request paths stay relative and resolve against the serving origin.
//! - The config sits behind an `Arc` and is never mutated after startup.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{flatten_query, ApiClient, Params};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
