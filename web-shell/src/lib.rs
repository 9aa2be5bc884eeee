//! Route table and static preview server for the planner front end.
//!
//! The table binds six history-mode paths to page views. The preview server
//! serves the built output directory, answers every table path with
//! `index.html`, and by default refuses to start on an occupied port rather
//! than drifting to another one.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::{resolve, resolve_view, Route, View, ROUTES};
pub use server::{app, bind, run};
