use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("WEB_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("no free port in {host}:{first}..={last}")]
    NoFreePort { host: String, first: u16, last: u16 },

    #[error("server stopped: {0}")]
    Serve(#[from] io::Error),
}
