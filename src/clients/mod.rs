//! DNS over HTTPS clients, that carry encoded queries to a resolver and
//! return its raw responses.

pub use self::doh::Client as DoHClient;
pub use self::doh::{Config, Server};
pub use self::resolver::Resolver;

pub mod doh;
mod resolver;

use async_trait::async_trait;
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors from performing a lookup.
///
/// Transport failures are kept apart from [`Codec`](ClientError::Codec)
/// failures, which mean the resolver was reached but its answer (or our
/// question) could not be encoded or decoded.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("only GET and POST allowed, not {0}")]
    UnsupportedMethod(http::Method),

    #[error("unknown server '{0}'")]
    UnknownServer(String),

    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error(transparent)]
    Request(#[from] http::Error),

    #[error(transparent)]
    Transport(#[from] hyper::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("received unexpected HTTP status code: {0}")]
    Status(StatusCode),

    #[error("received invalid content-type: {0:?} expected {1}")]
    ContentType(String, &'static str),

    #[error("response of {0} bytes is larger than a DNS message can be")]
    TooLarge(usize),

    #[error(transparent)]
    Codec(#[from] crate::Error),
}

/// Exchanger takes an encoded query and returns the encoded response.
#[async_trait]
pub trait AsyncExchanger {
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, ClientError>;
}
