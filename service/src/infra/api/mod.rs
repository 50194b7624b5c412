//! Remote [`Api`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Remote API operation.
pub use common::Handler as Api;

/// [`Api`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request failed to be sent or to complete in time.
    #[cfg(feature = "http")]
    #[display("request failed: {_0}")]
    Request(reqwest::Error),

    /// Remote service responded with a non-success status.
    #[display("unexpected response status: {_0}")]
    #[from(ignore)]
    Status(#[error(not(source))] u16),

    /// Response body is not the expected JSON.
    #[display("malformed response body: {_0}")]
    Decode(serde_json::Error),

    /// Endpoint is not a valid URL.
    #[display("invalid endpoint URL: {_0}")]
    #[from(ignore)]
    Url(#[error(not(source))] String),
}
