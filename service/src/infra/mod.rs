//! Infrastructure layer.

pub mod api;
pub mod wms;

pub use self::api::Api;
#[cfg(feature = "http")]
pub use self::api::Http;
