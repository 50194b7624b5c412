//! Headless map client: fetches, processes and draws real estate layers.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod domain;
pub mod infra;
pub mod layer;
pub mod map;
pub mod pipeline;
pub mod query;
pub mod view;

#[cfg(test)]
mod mock;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Api;

pub use self::query::Query;

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Padding (in degrees) of the area fetched around a clicked marker.
    #[default = 0.0002]
    pub detail_padding: f64,

    /// Maximum distance (in degrees, on each axis) between a clicked marker
    /// and the sales considered to be located at it.
    #[default = 0.0001]
    pub match_tolerance: f64,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<A> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Api`] of this [`Service`].
    api: A,
}

impl<A> Service<A> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(config: Config, api: A) -> Self {
        Self { config, api }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Api`] of this [`Service`].
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }
}
