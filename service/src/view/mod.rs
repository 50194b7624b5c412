//! View models rendered by a map [`Surface`].
//!
//! [`Surface`]: crate::map::Surface

pub mod detail;
pub mod marker;

pub use self::{detail::View, marker::Marker};

/// Placeholder of an unknown value.
pub const UNKNOWN: &str = "N/C";
