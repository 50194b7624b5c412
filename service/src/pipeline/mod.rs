//! Pure processing steps turning fetched [`Record`]s into
//! [`AddressGroup`]s.
//!
//! [`AddressGroup`]: crate::domain::AddressGroup
//! [`Record`]: crate::domain::Record

mod dedupe;
mod group;

pub use self::{dedupe::dedupe, group::group};
