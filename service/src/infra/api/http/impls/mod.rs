//! [`Api`] implementations.
//!
//! [`Api`]: crate::infra::Api

mod address;
mod parcel;
mod sale;
