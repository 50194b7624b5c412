//! Domain definitions.

pub mod address;
pub mod filter;
pub mod parcel;
pub mod sale;
pub mod viewport;

pub use self::{
    filter::Filter,
    sale::{AddressGroup, Lot, Mutation, Record},
    viewport::{Bbox, LatLng, LngLat, SampleLimit, Viewport, Zoom},
};
