//! [`Overlay`] definitions.

use derive_more::{Display, From, Into};

use crate::{domain::parcel, infra::wms, view::Marker};

/// ID of an [`Overlay`] added to a [`Surface`].
///
/// [`Surface`]: super::Surface
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct Id(u64);

/// Collection of features drawn over a map at once.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    /// Clickable [`Marker`]s.
    Markers(Vec<Marker>),

    /// Image tiles of a [`wms::Source`].
    Tiles(wms::Source),

    /// Outlines of cadastral parcels.
    Parcels(parcel::Collection),
}

impl Overlay {
    /// Returns the number of features in this [`Overlay`].
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Markers(m) => m.len(),
            Self::Tiles(_) => 1,
            Self::Parcels(p) => p.features.len(),
        }
    }

    /// Indicates whether this [`Overlay`] draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
