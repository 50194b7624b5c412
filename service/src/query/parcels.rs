//! [`Query`] of cadastral parcels.

use common::operations::By;

use crate::domain::parcel;
#[cfg(doc)]
use crate::Query;

use super::ApiQuery;

/// Queries a [`parcel::Collection`] of a commune or at a point.
pub type Parcels = ApiQuery<By<parcel::Collection, parcel::Query>>;
