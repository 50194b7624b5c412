//! Operations executed by [`Handler`]s.
//!
//! [`Handler`]: crate::Handler

use std::marker::PhantomData;

/// Operation fetching a value, like sales of an area or parcels of a
/// commune.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Criteria `B` a `W` value is fetched by.
///
/// `W` only names the fetched value, so the same criteria may fetch values
/// of different types with different [`Handler`]s.
///
/// [`Handler`]: crate::Handler
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Marker of the fetched value type.
    _what: PhantomData<W>,

    /// Criteria of the fetched value.
    criteria: B,
}

impl<W, B> By<W, B> {
    /// Wraps the provided `criteria`.
    #[must_use]
    pub fn new(criteria: B) -> Self {
        Self {
            _what: PhantomData,
            criteria,
        }
    }

    /// Unwraps the criteria.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.criteria
    }
}
