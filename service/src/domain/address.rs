//! Address search ([BAN]) definitions.
//!
//! [BAN]: https://adresse.data.gouv.fr

use std::fmt;

use super::LatLng;

/// Default maximum number of [`Suggestion`]s to return.
pub const DEFAULT_LIMIT: u8 = 5;

/// Address autocomplete search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Search {
    /// Free-form text typed by a user.
    pub text: String,

    /// Maximum number of [`Suggestion`]s to return.
    pub limit: u8,
}

impl Search {
    /// Creates a new [`Search`] of the provided `text` with the
    /// [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Indicates whether this [`Search`] has nothing to look for.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() || self.limit == 0
    }
}

/// Address found by a [`Search`].
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    /// Full display label, like `8 Boulevard du Port 80000 Amiens`.
    pub label: String,

    /// Postal code, if known.
    pub postcode: Option<String>,

    /// City name, if known.
    pub city: Option<String>,

    /// Position of the address, already in the map display order.
    pub position: LatLng,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.position)
    }
}
