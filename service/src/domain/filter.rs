//! [`Filter`] of sales.

use std::str::FromStr as _;

use common::Money;
use derive_more::{Display, Error};

use super::sale::{AddressGroup, Mutation};

/// Criteria narrowing the sales shown on a map.
///
/// Absent bounds are not applied at all (rather than defaulting to some
/// extreme value).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Minimal year of a sale.
    pub year_min: Option<i32>,

    /// Maximal year of a sale.
    pub year_max: Option<i32>,

    /// Minimal price of a sale.
    pub price_min: Option<Money>,

    /// Maximal price of a sale.
    pub price_max: Option<Money>,

    /// Minimal price per square meter of a sale.
    pub price_m2_min: Option<Money>,

    /// Maximal price per square meter of a sale.
    pub price_m2_max: Option<Money>,
}

impl Filter {
    /// Names of the query parameters, in the order they are emitted.
    pub const KEYS: [&'static str; 6] = [
        "year_min",
        "year_max",
        "price_min",
        "price_max",
        "price_m2_min",
        "price_m2_max",
    ];

    /// Indicates whether this [`Filter`] has no bounds set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns query parameters of the bounds set in this [`Filter`].
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let year = |v: Option<i32>| v.map(|y| y.to_string());
        let money = |v: Option<Money>| v.map(|m| m.amount().normalize().to_string());

        Self::KEYS
            .into_iter()
            .zip([
                year(self.year_min),
                year(self.year_max),
                money(self.price_min),
                money(self.price_max),
                money(self.price_m2_min),
                money(self.price_m2_max),
            ])
            .filter_map(|(k, v)| Some((k, v?)))
            .collect()
    }

    /// Sets the bound named by the provided `key` (one of [`Filter::KEYS`])
    /// from its string `value`.
    ///
    /// A blank `value` clears the bound.
    ///
    /// # Errors
    ///
    /// If the `key` is unknown or the `value` is not a valid number.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ParamError> {
        let value = value.trim();
        let year = || {
            (!value.is_empty())
                .then(|| value.parse::<i32>())
                .transpose()
                .map_err(|_| ParamError::InvalidValue(key.to_owned()))
        };
        let money = || {
            (!value.is_empty())
                .then(|| Money::from_str(value))
                .transpose()
                .map_err(|_| ParamError::InvalidValue(key.to_owned()))
        };

        match key {
            "year_min" => self.year_min = year()?,
            "year_max" => self.year_max = year()?,
            "price_min" => self.price_min = money()?,
            "price_max" => self.price_max = money()?,
            "price_m2_min" => self.price_m2_min = money()?,
            "price_m2_max" => self.price_m2_max = money()?,
            _ => return Err(ParamError::UnknownKey(key.to_owned())),
        }
        Ok(())
    }

    /// Checks whether the provided [`Mutation`] satisfies this [`Filter`].
    ///
    /// The price per square meter is the one of the whole [`Mutation`], so
    /// its [`Lot`]s are kept or dropped together. Bounds that cannot be
    /// evaluated (an unknown price, for example) don't exclude it.
    ///
    /// [`Lot`]: super::Lot
    #[must_use]
    pub fn matches(&self, mutation: &Mutation) -> bool {
        let year = mutation.date.map(|d| d.year());

        year.map_or(true, |y| within(y, self.year_min, self.year_max))
            && mutation
                .price
                .map_or(true, |p| within(p, self.price_min, self.price_max))
            && mutation.price_per_m2().map_or(true, |p| {
                within(p, self.price_m2_min, self.price_m2_max)
            })
    }

    /// Drops the [`Mutation`]s not satisfying this [`Filter`] from the
    /// provided [`AddressGroup`]s, along with the groups left empty.
    #[must_use]
    pub fn apply(&self, groups: Vec<AddressGroup>) -> Vec<AddressGroup> {
        if self.is_empty() {
            return groups;
        }
        groups
            .into_iter()
            .filter_map(|mut g| {
                g.mutations.retain(|m| self.matches(m));
                (!g.mutations.is_empty()).then_some(g)
            })
            .collect()
    }
}

/// Checks whether `v` lies within the provided optional bounds.
fn within<T: PartialOrd>(v: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m)
}

/// Error of setting a [`Filter`] bound.
#[derive(Clone, Debug, Display, Error)]
pub enum ParamError {
    /// Unknown [`Filter`] key.
    #[display("unknown filter key `{_0}`")]
    UnknownKey(#[error(not(source))] String),

    /// Value is not a valid number.
    #[display("invalid value of filter `{_0}`")]
    InvalidValue(#[error(not(source))] String),
}
