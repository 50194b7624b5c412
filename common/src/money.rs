//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

/// Separator of thousands groups in `fr-FR` formatting (narrow no-break
/// space).
pub const GROUP_SEPARATOR: char = '\u{202f}';

/// Separator between an amount and its unit in `fr-FR` formatting (no-break
/// space).
pub const UNIT_SEPARATOR: char = '\u{a0}';

/// Amount of money in euros.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new [`Money`] amount from the provided euros.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount of euros.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Divides this [`Money`] by the provided number of units (square
    /// meters, for example).
    ///
    /// [`None`] is returned if `units` is not positive.
    #[must_use]
    pub fn per(&self, units: Decimal) -> Option<Self> {
        (units > Decimal::ZERO)
            .then(|| self.0.checked_div(units))
            .flatten()
            .map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{UNIT_SEPARATOR}€", format_fr(self.0, Some(2)))
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty amount");
        }
        Decimal::from_str(&s.replace(',', "."))
            .map(Self)
            .map_err(|_| "invalid amount")
    }
}

/// Formats the provided `value` the `fr-FR` way: thousands grouped with a
/// [`GROUP_SEPARATOR`] and a comma as the decimal separator.
///
/// With `Some(scale)` the value is rounded (midpoint away from zero) and
/// padded to exactly `scale` decimals, otherwise trailing zeros are dropped.
#[must_use]
pub fn format_fr(value: Decimal, scale: Option<u32>) -> String {
    let digits = match scale {
        Some(scale) => {
            let rounded = value.round_dp_with_strategy(
                scale,
                RoundingStrategy::MidpointAwayFromZero,
            );
            format!("{:.*}", scale as usize, rounded.abs())
        }
        None => value.normalize().abs().to_string(),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + integer.len() / 3 + 1);
    if value.is_sign_negative() && !value.is_zero() {
        out.push('-');
    }
    for (n, ch) in integer.chars().enumerate() {
        if n > 0 && (integer.len() - n) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}
