//! Detail panel view model.

use common::Money;

use crate::domain::{AddressGroup, Lot, Mutation};

use super::UNKNOWN;

/// Detail panel of a single place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct View {
    /// Header of the panel.
    pub address: String,

    /// Sales at the place, newest first.
    pub mutations: Vec<MutationView>,
}

impl View {
    /// Maps the provided [`AddressGroup`] into a [`View`].
    #[must_use]
    pub fn from_group(group: &AddressGroup) -> Self {
        Self {
            address: group.key.to_string(),
            mutations: group.mutations.iter().map(MutationView::from).collect(),
        }
    }
}

/// Single sale block of a [`View`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MutationView {
    /// Formatted date of the sale.
    pub date: String,

    /// Formatted price of the sale.
    pub price: String,

    /// Formatted price per square meter of built surface, if computable.
    pub price_per_m2: Option<String>,

    /// Sold [`Lots`].
    pub lots: Lots,
}

impl From<&Mutation> for MutationView {
    fn from(m: &Mutation) -> Self {
        Self {
            date: m.date.map_or_else(|| UNKNOWN.to_owned(), |d| d.to_string()),
            price: fmt_money(m.price),
            price_per_m2: m.price_per_m2().map(|p| format!("{p}/m²")),
            lots: if m.lots.is_empty() {
                Lots::NoData
            } else {
                Lots::Rows(m.lots.iter().map(LotRow::from).collect())
            },
        }
    }
}

/// Lots of a [`MutationView`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lots {
    /// Known lots.
    Rows(Vec<LotRow>),

    /// Nothing is known about the lots of a sale.
    NoData,
}

/// Single lot row of a [`MutationView`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LotRow {
    /// Premise type.
    pub kind: String,

    /// Formatted built surface.
    pub surface: String,

    /// Number of main rooms.
    pub rooms: String,

    /// Formatted Carrez surface.
    pub carrez: String,
}

impl From<&Lot> for LotRow {
    fn from(lot: &Lot) -> Self {
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_owned());
        Self {
            kind: or_unknown(lot.kind.as_ref().map(ToString::to_string)),
            surface: or_unknown(lot.surface.map(|s| s.to_string())),
            rooms: or_unknown(lot.rooms.map(|r| r.to_string())),
            carrez: or_unknown(lot.carrez.map(|s| s.to_string())),
        }
    }
}

/// Formats the provided optional [`Money`].
pub(crate) fn fmt_money(money: Option<Money>) -> String {
    money.map_or_else(|| UNKNOWN.to_owned(), |m| m.to_string())
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use rust_decimal::Decimal;

    use crate::domain::{
        sale::{Address, AddressKey, Area, LocalType},
        AddressGroup, LatLng, Lot, Mutation,
    };

    use super::{LotRow, Lots, View};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn maps_group_to_view() {
        let group = AddressGroup {
            key: AddressKey::Address(
                Address::new("12 Rue de Rivoli 75004 Paris").unwrap(),
            ),
            position: LatLng::new(48.8566, 2.3522).unwrap(),
            mutations: vec![
                Mutation {
                    id: None,
                    date: Date::from_ymd(2024, 3, 15),
                    price: Some(Money::new(decimal("250000"))),
                    lots: vec![Lot {
                        kind: LocalType::new("Appartement"),
                        surface: Some(Area::new(decimal("50"))),
                        carrez: Some(Area::new(decimal("48.5"))),
                        rooms: Some(2),
                    }],
                },
                Mutation {
                    id: None,
                    date: None,
                    price: None,
                    lots: vec![],
                },
            ],
        };

        let view = View::from_group(&group);

        assert_eq!(view.address, "12 Rue de Rivoli 75004 Paris");
        assert_eq!(view.mutations.len(), 2);

        let first = &view.mutations[0];
        assert_eq!(first.date, "15/03/2024");
        assert_eq!(first.price, "250\u{202f}000,00\u{a0}€");
        assert_eq!(first.price_per_m2.as_deref(), Some("5\u{202f}000,00\u{a0}€/m²"));
        assert_eq!(
            first.lots,
            Lots::Rows(vec![LotRow {
                kind: "Appartement".into(),
                surface: "50\u{a0}m²".into(),
                rooms: "2".into(),
                carrez: "48,5\u{a0}m²".into(),
            }]),
        );

        let second = &view.mutations[1];
        assert_eq!(second.date, "N/C");
        assert_eq!(second.price, "N/C");
        assert_eq!(second.price_per_m2, None);
        assert_eq!(second.lots, Lots::NoData);
    }
}
