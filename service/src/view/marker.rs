//! Map marker view model.

use crate::domain::{sale::AddressKey, AddressGroup, LatLng};

use super::{detail::fmt_money, UNKNOWN};

/// Marker of an [`AddressGroup`] on a map.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// [`AddressKey`] of the marked [`AddressGroup`].
    pub key: AddressKey,

    /// Position of the marker.
    pub position: LatLng,

    /// Tooltip label of the marker.
    pub label: String,
}

impl Marker {
    /// Builds a [`Marker`] of the provided [`AddressGroup`].
    #[must_use]
    pub fn from_group(group: &AddressGroup) -> Self {
        let latest = group.latest().map_or_else(
            || UNKNOWN.to_owned(),
            |m| {
                let date =
                    m.date.map_or_else(|| UNKNOWN.to_owned(), |d| d.to_string());
                format!("{}, {date}", fmt_money(m.price))
            },
        );
        let label = match group.mutations.len() {
            0 | 1 => format!("{}: {latest}", group.key),
            n => format!("{}: {latest} ({n} ventes)", group.key),
        };

        Self {
            key: group.key.clone(),
            position: group.position,
            label,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use crate::domain::{
        sale::{Address, AddressKey},
        AddressGroup, LatLng, Mutation,
    };

    use super::Marker;

    #[test]
    fn labels_with_latest_sale() {
        let mutation = |year, price: i64| Mutation {
            id: None,
            date: Date::from_ymd(year, 1, 2),
            price: Some(Money::new(price.into())),
            lots: vec![],
        };
        let group = AddressGroup {
            key: AddressKey::Address(Address::new("2 Quai Rive Neuve").unwrap()),
            position: LatLng::new(43.29, 5.37).unwrap(),
            mutations: vec![mutation(2023, 310_000), mutation(2015, 190_000)],
        };

        let marker = Marker::from_group(&group);

        assert_eq!(marker.position, group.position);
        assert_eq!(
            marker.label,
            "2 Quai Rive Neuve: 310\u{202f}000,00\u{a0}€, 02/01/2023 (2 ventes)",
        );
    }
}
