//! [`dedupe`] step.

use std::collections::HashSet;

use crate::domain::{sale::IdentityHasher, Record};

/// Removes [`Record`]s repeating an already seen [`Identity`], preserving
/// the first-seen order.
///
/// [`Identity`]s are compared exactly, so distinct [`Record`]s are never
/// dropped. Idempotent: deduplicating an already deduplicated list changes
/// nothing.
///
/// [`Identity`]: crate::domain::sale::Identity
pub fn dedupe(records: impl IntoIterator<Item = Record>) -> Vec<Record> {
    let mut seen = HashSet::with_hasher(IdentityHasher::new());
    records.into_iter().filter(|r| seen.insert(r.identity())).collect()
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use common::{Date, Money};

    use crate::domain::{sale::Address, LatLng, Record};

    use super::dedupe;

    fn record(lat: f64, price: i64, day: u8, address: &str) -> Record {
        Record {
            position: LatLng::new(lat, 2.35).unwrap(),
            price: Some(Money::new(price.into())),
            date: Date::from_ymd(2023, 5, day),
            address: Address::new(address),
            mutation_id: None,
            lot: Default::default(),
            lots: vec![],
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(48.85, 100_000, 1, "a"),
            record(48.86, 100_000, 1, "b"),
            record(48.85, 100_000, 1, "c"),
            record(48.85, 100_000, 2, "d"),
            record(48.86, 100_000, 1, "e"),
            record(48.85, 120_000, 1, "f"),
        ]
    }

    #[test]
    fn keeps_first_seen() {
        let addresses = dedupe(sample())
            .into_iter()
            .map(|r| r.address.unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(addresses, ["a", "b", "d", "f"]);
    }

    #[test]
    fn is_idempotent() {
        let once = dedupe(sample());
        let twice = dedupe(once.clone());

        assert_eq!(once, twice);

        let identities =
            once.iter().map(Record::identity).collect::<HashSet<_>>();
        assert_eq!(identities.len(), once.len());
    }

    #[test]
    fn handles_empty_input() {
        assert!(dedupe(vec![]).is_empty());
    }
}
