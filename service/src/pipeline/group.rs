//! [`group`] step.

use std::{cmp::Ordering, collections::BTreeMap};

use common::{Date, Money};
use itertools::Itertools as _;

use crate::domain::{
    sale::{Address, AddressKey, MutationId, PositionKey},
    AddressGroup, LatLng, Lot, Mutation, Record,
};

/// Groups the provided [`Record`]s into [`AddressGroup`]s.
///
/// [`Record`]s of the same transaction (sharing a [`MutationId`]) become a
/// single [`Mutation`] with deduplicated [`Lot`]s. [`Record`]s without a
/// [`MutationId`] are considered the same transaction when they share the
/// place, the [`Date`] and the price: both are part of their partition key,
/// so same-place sales differing in either become separate [`Mutation`]s.
///
/// The output is ordered by [`AddressKey`], and the [`Mutation`]s of each
/// [`AddressGroup`] are ordered newest first (unknown dates last).
pub fn group(records: impl IntoIterator<Item = Record>) -> Vec<AddressGroup> {
    let partitions = records
        .into_iter()
        .enumerate()
        .into_group_map_by(|(_, r)| Partition::of(r));

    let mut groups = BTreeMap::<AddressKey, Builder>::new();
    for records in partitions.into_values() {
        let Some((first, position)) =
            records.iter().map(|(i, r)| (*i, r.position)).min_by_key(|p| p.0)
        else {
            continue;
        };
        let key = records
            .iter()
            .find_map(|(_, r)| r.address.clone())
            .map_or_else(
                || AddressKey::Position(PositionKey::from(position)),
                AddressKey::Address,
            );

        let group = groups.entry(key).or_insert(Builder {
            first,
            position,
            mutations: vec![],
        });
        if first < group.first {
            group.first = first;
            group.position = position;
        }
        group.mutations.push(consolidate(records.iter().map(|(_, r)| r)));
    }

    groups
        .into_iter()
        .map(|(key, mut group)| {
            group.mutations.sort_by(newest_first);
            AddressGroup {
                key,
                position: group.position,
                mutations: group.mutations,
            }
        })
        .collect()
}

/// [`AddressGroup`] being built.
struct Builder {
    /// Index of the earliest [`Record`] of the group in the input.
    first: usize,

    /// Position of the earliest [`Record`].
    position: LatLng,

    /// [`Mutation`]s collected so far.
    mutations: Vec<Mutation>,
}

/// Key of the [`Record`]s belonging to the same [`Mutation`].
#[derive(Debug, Eq, Hash, PartialEq)]
enum Partition {
    /// Explicit transaction ID.
    Mutation(MutationId),

    /// Transaction at a known [`Address`].
    Address(Address, Option<Date>, Option<Money>),

    /// Transaction at an unaddressed position.
    Position(PositionKey, Option<Date>, Option<Money>),
}

impl Partition {
    /// Determines the [`Partition`] of the provided [`Record`].
    fn of(r: &Record) -> Self {
        if let Some(id) = &r.mutation_id {
            Self::Mutation(id.clone())
        } else if let Some(address) = &r.address {
            Self::Address(address.clone(), r.date, r.price)
        } else {
            Self::Position(r.position.into(), r.date, r.price)
        }
    }
}

/// Consolidates [`Record`]s of a single transaction into a [`Mutation`].
fn consolidate<'r>(records: impl Iterator<Item = &'r Record> + Clone) -> Mutation {
    let mut lots = Vec::<Lot>::new();
    for lot in records.clone().flat_map(Record::lots) {
        if !lots.iter().any(|l| l.is_same_as(lot)) {
            lots.push(lot.clone());
        }
    }

    Mutation {
        id: records.clone().find_map(|r| r.mutation_id.clone()),
        date: records.clone().find_map(|r| r.date),
        price: records.clone().find_map(|r| r.price),
        lots,
    }
}

/// Orders [`Mutation`]s newest first, placing unknown dates last.
fn newest_first(a: &Mutation, b: &Mutation) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.price.cmp(&b.price))
}
