//! Sale ([DVF]) definitions.
//!
//! [DVF]: https://www.data.gouv.fr/fr/datasets/demandes-de-valeurs-foncieres

use std::fmt;

use common::{money, Date, Money};
use derive_more::{AsRef, Display};
use rust_decimal::Decimal;
use xxhash_rust::xxh3;

use super::{filter::Filter, viewport::Bbox, LatLng, SampleLimit};

/// Maximum difference between two Carrez surfaces still considered equal.
pub const CARREZ_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Single sale record (a transaction lot) returned by the sales service.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Geographic position of the sold property.
    pub position: LatLng,

    /// Price the whole transaction was concluded for.
    pub price: Option<Money>,

    /// [`Date`] of the transaction.
    pub date: Option<Date>,

    /// Display [`Address`] of the sold property.
    pub address: Option<Address>,

    /// ID of the transaction this [`Record`] is a part of.
    pub mutation_id: Option<MutationId>,

    /// [`Lot`] described by this [`Record`] itself.
    pub lot: Lot,

    /// [`Lot`]s attached to this [`Record`] by the grouped endpoint.
    pub lots: Vec<Lot>,
}

impl Record {
    /// Returns the [`Identity`] of this [`Record`].
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.position, self.price, self.date)
    }

    /// Returns [`Lot`]s of this [`Record`].
    ///
    /// Attached [`Lot`]s take precedence over the fields of the [`Record`]
    /// itself. Empty [`Lot`]s are never returned.
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        let own = (self.lots.is_empty() && !self.lot.is_empty())
            .then_some(&self.lot);
        self.lots.iter().filter(|l| !l.is_empty()).chain(own)
    }
}

/// Identity of a [`Record`] used for deduplication: its exact position,
/// price and date.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Identity {
    /// Bits of the latitude.
    lat: u64,

    /// Bits of the longitude.
    lng: u64,

    /// Price of the transaction.
    price: Option<Money>,

    /// [`Date`] of the transaction.
    date: Option<Date>,
}

impl Identity {
    /// Creates a new [`Identity`] of a [`Record`] out of its identity parts.
    #[must_use]
    pub fn new(
        position: LatLng,
        price: Option<Money>,
        date: Option<Date>,
    ) -> Self {
        // `0.0` and `-0.0` are the same coordinate.
        let bits = |v: f64| (v + 0.0).to_bits();

        Self {
            lat: bits(position.lat),
            lng: bits(position.lng),
            price,
            date,
        }
    }
}

/// [`BuildHasher`] of [`Identity`] sets.
///
/// [`BuildHasher`]: std::hash::BuildHasher
pub type IdentityHasher = xxh3::Xxh3Builder;

/// ID of a transaction (`id_mutation`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(forward)]
pub struct MutationId(String);

impl MutationId {
    /// Creates a new [`MutationId`] if the given `id` is not blank.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let id = id.trim();
        (!id.is_empty()).then(|| Self(id.to_owned()))
    }
}

/// Display address of a sold property.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given `address` is not blank.
    ///
    /// Inner whitespace runs are collapsed, so differently spaced spellings of
    /// the same address are equal.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address =
            address.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        (!address.is_empty()).then_some(Self(address))
    }
}

/// Category of a sold premise (`type_local`), like `Maison` or
/// `Appartement`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(forward)]
pub struct LocalType(String);

impl LocalType {
    /// Creates a new [`LocalType`] if the given `kind` is not blank.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Option<Self> {
        let kind = kind.into();
        let kind = kind.trim();
        (!kind.is_empty()).then(|| Self(kind.to_owned()))
    }
}

/// Surface in square meters.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Area(Decimal);

impl Area {
    /// Creates a new [`Area`] out of the provided square meters.
    #[must_use]
    pub const fn new(m2: Decimal) -> Self {
        Self(m2)
    }

    /// Returns the square meters of this [`Area`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}m²",
            money::format_fr(self.0.round_dp(2), None),
            money::UNIT_SEPARATOR,
        )
    }
}

/// Number of main rooms (`nombre_pieces_principales`).
pub type Rooms = u16;

/// Sub-unit of a [`Mutation`].
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Lot {
    /// [`LocalType`] of this [`Lot`].
    pub kind: Option<LocalType>,

    /// Built surface (`surface_reelle_bati`) of this [`Lot`].
    pub surface: Option<Area>,

    /// Carrez-law surface of this [`Lot`].
    pub carrez: Option<Area>,

    /// Number of main [`Rooms`] in this [`Lot`].
    pub rooms: Option<Rooms>,
}

impl Lot {
    /// Indicates whether this [`Lot`] carries no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.surface.is_none()
            && self.carrez.is_none()
            && self.rooms.is_none()
    }

    /// Indicates whether this [`Lot`] describes the same sub-unit as the
    /// `other` one.
    ///
    /// Carrez surfaces are compared with [`CARREZ_TOLERANCE`].
    #[must_use]
    pub fn is_same_as(&self, other: &Self) -> bool {
        let carrez = match (self.carrez, other.carrez) {
            (None, None) => true,
            (Some(a), Some(b)) => (a.0 - b.0).abs() < CARREZ_TOLERANCE,
            (Some(_), None) | (None, Some(_)) => false,
        };
        carrez
            && self.kind == other.kind
            && self.surface == other.surface
            && self.rooms == other.rooms
    }
}

/// Single transaction at a single address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mutation {
    /// ID of this [`Mutation`], if known.
    pub id: Option<MutationId>,

    /// [`Date`] of this [`Mutation`].
    pub date: Option<Date>,

    /// Price of this [`Mutation`].
    pub price: Option<Money>,

    /// Unique [`Lot`]s sold in this [`Mutation`], in first-seen order.
    pub lots: Vec<Lot>,
}

impl Mutation {
    /// Returns the total built surface of this [`Mutation`], if any is known.
    #[must_use]
    pub fn built_surface(&self) -> Option<Area> {
        self.lots
            .iter()
            .filter_map(|l| l.surface)
            .map(Area::value)
            .reduce(|a, b| a + b)
            .map(Area::new)
    }

    /// Returns the price per square meter of built surface, if both are
    /// known.
    #[must_use]
    pub fn price_per_m2(&self) -> Option<Money> {
        self.price?.per(self.built_surface()?.value())
    }
}

/// Key grouping [`Mutation`]s of the same place.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AddressKey {
    /// Known [`Address`].
    Address(Address),

    /// Rounded position of a place without a known [`Address`].
    Position(PositionKey),
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a}"),
            Self::Position(p) => write!(f, "{p}"),
        }
    }
}

/// Position rounded to 5 decimals (about a meter), usable as a key.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PositionKey {
    /// Latitude in 1e-5 degrees.
    lat: i64,

    /// Longitude in 1e-5 degrees.
    lng: i64,
}

impl From<LatLng> for PositionKey {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "valid coordinates fit easily"
    )]
    fn from(p: LatLng) -> Self {
        Self {
            lat: (p.lat * 1e5).round() as i64,
            lng: (p.lng * 1e5).round() as i64,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[expect(clippy::cast_precision_loss, reason = "small values")]
        let (lat, lng) = (self.lat as f64 / 1e5, self.lng as f64 / 1e5);
        write!(f, "{lat:.5}, {lng:.5}")
    }
}

/// [`Mutation`]s which happened at the same place.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressGroup {
    /// [`AddressKey`] of this [`AddressGroup`].
    pub key: AddressKey,

    /// Position of the first [`Record`] of this [`AddressGroup`].
    pub position: LatLng,

    /// [`Mutation`]s of this [`AddressGroup`], newest first.
    pub mutations: Vec<Mutation>,
}

impl AddressGroup {
    /// Returns the newest [`Mutation`] of this [`AddressGroup`].
    #[must_use]
    pub fn latest(&self) -> Option<&Mutation> {
        self.mutations.first()
    }
}

/// Sales query for a map area.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// [`Bbox`] of the area.
    pub bbox: Bbox,

    /// Maximum number of [`Record`]s to return.
    pub limit: SampleLimit,

    /// [`Filter`] of the [`Record`]s.
    pub filter: Filter,
}

/// Grouped sales query for a small area around a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Around {
    /// [`Bbox`] around the point.
    pub bbox: Bbox,
}
