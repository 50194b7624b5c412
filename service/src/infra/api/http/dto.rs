//! Wire representations of the remote services' responses.
//!
//! Decoding is lenient: numbers may arrive as JSON numbers or as numeric
//! strings, and `null` or missing fields are treated as unknown values.

use common::{Date, Money};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::Deserialize;
use serde_json::Value;
use tracing as log;

use crate::domain::{
    address::Suggestion,
    parcel::{self, Geometry},
    sale::{Address, Area, LocalType, MutationId},
    LatLng, LngLat, Lot, Record,
};

/// Response of the sales service: either a plain array of records or a
/// [GeoJSON] `FeatureCollection` of them.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Sales {
    /// Plain array of records.
    List(Vec<Value>),

    /// `FeatureCollection` of records.
    Features {
        /// Raw features.
        features: Vec<Value>,
    },
}

impl Sales {
    /// Converts this response into valid [`Record`]s, skipping malformed
    /// ones.
    pub(super) fn into_records(self) -> Vec<Record> {
        let (raw, geojson) = match self {
            Self::List(raw) => (raw, false),
            Self::Features { features } => (features, true),
        };
        let total = raw.len();

        let records = raw
            .into_iter()
            .enumerate()
            .filter_map(|(n, v)| {
                let dto = if geojson {
                    serde_json::from_value::<SaleFeature>(v)
                        .map(SaleFeature::into_record)
                } else {
                    serde_json::from_value::<SaleRecord>(v)
                };
                let record = dto.ok().and_then(SaleRecord::into_domain);
                if record.is_none() {
                    log::debug!("skipping malformed sale record #{n}");
                }
                record
            })
            .collect::<Vec<_>>();

        if records.len() < total {
            log::debug!(
                "skipped {} of {total} sale records",
                total - records.len(),
            );
        }
        records
    }
}

/// [GeoJSON] feature wrapping a [`SaleRecord`].
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
#[derive(Debug, Deserialize)]
struct SaleFeature {
    /// Point geometry of the record.
    #[serde(default)]
    geometry: Option<PointGeometry>,

    /// Record itself.
    #[serde(default)]
    properties: SaleRecord,
}

impl SaleFeature {
    /// Unwraps the [`SaleRecord`], filling its missing coordinates from the
    /// geometry.
    fn into_record(self) -> SaleRecord {
        let mut record = self.properties;
        if let Some([lng, lat]) =
            self.geometry.and_then(PointGeometry::into_pair)
        {
            if record.latitude.is_null() {
                record.latitude = lat;
            }
            if record.longitude.is_null() {
                record.longitude = lng;
            }
        }
        record
    }
}

/// [GeoJSON] `Point` geometry.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
#[derive(Debug, Default, Deserialize)]
struct PointGeometry {
    /// `[lng, lat]` coordinates.
    #[serde(default)]
    coordinates: Vec<Value>,
}

impl PointGeometry {
    /// Returns the `[lng, lat]` pair of this [`PointGeometry`], if it has
    /// one.
    fn into_pair(self) -> Option<[Value; 2]> {
        let mut coords = self.coordinates.into_iter();
        Some([coords.next()?, coords.next()?])
    }
}

/// Raw sale record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaleRecord {
    #[serde(alias = "lat")]
    latitude: Value,
    #[serde(alias = "lon", alias = "lng")]
    longitude: Value,
    valeur_fonciere: Value,
    date_mutation: Value,
    id_mutation: Value,
    adresse: Value,
    #[serde(flatten)]
    lot: SaleLot,
    lots: Option<Vec<SaleLot>>,
}

impl SaleRecord {
    /// Converts this [`SaleRecord`] into a [`Record`], unless its position
    /// is missing or invalid.
    fn into_domain(self) -> Option<Record> {
        let position = LatLng::new(number(&self.latitude)?, number(&self.longitude)?)?;
        Some(Record {
            position,
            price: decimal(&self.valeur_fonciere).map(Money::new),
            date: text(&self.date_mutation)
                .and_then(|d| Date::from_iso(&d).ok()),
            address: text(&self.adresse).and_then(Address::new),
            mutation_id: text(&self.id_mutation).and_then(MutationId::new),
            lot: self.lot.into_domain(),
            lots: self
                .lots
                .unwrap_or_default()
                .into_iter()
                .map(SaleLot::into_domain)
                .collect(),
        })
    }
}

/// Raw lot of a sale.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaleLot {
    type_local: Value,
    surface_reelle_bati: Value,
    nombre_pieces_principales: Value,
    #[serde(
        rename = "Carrez",
        alias = "carrez",
        alias = "surface_carrez",
        alias = "lot1_surface_carrez"
    )]
    carrez: Value,
}

impl SaleLot {
    /// Converts this [`SaleLot`] into a [`Lot`].
    fn into_domain(self) -> Lot {
        Lot {
            kind: text(&self.type_local).and_then(LocalType::new),
            surface: decimal(&self.surface_reelle_bati).map(Area::new),
            carrez: decimal(&self.carrez).map(Area::new),
            rooms: decimal(&self.nombre_pieces_principales)
                .and_then(|r| r.trunc().to_u16()),
        }
    }
}

/// [GeoJSON] `FeatureCollection`.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
#[derive(Debug, Deserialize)]
pub(super) struct FeatureCollection<F> {
    /// Features of this collection.
    #[serde(default = "Vec::new")]
    pub(super) features: Vec<F>,
}

/// Address found by the [BAN] search.
///
/// [BAN]: https://adresse.data.gouv.fr
#[derive(Debug, Deserialize)]
pub(super) struct AddressFeature {
    #[serde(default)]
    geometry: PointGeometry,
    #[serde(default)]
    properties: AddressProperties,
}

/// Properties of an [`AddressFeature`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddressProperties {
    label: Value,
    postcode: Value,
    city: Value,
}

impl AddressFeature {
    /// Converts this [`AddressFeature`] into a [`Suggestion`], unless its
    /// label or position is missing.
    pub(super) fn into_domain(self) -> Option<Suggestion> {
        let [lng, lat] = self.geometry.into_pair()?;
        let LatLng { lat, lng } =
            LngLat::from([number(&lng)?, number(&lat)?]).into();
        Some(Suggestion {
            label: text(&self.properties.label)?,
            postcode: text(&self.properties.postcode),
            city: text(&self.properties.city),
            position: LatLng::new(lat, lng)?,
        })
    }
}

/// Cadastral parcel returned by [API Carto].
///
/// [API Carto]: https://apicarto.ign.fr/api/doc/cadastre
#[derive(Debug, Deserialize)]
pub(super) struct ParcelFeature {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    geometry: Value,
    #[serde(default)]
    properties: ParcelProperties,
}

/// Properties of a [`ParcelFeature`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParcelProperties {
    idu: Value,
    section: Value,
    numero: Value,
    nom_com: Value,
    contenance: Value,
}

impl ParcelFeature {
    /// Converts this [`ParcelFeature`] into a [`parcel::Feature`].
    pub(super) fn into_domain(self) -> parcel::Feature {
        let props = self.properties;
        parcel::Feature {
            id: text(&props.idu).or_else(|| text(&self.id)),
            section: text(&props.section),
            number: text(&props.numero),
            commune: text(&props.nom_com),
            area: decimal(&props.contenance).and_then(|a| a.trunc().to_u64()),
            geometry: Geometry::new(self.geometry),
        }
    }
}

/// Reads a non-blank string out of the provided JSON [`Value`].
///
/// Numbers are accepted as well, being rendered as strings.
fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}

/// Reads a [`Decimal`] out of the provided JSON [`Value`], accepting both
/// numbers and numeric strings (with a comma or a dot as the decimal
/// separator).
fn decimal(v: &Value) -> Option<Decimal> {
    let s = match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', "."),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return None;
        }
    };
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

/// Reads a finite [`f64`] out of the provided JSON [`Value`], accepting both
/// numbers and numeric strings.
fn number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse().ok()?,
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return None;
        }
    };
    n.is_finite().then_some(n)
}
