//! Cadastral parcel ([API Carto]) definitions.
//!
//! [API Carto]: https://apicarto.ign.fr/api/doc/cadastre

use std::fmt;

use derive_more::{AsRef, Display, Into};

use super::LatLng;

/// [INSEE] code of a commune, like `75056` for Paris.
///
/// [INSEE]: https://www.insee.fr/fr/information/2560452
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(forward)]
pub struct InseeCode(String);

impl InseeCode {
    /// Creates a new [`InseeCode`] if the provided `code` consists of exactly
    /// 5 ASCII alphanumeric characters (Corsican codes contain letters).
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref().trim();
        (code.len() == 5 && code.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| Self(code.to_ascii_uppercase()))
    }
}

/// Query of the parcels to display.
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    /// All the parcels of a commune.
    Commune {
        /// [`InseeCode`] of the commune.
        insee: InseeCode,

        /// Maximum number of parcels to return.
        limit: u32,
    },

    /// Parcels containing a point.
    Point(LatLng),
}

/// Raw [GeoJSON] geometry of a parcel, passed through to a map as is.
///
/// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
#[derive(AsRef, Clone, Debug, Default, PartialEq)]
pub struct Geometry(serde_json::Value);

impl Geometry {
    /// Wraps the provided raw [GeoJSON] geometry.
    ///
    /// [GeoJSON]: https://datatracker.ietf.org/doc/html/rfc7946
    #[must_use]
    pub const fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    /// Returns the `type` of this [`Geometry`], like `MultiPolygon`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type")?.as_str()
    }
}

/// Single cadastral parcel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    /// Unique parcel identifier (`idu`), if known.
    pub id: Option<String>,

    /// Cadastral section, like `AB`.
    pub section: Option<String>,

    /// Parcel number inside its section, like `0042`.
    pub number: Option<String>,

    /// Commune name, if known.
    pub commune: Option<String>,

    /// Surface (`contenance`) in square meters, if known.
    pub area: Option<u64>,

    /// [`Geometry`] of this parcel.
    pub geometry: Geometry,
}

impl Feature {
    /// Returns the popup label of this parcel.
    #[must_use]
    pub fn label(&self) -> Label<'_> {
        Label(self)
    }
}

/// Popup label of a [`Feature`], rendered as `Parcelle: {section}-{number}`.
#[derive(Clone, Copy, Debug)]
pub struct Label<'a>(&'a Feature);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parcelle: {}-{}",
            self.0.section.as_deref().unwrap_or_default(),
            self.0.number.as_deref().unwrap_or_default(),
        )
    }
}

/// Collection of parcel [`Feature`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    /// [`Feature`]s of this [`Collection`].
    pub features: Vec<Feature>,
}

impl Collection {
    /// Indicates whether this [`Collection`] contains no [`Feature`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
