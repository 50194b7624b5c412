//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use serde::Deserialize;
use service::{
    domain::{parcel, Bbox, LatLng, Viewport, Zoom},
    infra::{api::http, wms},
};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote APIs configuration.
    pub api: Api,

    /// Base map configuration.
    pub map: Map,

    /// Tile layers configuration.
    pub layers: Layers,

    /// Address search configuration.
    pub search: Search,

    /// Cadastral parcels configuration.
    pub parcels: Parcels,

    /// Service configuration.
    pub service: Service,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Remote APIs configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Sales service endpoint.
    #[default("http://localhost:8000/api/dvf".to_owned())]
    pub sales: String,

    /// Address search endpoint.
    #[default("https://api-adresse.data.gouv.fr/search/".to_owned())]
    pub address: String,

    /// Cadastral parcels endpoint.
    #[default("https://apicarto.ign.fr/api/cadastre/parcelle".to_owned())]
    pub parcels: String,

    /// Timeout of every request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Api> for http::Config {
    fn from(value: Api) -> Self {
        let Api {
            sales,
            address,
            parcels,
            timeout,
        } = value;
        Self {
            sales,
            address,
            parcels,
            timeout,
        }
    }
}

/// Base map configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Map {
    /// Latitude of the initial map center.
    #[default(46.603_354)]
    pub lat: f64,

    /// Longitude of the initial map center.
    #[default(1.888_334)]
    pub lng: f64,

    /// Initial zoom level.
    #[default(6)]
    pub zoom: u8,

    /// Minimal allowed zoom level.
    #[default(5)]
    pub min_zoom: u8,

    /// Maximal allowed zoom level.
    #[default(18)]
    pub max_zoom: u8,

    /// Width of the visible area, in degrees of longitude.
    #[default(12.0)]
    pub width: f64,

    /// Height of the visible area, in degrees of latitude.
    #[default(9.0)]
    pub height: f64,
}

impl Map {
    /// Returns the initial [`Viewport`] of the map.
    ///
    /// # Errors
    ///
    /// If the configured map area is not a valid one.
    pub fn viewport(&self) -> Result<Viewport, MapError> {
        if !(self.min_zoom..=self.max_zoom).contains(&self.zoom) {
            return Err(MapError::ZoomOutOfBounds {
                zoom: self.zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(MapError::EmptyArea);
        }

        let center =
            LatLng::new(self.lat, self.lng).ok_or(MapError::InvalidCenter)?;
        let (dlat, dlng) = (self.height / 2.0, self.width / 2.0);
        let south_west = LatLng::new(center.lat - dlat, center.lng - dlng)
            .ok_or(MapError::AreaOutOfRange)?;
        let north_east = LatLng::new(center.lat + dlat, center.lng + dlng)
            .ok_or(MapError::AreaOutOfRange)?;

        Ok(Viewport {
            bbox: Bbox::new(south_west, north_east),
            zoom: Zoom::from(self.zoom),
        })
    }
}

/// Error of initializing a base map out of its [`Map`] configuration.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum MapError {
    /// Center is not a valid position.
    #[display("map center is not a valid position")]
    InvalidCenter,

    /// Zoom level is outside the allowed bounds.
    #[display("zoom level {zoom} is outside of [{min}, {max}]")]
    ZoomOutOfBounds {
        /// Configured zoom level.
        zoom: u8,

        /// Minimal allowed zoom level.
        min: u8,

        /// Maximal allowed zoom level.
        max: u8,
    },

    /// Visible area has no width or height.
    #[display("visible map area is empty")]
    EmptyArea,

    /// Visible area exceeds the valid coordinate ranges.
    #[display("visible map area exceeds valid coordinates")]
    AreaOutOfRange,
}

/// Tile layers configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Layers {
    /// Flood risk layer configuration.
    pub risk: RiskLayer,

    /// Cadastral map layer configuration.
    pub cadastre: CadastreLayer,
}

/// Flood risk ([Géorisques]) layer configuration.
///
/// [Géorisques]: https://www.georisques.gouv.fr
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct RiskLayer {
    /// WMS service URL.
    #[default(
        "https://www.georisques.gouv.fr/services/zonages_inondation/mapserver/wms"
            .to_owned()
    )]
    pub url: String,

    /// Names of the drawn WMS layers.
    #[default("ZONE_INONDABLE".to_owned())]
    pub layers: String,

    /// Image MIME type.
    #[default("image/png".to_owned())]
    pub format: String,

    /// Whether the image background is transparent.
    #[default(true)]
    pub transparent: bool,

    /// Opacity of the layer.
    #[default(0.7)]
    pub opacity: f64,
}

impl From<RiskLayer> for wms::Source {
    fn from(value: RiskLayer) -> Self {
        let RiskLayer {
            url,
            layers,
            format,
            transparent,
            opacity,
        } = value;
        Self {
            url,
            layers,
            styles: String::new(),
            format,
            transparent,
            opacity,
            attribution: Some("Données © Géorisques".to_owned()),
        }
    }
}

/// Cadastral map ([IGN]) layer configuration.
///
/// [IGN]: https://geoservices.ign.fr
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct CadastreLayer {
    /// WMS service URL.
    #[default("https://wxs.ign.fr/essentiels/geoportail/r/wms".to_owned())]
    pub url: String,

    /// Names of the drawn WMS layers.
    #[default("CADASTRALPARCELS.PARCELLAIRE_EXPRESS".to_owned())]
    pub layers: String,

    /// Styles of the drawn WMS layers.
    #[default("line".to_owned())]
    pub styles: String,

    /// Image MIME type.
    #[default("image/png".to_owned())]
    pub format: String,

    /// Whether the image background is transparent.
    #[default(true)]
    pub transparent: bool,

    /// Opacity of the layer.
    #[default(0.6)]
    pub opacity: f64,
}

impl From<CadastreLayer> for wms::Source {
    fn from(value: CadastreLayer) -> Self {
        let CadastreLayer {
            url,
            layers,
            styles,
            format,
            transparent,
            opacity,
        } = value;
        Self {
            url,
            layers,
            styles,
            format,
            transparent,
            opacity,
            attribution: Some("Cadastre © IGN".to_owned()),
        }
    }
}

/// Address search configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Search {
    /// Default maximum number of suggestions.
    #[default(5)]
    pub limit: u8,
}

/// Cadastral parcels configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Parcels {
    /// INSEE code of the commune whose parcels are drawn.
    #[default("75056".to_owned())]
    pub insee: String,

    /// Maximum number of drawn parcels.
    #[default(1000)]
    pub limit: u32,
}

impl Parcels {
    /// Returns the [`parcel::Query`] of the configured commune.
    ///
    /// [`None`] is returned if the configured INSEE code is invalid.
    #[must_use]
    pub fn query(&self) -> Option<parcel::Query> {
        Some(parcel::Query::Commune {
            insee: parcel::InseeCode::new(&self.insee)?,
            limit: self.limit,
        })
    }
}

/// Service configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Padding (in degrees) of the area fetched around a clicked marker.
    #[default(0.0002)]
    pub detail_padding: f64,

    /// Maximum distance (in degrees) between a clicked marker and the sales
    /// located at it.
    #[default(0.0001)]
    pub match_tolerance: f64,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            detail_padding,
            match_tolerance,
        } = value;
        Self {
            detail_padding,
            match_tolerance,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Config, Map, MapError};

    #[test]
    fn defaults_show_france() {
        let viewport = Map::default().viewport().unwrap();

        assert_eq!(u8::from(viewport.zoom), 6);
        assert!(viewport.bbox.center().approx_eq(
            &service::domain::LatLng::new(46.603_354, 1.888_334).unwrap(),
            1e-9,
        ));
    }

    #[test]
    fn rejects_invalid_maps() {
        let map = |m: Map| m.viewport().unwrap_err();

        assert!(matches!(
            map(Map { zoom: 19, ..Map::default() }),
            MapError::ZoomOutOfBounds { zoom: 19, .. },
        ));
        assert!(matches!(
            map(Map { lat: f64::NAN, ..Map::default() }),
            MapError::InvalidCenter,
        ));
        assert!(matches!(
            map(Map { width: 0.0, ..Map::default() }),
            MapError::EmptyArea,
        ));
        assert!(matches!(
            map(Map { lat: 89.0, ..Map::default() }),
            MapError::AreaOutOfRange,
        ));
    }

    #[test]
    fn loads_defaults_without_file() {
        let conf = Config::new("surely-missing-config-file").unwrap();

        assert_eq!(conf.api.timeout.as_secs(), 10);
        assert_eq!(conf.search.limit, 5);
        assert_eq!(conf.parcels.limit, 1000);
        assert!(conf.parcels.query().is_some());
        assert_eq!(conf.layers.risk.layers, "ZONE_INONDABLE");
        assert_eq!(conf.layers.cadastre.styles, "line");
    }
}
