//! [`Viewport`] definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error, From, Into};

/// Geographic position in the map display order (latitude first).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees, within `[-90, 90]`.
    pub lat: f64,

    /// Longitude in degrees, within `[-180, 180]`.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new [`LatLng`] if the provided coordinates are finite and
    /// within the valid ranges.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        Self::check(lat, lng).then_some(Self { lat, lng })
    }

    /// Checks whether the given coordinates form a valid [`LatLng`].
    fn check(lat: f64, lng: f64) -> bool {
        lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng)
    }

    /// Indicates whether the `other` position lies within `tolerance`
    /// degrees of this one on both axes.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance
            && (self.lng - other.lng).abs() <= tolerance
    }

    /// Returns the squared planar distance (in degrees²) to the `other`
    /// position.
    #[must_use]
    pub fn distance2(&self, other: &Self) -> f64 {
        (self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.6}, {:.6}]", self.lat, self.lng)
    }
}

impl From<LngLat> for LatLng {
    fn from(LngLat { lng, lat }: LngLat) -> Self {
        Self { lat, lng }
    }
}

/// Geographic position in the GeoJSON order (longitude first).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,

    /// Latitude in degrees.
    pub lat: f64,
}

impl From<LatLng> for LngLat {
    fn from(LatLng { lat, lng }: LatLng) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

/// Bounding box of a map area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bbox {
    /// South-west corner of this [`Bbox`].
    pub south_west: LatLng,

    /// North-east corner of this [`Bbox`].
    pub north_east: LatLng,
}

impl Bbox {
    /// Creates a new [`Bbox`] from its corners.
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates a [`Bbox`] spanning `padding` degrees around the `center` on
    /// each side.
    #[must_use]
    pub fn around(center: LatLng, padding: f64) -> Self {
        Self {
            south_west: LatLng {
                lat: center.lat - padding,
                lng: center.lng - padding,
            },
            north_east: LatLng {
                lat: center.lat + padding,
                lng: center.lng + padding,
            },
        }
    }

    /// Returns the center of this [`Bbox`].
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    /// Renders this [`Bbox`] as a `swLng,swLat,neLng,neLat` query value with
    /// 5 decimals of precision.
    #[must_use]
    pub fn query(&self) -> String {
        format!(
            "{:.5},{:.5},{:.5},{:.5}",
            self.south_west.lng,
            self.south_west.lat,
            self.north_east.lng,
            self.north_east.lat,
        )
    }
}

impl FromStr for Bbox {
    type Err = BboxParseError;

    /// Parses a `swLng,swLat,neLng,neLat` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use BboxParseError as E;

        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|_| E::NotANumber))
            .collect::<Result<Vec<_>, _>>()?;
        let [sw_lng, sw_lat, ne_lng, ne_lat] = parts[..] else {
            return Err(E::WrongArity(parts.len()));
        };

        let south_west = LatLng::new(sw_lat, sw_lng).ok_or(E::OutOfRange)?;
        let north_east = LatLng::new(ne_lat, ne_lng).ok_or(E::OutOfRange)?;
        if south_west.lat > north_east.lat || south_west.lng > north_east.lng {
            return Err(E::Inverted);
        }
        Ok(Self::new(south_west, north_east))
    }
}

/// Error of parsing a [`Bbox`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum BboxParseError {
    /// One of the components is not a number.
    #[display("bounding box component is not a number")]
    NotANumber,

    /// Wrong number of components.
    #[display("expected 4 bounding box components, got {_0}")]
    WrongArity(#[error(not(source))] usize),

    /// One of the corners lies outside the valid coordinate ranges.
    #[display("bounding box corner is out of range")]
    OutOfRange,

    /// South-west corner lies north or east of the north-east one.
    #[display("bounding box corners are inverted")]
    Inverted,
}

/// Zoom level of a map.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Zoom(u8);

impl FromStr for Zoom {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self).map_err(|_| "invalid `Zoom`")
    }
}

/// Maximum number of sales requested for a [`Viewport`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
pub struct SampleLimit(u16);

impl SampleLimit {
    /// Selects the [`SampleLimit`] for the provided [`Zoom`] level.
    ///
    /// The closer the map is zoomed in, the denser the sample can be.
    #[must_use]
    pub const fn for_zoom(zoom: Zoom) -> Self {
        Self(match zoom.0 {
            0..8 => 100,
            8..11 => 300,
            11..13 => 600,
            _ => 1000,
        })
    }
}

/// Visible area of a map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// [`Bbox`] of the visible area.
    pub bbox: Bbox,

    /// [`Zoom`] level of the map.
    pub zoom: Zoom,
}

impl Viewport {
    /// Returns the [`SampleLimit`] of this [`Viewport`].
    #[must_use]
    pub const fn limit(&self) -> SampleLimit {
        SampleLimit::for_zoom(self.zoom)
    }
}
