//! [WMS] tile sources.
//!
//! [WMS]: https://www.ogc.org/standard/wms

use std::fmt::Write as _;

use smart_default::SmartDefault;

use crate::domain::Bbox;

/// WMS version requested by [`Source::get_map()`].
pub const VERSION: &str = "1.3.0";

/// Coordinate reference system requested by [`Source::get_map()`].
pub const CRS: &str = "EPSG:4326";

/// Description of a WMS layer drawn over a map.
///
/// Tiles are fetched by the map itself, so this is a pure passthrough
/// description.
#[derive(Clone, Debug, PartialEq, SmartDefault)]
pub struct Source {
    /// Base URL of the WMS service.
    pub url: String,

    /// Comma-separated names of the layers to draw.
    pub layers: String,

    /// Comma-separated styles of the layers, empty for the default ones.
    pub styles: String,

    /// Image MIME type.
    #[default = "image/png"]
    pub format: String,

    /// Whether the image background is transparent.
    #[default = true]
    pub transparent: bool,

    /// Opacity of the layer, within `[0, 1]`.
    #[default = 1.0]
    pub opacity: f64,

    /// Attribution displayed along with the layer.
    pub attribution: Option<String>,
}

impl Source {
    /// Builds a `GetMap` request URL of the provided [`Bbox`] rendered as a
    /// `width`x`height` pixels image.
    ///
    /// `EPSG:4326` axis order in WMS 1.3.0 is latitude first.
    #[must_use]
    pub fn get_map(&self, bbox: &Bbox, width: u32, height: u32) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{sep}SERVICE=WMS&VERSION={VERSION}&REQUEST=GetMap\
             &LAYERS={}&STYLES={}&FORMAT={}&TRANSPARENT={}&CRS={CRS}",
            self.url,
            encode(&self.layers),
            encode(&self.styles),
            encode(&self.format),
            if self.transparent { "TRUE" } else { "FALSE" },
        );
        _ = write!(
            url,
            "&BBOX={},{},{},{}&WIDTH={width}&HEIGHT={height}",
            bbox.south_west.lat,
            bbox.south_west.lng,
            bbox.north_east.lat,
            bbox.north_east.lng,
        );
        url
    }
}

/// Percent-encodes the characters of a WMS parameter value that cannot
/// appear in a query as is.
fn encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || b"-_.~,:".contains(&b) {
            out.push(char::from(b));
        } else {
            _ = write!(out, "%{b:02X}");
        }
    }
    out
}

#[cfg(test)]
mod spec {
    use crate::domain::Bbox;

    use super::Source;

    #[test]
    fn builds_get_map_url() {
        let source = Source {
            url: "https://wxs.ign.fr/essentiels/geoportail/r/wms".into(),
            layers: "CADASTRALPARCELS.PARCELLAIRE_EXPRESS".into(),
            styles: "line".into(),
            opacity: 0.6,
            ..Source::default()
        };
        let bbox: Bbox = "2.3,48.85,2.35,48.9".parse().unwrap();

        assert_eq!(
            source.get_map(&bbox, 256, 256),
            "https://wxs.ign.fr/essentiels/geoportail/r/wms?SERVICE=WMS\
             &VERSION=1.3.0&REQUEST=GetMap\
             &LAYERS=CADASTRALPARCELS.PARCELLAIRE_EXPRESS&STYLES=line\
             &FORMAT=image%2Fpng&TRANSPARENT=TRUE&CRS=EPSG:4326\
             &BBOX=48.85,2.3,48.9,2.35&WIDTH=256&HEIGHT=256",
        );
    }

    #[test]
    fn appends_to_existing_query() {
        let source = Source {
            url: "https://example.com/wms?map=risk".into(),
            layers: "ZONE_INONDABLE".into(),
            transparent: false,
            ..Source::default()
        };
        let bbox: Bbox = "1,2,3,4".parse().unwrap();

        let url = source.get_map(&bbox, 10, 20);

        assert!(url.starts_with("https://example.com/wms?map=risk&SERVICE=WMS"));
        assert!(url.contains("&TRANSPARENT=FALSE&"));
        assert!(url.ends_with("&BBOX=2,1,4,3&WIDTH=10&HEIGHT=20"));
    }
}
