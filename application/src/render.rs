//! Text rendering of the map features.

use std::fmt::{self, Write as _};

use itertools::Itertools as _;
use service::{
    domain::{address::Suggestion, parcel, AddressGroup, Viewport},
    map::{overlay, Overlay},
    view::{self, detail::Lots, Marker},
};

/// Size (in pixels) of a rendered tile image.
const TILE_SIZE: u32 = 256;

/// Renders the provided [`Overlay`] added to a map showing the `viewport`.
#[must_use]
pub fn overlay(id: overlay::Id, overlay: &Overlay, viewport: &Viewport) -> String {
    let mut out = String::new();
    match overlay {
        Overlay::Markers(markers) => {
            _ = writeln!(out, "+ overlay {id}: {} markers", markers.len());
            for m in markers {
                _ = writeln!(out, "  {} {}", m.position, m.label);
            }
        }
        Overlay::Tiles(source) => {
            _ = writeln!(
                out,
                "+ overlay {id}: tiles `{}` (opacity {})",
                source.layers, source.opacity,
            );
            _ = writeln!(
                out,
                "  {}",
                source.get_map(&viewport.bbox, TILE_SIZE, TILE_SIZE),
            );
            if let Some(attribution) = &source.attribution {
                _ = writeln!(out, "  {attribution}");
            }
        }
        Overlay::Parcels(collection) => {
            _ = writeln!(
                out,
                "+ overlay {id}: {} parcels",
                collection.features.len(),
            );
            out.push_str(&parcels(collection));
        }
    }
    out
}

/// Renders the provided detail panel [`view::View`].
#[must_use]
pub fn detail(view: &view::View) -> String {
    let mut out = String::new();
    _ = writeln!(out, "== {} ==", view.address);
    for m in &view.mutations {
        _ = write!(out, "* {}: {}", m.date, m.price);
        if let Some(per_m2) = &m.price_per_m2 {
            _ = write!(out, " ({per_m2})");
        }
        out.push('\n');

        match &m.lots {
            Lots::Rows(rows) => {
                for r in rows {
                    _ = writeln!(
                        out,
                        "  - {} | {} | {} pièces | Carrez {}",
                        r.kind, r.surface, r.rooms, r.carrez,
                    );
                }
            }
            Lots::NoData => out.push_str("  - Aucune donnée sur les lots\n"),
        }
    }
    out
}

/// Renders the provided [`AddressGroup`]s as marker labels.
#[must_use]
pub fn groups(groups: &[AddressGroup]) -> String {
    lines(groups.iter().map(|g| {
        let m = Marker::from_group(g);
        format!("{} {}", m.position, m.label)
    }))
}

/// Renders the provided address [`Suggestion`]s.
#[must_use]
pub fn suggestions(found: &[Suggestion]) -> String {
    lines(found)
}

/// Renders the labels of the provided parcels.
#[must_use]
pub fn parcels(collection: &parcel::Collection) -> String {
    lines(collection.features.iter().map(|f| {
        let area = f.area.map(|a| format!(" ({a} m²)")).unwrap_or_default();
        format!("  {}{area}", f.label())
    }))
}

/// Renders the error banner of the provided base map failure.
#[must_use]
pub fn banner(e: &impl fmt::Display) -> String {
    let text = format!("Impossible d'afficher la carte: {e}");
    let line = "!".repeat(text.chars().count() + 4);
    format!("{line}\n! {text} !\n{line}")
}

/// Renders every item on its own line.
fn lines<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let mut out = items.into_iter().join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
