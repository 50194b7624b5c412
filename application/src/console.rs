//! Console [`Surface`] implementation.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashSet},
    fmt,
    io,
    ops::RangeInclusive,
};

use service::{
    domain::{LatLng, Viewport, Zoom},
    map::{overlay, Events, MarkerClick, Overlay, Panel, Surface},
    view,
};
use tracing as log;

use crate::render;

/// Maximum distance (in degrees) between a click and the clicked marker.
const CLICK_TOLERANCE: f64 = 0.0005;

/// Headless map printing everything drawn on it as text.
#[derive(Debug)]
pub struct Console<W> {
    /// Output the map is printed to.
    out: RefCell<W>,

    /// Currently visible [`Viewport`].
    viewport: Cell<Viewport>,

    /// Allowed [`Zoom`] levels.
    zoom: RangeInclusive<Zoom>,

    /// [`Overlay`]s currently drawn.
    overlays: RefCell<BTreeMap<overlay::Id, Overlay>>,

    /// ID of the next added [`Overlay`].
    next_id: Cell<u64>,

    /// [`Panel`]s currently shown.
    panels: RefCell<HashSet<Panel>>,

    /// Whether the detail panel is shown.
    detail: Cell<bool>,

    /// [`Events`] emitted by this [`Console`].
    events: Events,
}

impl<W: io::Write> Console<W> {
    /// Creates a new [`Console`] showing the provided [`Viewport`].
    #[must_use]
    pub fn new(out: W, viewport: Viewport, zoom: RangeInclusive<Zoom>) -> Self {
        Self {
            out: RefCell::new(out),
            viewport: Cell::new(viewport),
            zoom,
            overlays: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            panels: RefCell::new(HashSet::new()),
            detail: Cell::new(false),
            events: Events::default(),
        }
    }

    /// Moves this map to the provided [`Viewport`], clamping its [`Zoom`] to
    /// the allowed levels, and notifies the `move_end` listeners.
    pub fn move_to(&self, mut viewport: Viewport) {
        let zoom = viewport
            .zoom
            .clamp(*self.zoom.start(), *self.zoom.end());
        if zoom != viewport.zoom {
            log::warn!("zoom {} is out of bounds, using {zoom}", viewport.zoom);
            viewport.zoom = zoom;
        }

        self.viewport.set(viewport);
        self.print(format_args!(
            "~ moved to `{}` at zoom {}",
            viewport.bbox.query(),
            viewport.zoom,
        ));
        self.events.move_end.emit(&viewport);
    }

    /// Clicks the marker nearest to the provided position, notifying the
    /// `marker_click` listeners.
    ///
    /// Returns `false` if there is no marker close enough.
    pub fn click(&self, position: LatLng) -> bool {
        let hit = self
            .overlays
            .borrow()
            .iter()
            .filter_map(|(id, o)| match o {
                Overlay::Markers(m) => Some((*id, m)),
                Overlay::Tiles(_) | Overlay::Parcels(_) => None,
            })
            .flat_map(|(id, markers)| markers.iter().map(move |m| (id, m)))
            .filter(|(_, m)| m.position.approx_eq(&position, CLICK_TOLERANCE))
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance2(&position)
                    .total_cmp(&b.position.distance2(&position))
            })
            .map(|(overlay, m)| MarkerClick {
                overlay,
                position: m.position,
            });

        let Some(click) = hit else {
            self.print(format_args!("? no marker at {position}"));
            return false;
        };
        self.events.marker_click.emit(&click);
        true
    }

    /// Prints the provided text on its own line.
    pub fn print(&self, text: impl fmt::Display) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            log::error!("failed to print to console: {e}");
        }
    }
}

impl<W: io::Write> Surface for Console<W> {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn add_overlay(&self, overlay: Overlay) -> overlay::Id {
        let id = overlay::Id::from(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let text = render::overlay(id, &overlay, &self.viewport.get());
        self.print(text.trim_end());
        _ = self.overlays.borrow_mut().insert(id, overlay);
        id
    }

    fn remove_overlay(&self, id: overlay::Id) {
        if self.overlays.borrow_mut().remove(&id).is_some() {
            self.print(format_args!("- overlay {id}"));
        } else {
            log::debug!("no overlay {id} to remove");
        }
    }

    fn set_panel(&self, panel: Panel, visible: bool) {
        let changed = if visible {
            self.panels.borrow_mut().insert(panel)
        } else {
            self.panels.borrow_mut().remove(&panel)
        };
        if changed {
            let sign = if visible { '+' } else { '-' };
            self.print(format_args!("{sign} panel: {panel}"));
        }
    }

    fn show_detail(&self, view: view::View) {
        self.detail.set(true);
        self.print(render::detail(&view).trim_end());
    }

    fn hide_detail(&self) {
        if self.detail.replace(false) {
            self.print("- detail");
        }
    }

    fn events(&self) -> &Events {
        &self.events
    }
}

#[cfg(test)]
impl Console<Vec<u8>> {
    /// Takes everything printed so far.
    pub(crate) fn take_output(&self) -> String {
        String::from_utf8(self.out.take()).unwrap()
    }
}

#[cfg(test)]
mod spec {
    use std::{cell::Cell, rc::Rc};

    use service::{
        domain::{sale::AddressKey, Bbox, LatLng, Viewport, Zoom},
        map::{overlay, Overlay, Panel, Surface as _},
        view::Marker,
    };

    use super::Console;

    fn console() -> Console<Vec<u8>> {
        let viewport = Viewport {
            bbox: "2.30,48.85,2.35,48.90".parse::<Bbox>().unwrap(),
            zoom: Zoom::from(12),
        };
        Console::new(vec![], viewport, Zoom::from(5)..=Zoom::from(18))
    }

    fn marker(lat: f64, lng: f64) -> Marker {
        let position = LatLng::new(lat, lng).unwrap();
        Marker {
            key: AddressKey::Position(position.into()),
            position,
            label: "N/C".into(),
        }
    }

    #[test]
    fn prints_overlays_and_panels() {
        let console = console();

        let id = console.add_overlay(Overlay::Markers(vec![marker(48.86, 2.31)]));
        console.set_panel(Panel::SalesLegend, true);
        console.set_panel(Panel::SalesLegend, true);
        console.remove_overlay(id);
        console.remove_overlay(id);
        console.set_panel(Panel::SalesLegend, false);
        console.hide_detail();

        assert_eq!(
            console.take_output(),
            "+ overlay #1: 1 markers\n  [48.860000, 2.310000] N/C\n\
             + panel: sales legend\n\
             - overlay #1\n\
             - panel: sales legend\n",
        );
    }

    #[test]
    fn move_clamps_zoom_and_notifies() {
        let console = console();
        let seen = Rc::new(Cell::new(None));
        let sub = console.events().move_end.subscribe({
            let seen = Rc::clone(&seen);
            move |v: &Viewport| seen.set(Some(v.zoom))
        });

        console.move_to(Viewport {
            bbox: "2.0,48.0,3.0,49.0".parse().unwrap(),
            zoom: Zoom::from(21),
        });

        assert_eq!(seen.get(), Some(Zoom::from(18)));
        assert_eq!(console.viewport().zoom, Zoom::from(18));
        sub.unsubscribe();
    }

    #[test]
    fn clicks_nearest_marker() {
        let console = console();
        let _empty = console.add_overlay(Overlay::Markers(vec![]));
        let id = console.add_overlay(Overlay::Markers(vec![
            marker(48.8600, 2.3100),
            marker(48.8603, 2.3100),
        ]));
        let clicked = Rc::new(Cell::new(None));
        let _sub = console.events().marker_click.subscribe({
            let clicked = Rc::clone(&clicked);
            move |c| clicked.set(Some((c.overlay, c.position)))
        });

        assert!(console.click(LatLng::new(48.8602, 2.3101).unwrap()));
        assert_eq!(
            clicked.get(),
            Some((id, LatLng::new(48.8603, 2.3100).unwrap())),
        );

        clicked.set(None);
        assert!(!console.click(LatLng::new(48.87, 2.31).unwrap()));
        assert_eq!(clicked.get(), None);
        assert_eq!(id, overlay::Id::from(2));
    }
}
