//! [WMS] tiles layer controller.
//!
//! [WMS]: https://www.ogc.org/standard/wms

use std::cell::Cell;

use tracing as log;

use crate::{
    infra::wms,
    map::{overlay, Overlay, Panel, Surface},
};

use super::Kind;

/// Controller of a layer drawing [`wms::Source`] tiles.
#[derive(Debug)]
pub struct Tiles<S> {
    /// [`Kind`] of this layer.
    kind: Kind,

    /// [`wms::Source`] of the tiles.
    source: wms::Source,

    /// Legend shown along with the tiles.
    legend: Panel,

    /// Information panel shown once the layer is enabled for the first
    /// time, and kept afterwards.
    info: Option<Panel>,

    /// [`Surface`] the layer is drawn on.
    surface: S,

    /// Currently drawn tiles, if this layer is enabled.
    overlay: Cell<Option<overlay::Id>>,

    /// Whether the information panel has been shown already.
    info_shown: Cell<bool>,
}

impl<S: Surface> Tiles<S> {
    /// Creates a new disabled flood risk layer.
    #[must_use]
    pub fn risk(source: wms::Source, surface: S) -> Self {
        Self::new(
            Kind::Risk,
            source,
            Panel::RiskLegend,
            Some(Panel::RiskInfo),
            surface,
        )
    }

    /// Creates a new disabled cadastral map layer.
    #[must_use]
    pub fn cadastre(source: wms::Source, surface: S) -> Self {
        Self::new(Kind::Cadastre, source, Panel::CadastreLegend, None, surface)
    }

    /// Creates a new disabled [`Tiles`] layer.
    fn new(
        kind: Kind,
        source: wms::Source,
        legend: Panel,
        info: Option<Panel>,
        surface: S,
    ) -> Self {
        Self {
            kind,
            source,
            legend,
            info,
            surface,
            overlay: Cell::new(None),
            info_shown: Cell::new(false),
        }
    }

    /// Returns the [`Kind`] of this layer.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Indicates whether this layer is enabled.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.overlay.get().is_some()
    }

    /// Draws the tiles and shows the legend.
    ///
    /// Does nothing if this layer is enabled already.
    pub fn enable(&self) {
        if self.is_on() {
            return;
        }

        let id = self.surface.add_overlay(Overlay::Tiles(self.source.clone()));
        self.overlay.set(Some(id));
        self.surface.set_panel(self.legend, true);
        if let Some(info) = self.info {
            if !self.info_shown.replace(true) {
                self.surface.set_panel(info, true);
            }
        }

        log::info!("{} layer enabled", self.kind);
    }

    /// Removes the tiles and hides the legend.
    ///
    /// Does nothing if this layer is disabled already.
    pub fn disable(&self) {
        let Some(id) = self.overlay.take() else {
            log::warn!("no {} layer to hide", self.kind);
            return;
        };

        self.surface.remove_overlay(id);
        self.surface.set_panel(self.legend, false);

        log::info!("{} layer disabled", self.kind);
    }
}

#[cfg(test)]
mod spec {
    use std::rc::Rc;

    use crate::{
        infra::wms,
        map::{Overlay, Panel},
        mock::MockSurface,
    };

    use super::Tiles;

    fn source() -> wms::Source {
        wms::Source {
            url: "https://example.com/wms".into(),
            layers: "ZONE_INONDABLE".into(),
            opacity: 0.7,
            ..wms::Source::default()
        }
    }

    #[test]
    fn toggles_idempotently() {
        let surface = Rc::new(MockSurface::default());
        let layer = Tiles::risk(source(), Rc::clone(&surface));

        layer.enable();
        layer.enable();

        assert!(layer.is_on());
        assert_eq!(surface.added.get(), 1);
        assert!(matches!(
            surface.overlays.borrow().values().next(),
            Some(Overlay::Tiles(s)) if s.layers == "ZONE_INONDABLE",
        ));
        assert!(surface.is_panel_shown(Panel::RiskLegend));
        assert!(surface.is_panel_shown(Panel::RiskInfo));

        layer.disable();
        layer.disable();

        assert!(!layer.is_on());
        assert!(surface.overlays.borrow().is_empty());
        assert!(!surface.is_panel_shown(Panel::RiskLegend));
        assert!(surface.is_panel_shown(Panel::RiskInfo));
    }

    #[test]
    fn shows_info_once() {
        let surface = Rc::new(MockSurface::default());
        let layer = Tiles::risk(source(), Rc::clone(&surface));

        layer.enable();
        layer.disable();
        _ = surface.panels.borrow_mut().remove(&Panel::RiskInfo);
        layer.enable();

        assert!(!surface.is_panel_shown(Panel::RiskInfo));
        assert!(surface.is_panel_shown(Panel::RiskLegend));
    }

    #[test]
    fn cadastre_has_own_legend() {
        let surface = Rc::new(MockSurface::default());
        let layer = Tiles::cadastre(source(), Rc::clone(&surface));

        layer.enable();

        assert!(surface.is_panel_shown(Panel::CadastreLegend));
        assert!(!surface.is_panel_shown(Panel::RiskInfo));
    }
}
