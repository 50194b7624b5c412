//! Abstraction of a map the layers are drawn on.
//!
//! The map widget itself (base tiles, panning, DOM) is an external
//! collaborator, represented by a [`Surface`].

pub mod event;
pub mod overlay;

use std::rc::Rc;

use derive_more::Display;

use crate::{domain::Viewport, view};

pub use self::{
    event::{Emitter, Events, MarkerClick, Subscription},
    overlay::Overlay,
};

/// Side panel of a map.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Panel {
    /// Sales filter form with its apply button.
    #[display("sales filters")]
    SalesFilters,

    /// Legend of the sales markers.
    #[display("sales legend")]
    SalesLegend,

    /// Legend of the flood risk zones.
    #[display("risk legend")]
    RiskLegend,

    /// Information about the flood risk data source.
    #[display("risk info")]
    RiskInfo,

    /// Legend of the cadastral parcels.
    #[display("cadastre legend")]
    CadastreLegend,
}

/// Map the layers are drawn on.
///
/// All the methods are invoked from a single UI thread, so implementations
/// are expected to use interior mutability.
pub trait Surface {
    /// Returns the currently visible [`Viewport`].
    fn viewport(&self) -> Viewport;

    /// Adds the provided [`Overlay`] to this [`Surface`].
    fn add_overlay(&self, overlay: Overlay) -> overlay::Id;

    /// Removes the [`Overlay`] with the provided [`overlay::Id`].
    ///
    /// Unknown IDs are ignored.
    fn remove_overlay(&self, id: overlay::Id);

    /// Shows or hides the provided [`Panel`].
    fn set_panel(&self, panel: Panel, visible: bool);

    /// Shows the detail panel with the provided [`view::View`], replacing
    /// the shown one, if any.
    fn show_detail(&self, view: view::View);

    /// Hides the detail panel.
    ///
    /// Does nothing if it's hidden already.
    fn hide_detail(&self);

    /// Returns [`Events`] emitted by this [`Surface`].
    fn events(&self) -> &Events;
}

impl<S: Surface + ?Sized> Surface for Rc<S> {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn add_overlay(&self, overlay: Overlay) -> overlay::Id {
        (**self).add_overlay(overlay)
    }

    fn remove_overlay(&self, id: overlay::Id) {
        (**self).remove_overlay(id);
    }

    fn set_panel(&self, panel: Panel, visible: bool) {
        (**self).set_panel(panel, visible);
    }

    fn show_detail(&self, view: view::View) {
        (**self).show_detail(view);
    }

    fn hide_detail(&self) {
        (**self).hide_detail();
    }

    fn events(&self) -> &Events {
        (**self).events()
    }
}
