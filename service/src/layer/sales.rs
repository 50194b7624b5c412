//! Sales ([DVF]) layer controller.
//!
//! [DVF]: https://www.data.gouv.fr/fr/datasets/demandes-de-valeurs-foncieres

use std::{
    cell::RefCell,
    fmt,
    future::Future,
    rc::{Rc, Weak},
};

use tracing as log;

use crate::{
    domain::{AddressGroup, Filter, LatLng, Viewport},
    map::{overlay, Overlay, Panel, Subscription, Surface},
    query, view, Query,
};

use super::Sequence;

/// Panels shown along with the sales layer.
const PANELS: [Panel; 2] = [Panel::SalesFilters, Panel::SalesLegend];

/// State of a [`Sales`] layer.
#[derive(Debug)]
enum State {
    /// Layer is hidden and doesn't listen to the map.
    Off,

    /// Layer is shown and follows the map.
    On {
        /// Currently drawn markers, if any were rendered yet.
        overlay: Option<overlay::Id>,

        /// Subscriptions to the map events.
        subscriptions: Vec<Subscription>,
    },
}

/// Controller of the sales layer.
///
/// Follows the map while enabled: every finished pan or zoom refetches the
/// sales of the visible area and redraws their markers, and a click on a
/// marker opens the detail panel of the place.
#[derive(Debug)]
pub struct Sales<Svc, S> {
    /// Service querying the sales.
    service: Svc,

    /// [`Surface`] the layer is drawn on.
    surface: S,

    /// Current [`State`] of this layer.
    state: RefCell<State>,

    /// [`Filter`] applied to the queried sales.
    filter: RefCell<Filter>,

    /// [`Sequence`] of the sales requests.
    requests: Sequence,

    /// [`Sequence`] of the detail requests.
    details: Sequence,
}

impl<Svc, S> Sales<Svc, S>
where
    Svc: Query<query::Sales, Ok = Vec<AddressGroup>, Err: fmt::Display>
        + Query<query::Detail, Ok = Option<view::View>, Err: fmt::Display>
        + 'static,
    S: Surface + 'static,
{
    /// Creates a new disabled [`Sales`] layer.
    #[must_use]
    pub fn new(service: Svc, surface: S) -> Rc<Self> {
        Rc::new(Self {
            service,
            surface,
            state: RefCell::new(State::Off),
            filter: RefCell::new(Filter::default()),
            requests: Sequence::default(),
            details: Sequence::default(),
        })
    }

    /// Indicates whether this layer is enabled.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(*self.state.borrow(), State::On { .. })
    }

    /// Returns the currently applied [`Filter`].
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter.borrow().clone()
    }

    /// Enables this layer: starts following the map, shows the filter
    /// panels, and fetches the sales of the visible area.
    ///
    /// Does nothing if this layer is enabled already.
    pub fn enable(self: &Rc<Self>) -> impl Future<Output = ()> + 'static {
        let fetch = (!self.is_on()).then(|| {
            let subscriptions = self.listen();
            *self.state.borrow_mut() = State::On {
                overlay: None,
                subscriptions,
            };
            for panel in PANELS {
                self.surface.set_panel(panel, true);
            }
            log::info!("sales layer enabled");

            self.refresh()
        });

        async move {
            if let Some(fetch) = fetch {
                fetch.await;
            }
        }
    }

    /// Disables this layer: stops following the map, removes the markers,
    /// hides the filter panels and closes the detail panel.
    ///
    /// Responses to the requests still in flight are discarded once they
    /// arrive. Does nothing if this layer is disabled already.
    pub fn disable(&self) {
        let State::On {
            overlay,
            subscriptions,
        } = self.state.replace(State::Off)
        else {
            return;
        };

        self.requests.invalidate();
        self.details.invalidate();
        for sub in subscriptions {
            sub.unsubscribe();
        }
        if let Some(id) = overlay {
            self.surface.remove_overlay(id);
        }
        for panel in PANELS {
            self.surface.set_panel(panel, false);
        }
        self.surface.hide_detail();

        log::info!("sales layer disabled");
    }

    /// Refetches the sales of the currently visible area.
    ///
    /// Does nothing if this layer is disabled.
    pub fn refresh(self: &Rc<Self>) -> impl Future<Output = ()> + 'static {
        self.fetch(self.surface.viewport())
    }

    /// Applies the provided [`Filter`] and refetches the sales.
    ///
    /// The [`Filter`] is remembered even if this layer is disabled, so it's
    /// used once the layer is enabled.
    pub fn apply(
        self: &Rc<Self>,
        filter: Filter,
    ) -> impl Future<Output = ()> + 'static {
        log::debug!("applying sales filter: {:?}", filter.params());
        *self.filter.borrow_mut() = filter;
        self.refresh()
    }

    /// Opens the detail panel of the sales at the provided position.
    pub fn open_detail(
        self: &Rc<Self>,
        position: LatLng,
    ) -> impl Future<Output = ()> + 'static {
        let ticket = self.details.next();
        let this = Rc::clone(self);

        async move {
            let res = this.service.execute(query::Detail { position }).await;
            if !this.details.is_current(ticket) || !this.is_on() {
                log::warn!("discarding stale sales detail of {position}");
                return;
            }
            match res {
                Ok(Some(view)) => this.surface.show_detail(view),
                Ok(None) => log::warn!("no sales found at {position}"),
                Err(e) => log::error!("failed to fetch sales at {position}: {e}"),
            }
        }
    }

    /// Closes the detail panel.
    ///
    /// Safe to call when the panel is hidden already.
    pub fn close_detail(&self) {
        self.details.invalidate();
        self.surface.hide_detail();
    }

    /// Fetches and renders the sales within the provided [`Viewport`].
    fn fetch(
        self: &Rc<Self>,
        viewport: Viewport,
    ) -> impl Future<Output = ()> + 'static {
        let request = self.is_on().then(|| {
            let query = query::Sales {
                viewport,
                filter: self.filter(),
            };
            (self.requests.next(), query, Rc::clone(self))
        });

        async move {
            let Some((ticket, query, this)) = request else {
                log::debug!("sales layer is disabled, skipping fetch");
                return;
            };
            let bbox = query.viewport.bbox.query();

            let res = this.service.execute(query).await;
            if !this.requests.is_current(ticket) || !this.is_on() {
                log::warn!("discarding stale sales response for `{bbox}`");
                return;
            }
            match res {
                Ok(groups) if groups.is_empty() => {
                    log::warn!("no sales found within `{bbox}`");
                }
                Ok(groups) => this.render(&groups),
                Err(e) => {
                    log::error!("failed to fetch sales within `{bbox}`: {e}");
                }
            }
        }
    }

    /// Replaces the drawn markers with the ones of the provided
    /// [`AddressGroup`]s.
    fn render(&self, groups: &[AddressGroup]) {
        let stale = match &mut *self.state.borrow_mut() {
            State::On { overlay, .. } => overlay.take(),
            State::Off => return,
        };
        if let Some(id) = stale {
            self.surface.remove_overlay(id);
        }

        let markers = groups
            .iter()
            .map(view::Marker::from_group)
            .collect::<Vec<_>>();
        let count = markers.len();
        let id = self.surface.add_overlay(Overlay::Markers(markers));
        if let State::On { overlay, .. } = &mut *self.state.borrow_mut() {
            *overlay = Some(id);
        }

        log::info!("rendered {count} sales markers");
    }

    /// Subscribes this layer to the [`Surface`] events.
    fn listen(self: &Rc<Self>) -> Vec<Subscription> {
        let events = self.surface.events();

        let this = Rc::downgrade(self);
        let on_move = events.move_end.subscribe(move |viewport| {
            if let Some(this) = Weak::upgrade(&this) {
                _ = tokio::task::spawn_local(this.fetch(*viewport));
            }
        });

        let this = Rc::downgrade(self);
        let on_click = events.marker_click.subscribe(move |click| {
            let Some(this) = Weak::upgrade(&this) else {
                return;
            };
            let own = matches!(
                *this.state.borrow(),
                State::On { overlay: Some(id), .. } if id == click.overlay,
            );
            if own {
                _ = tokio::task::spawn_local(this.open_detail(click.position));
            }
        });

        vec![on_move, on_click]
    }
}
