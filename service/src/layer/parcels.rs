//! Cadastral parcels ([API Carto]) layer controller.
//!
//! [API Carto]: https://apicarto.ign.fr/api/doc/cadastre

use std::{cell::Cell, fmt, future::Future, rc::Rc};

use tracing as log;

use crate::{
    domain::parcel,
    map::{overlay, Overlay, Surface},
    query, Query,
};

use super::Sequence;

/// Controller of the layer drawing cadastral parcels outlines.
#[derive(Debug)]
pub struct Parcels<Svc, S> {
    /// Service querying the parcels.
    service: Svc,

    /// [`Surface`] the layer is drawn on.
    surface: S,

    /// [`parcel::Query`] of the drawn parcels.
    query: parcel::Query,

    /// Whether this layer is enabled.
    on: Cell<bool>,

    /// Currently drawn parcels, if loaded already.
    overlay: Cell<Option<overlay::Id>>,

    /// [`Sequence`] of the parcels requests.
    requests: Sequence,
}

impl<Svc, S> Parcels<Svc, S>
where
    Svc: Query<query::Parcels, Ok = parcel::Collection, Err: fmt::Display>
        + 'static,
    S: Surface + 'static,
{
    /// Creates a new disabled [`Parcels`] layer drawing the parcels
    /// selected by the provided [`parcel::Query`].
    #[must_use]
    pub fn new(service: Svc, surface: S, query: parcel::Query) -> Rc<Self> {
        Rc::new(Self {
            service,
            surface,
            query,
            on: Cell::new(false),
            overlay: Cell::new(None),
            requests: Sequence::default(),
        })
    }

    /// Indicates whether this layer is enabled.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    /// Enables this layer, loading and drawing the parcels.
    ///
    /// Does nothing if this layer is enabled already.
    pub fn enable(self: &Rc<Self>) -> impl Future<Output = ()> + 'static {
        let request = (!self.on.replace(true))
            .then(|| (self.requests.next(), Rc::clone(self)));

        async move {
            let Some((ticket, this)) = request else {
                return;
            };
            log::info!("loading cadastral parcels");

            let res = this
                .service
                .execute(query::Parcels::by(this.query.clone()))
                .await;
            if !this.requests.is_current(ticket) || !this.is_on() {
                log::warn!("discarding stale cadastral parcels");
                return;
            }
            match res {
                Ok(parcels) if parcels.is_empty() => {
                    log::warn!("no cadastral parcels found");
                }
                Ok(parcels) => {
                    let count = parcels.features.len();
                    if let Some(stale) = this.overlay.take() {
                        this.surface.remove_overlay(stale);
                    }
                    let id = this.surface.add_overlay(Overlay::Parcels(parcels));
                    this.overlay.set(Some(id));
                    log::info!("cadastral parcels loaded ({count} features)");
                }
                Err(e) => log::error!("failed to load cadastral parcels: {e}"),
            }
        }
    }

    /// Disables this layer, removing the drawn parcels.
    ///
    /// A pending load is discarded once it completes.
    pub fn disable(&self) {
        if !self.on.replace(false) {
            return;
        }
        self.requests.invalidate();
        if let Some(id) = self.overlay.take() {
            self.surface.remove_overlay(id);
            log::info!("cadastral parcels removed");
        }
    }
}
