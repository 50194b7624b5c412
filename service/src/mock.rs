//! In-memory [`Api`] replacement for tests.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap, VecDeque},
    future::Future,
    pin::Pin,
};

use common::operations::{By, Select};
use futures::channel::oneshot;
use tracerr::Traced;

use crate::{
    domain::{
        address::{Search, Suggestion},
        parcel, sale, Bbox, LatLng, Record, Viewport, Zoom,
    },
    infra::{api, Api},
    map::{overlay, Events, Overlay, Panel, Surface},
    view, Config, Service,
};

/// Pending reply of a [`MockApi`] operation.
pub(crate) type Reply<T> =
    Pin<Box<dyn Future<Output = Result<T, Traced<api::Error>>>>>;

/// Sender resolving a [`gated()`] [`Reply`].
pub(crate) type Gate<T> = oneshot::Sender<Result<T, Traced<api::Error>>>;

/// [`Api`] replying with queued [`Reply`]s and recording every request.
///
/// Once the queue of an operation is exhausted, it replies with an empty
/// result.
#[derive(Default)]
pub(crate) struct MockApi {
    pub(crate) sales: RefCell<VecDeque<Reply<Vec<Record>>>>,
    pub(crate) sale_queries: RefCell<Vec<sale::Query>>,
    pub(crate) grouped: RefCell<VecDeque<Reply<Vec<Record>>>>,
    pub(crate) around_queries: RefCell<Vec<sale::Around>>,
    pub(crate) suggestions: RefCell<VecDeque<Reply<Vec<Suggestion>>>>,
    pub(crate) searches: RefCell<Vec<Search>>,
    pub(crate) parcels: RefCell<VecDeque<Reply<parcel::Collection>>>,
    pub(crate) parcel_queries: RefCell<Vec<parcel::Query>>,
}

/// Creates a [`Service`] with the default [`Config`] over the provided
/// [`MockApi`].
pub(crate) fn service(api: MockApi) -> Service<MockApi> {
    Service::new(Config::default(), api)
}

/// Creates a [`Reply`] resolving immediately with the provided `value`.
pub(crate) fn ready<T: 'static>(value: T) -> Reply<T> {
    Box::pin(async move { Ok(value) })
}

/// Creates a [`Reply`] failing with the provided HTTP `status`.
pub(crate) fn failed<T: 'static>(status: u16) -> Reply<T> {
    Box::pin(async move { Err(tracerr::new!(api::Error::Status(status))) })
}

/// Creates a [`Reply`] resolving once its [`Gate`] is used.
pub(crate) fn gated<T: 'static>() -> (Gate<T>, Reply<T>) {
    let (tx, rx) = oneshot::channel();
    let reply: Reply<T> = Box::pin(async move {
        rx.await
            .unwrap_or_else(|_| Err(tracerr::new!(api::Error::Status(499))))
    });
    (tx, reply)
}

/// Pops the next queued [`Reply`] and awaits it.
async fn reply<T: Default>(
    queue: &RefCell<VecDeque<Reply<T>>>,
) -> Result<T, Traced<api::Error>> {
    let next = queue.borrow_mut().pop_front();
    match next {
        Some(reply) => reply.await,
        None => Ok(T::default()),
    }
}

impl Api<Select<By<Vec<Record>, sale::Query>>> for MockApi {
    type Ok = Vec<Record>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, sale::Query>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.sale_queries.borrow_mut().push(by.into_inner());
        reply(&self.sales).await
    }
}

impl Api<Select<By<Vec<Record>, sale::Around>>> for MockApi {
    type Ok = Vec<Record>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, sale::Around>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.around_queries.borrow_mut().push(by.into_inner());
        reply(&self.grouped).await
    }
}

impl Api<Select<By<Vec<Suggestion>, Search>>> for MockApi {
    type Ok = Vec<Suggestion>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Suggestion>, Search>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.searches.borrow_mut().push(by.into_inner());
        reply(&self.suggestions).await
    }
}

impl Api<Select<By<parcel::Collection, parcel::Query>>> for MockApi {
    type Ok = parcel::Collection;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<parcel::Collection, parcel::Query>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.parcel_queries.borrow_mut().push(by.into_inner());
        reply(&self.parcels).await
    }
}

/// Lets the tasks spawned on the current [`tokio::task::LocalSet`] run.
pub(crate) async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// [`Surface`] recording everything drawn on it.
pub(crate) struct MockSurface {
    pub(crate) viewport: Cell<Viewport>,
    pub(crate) overlays: RefCell<BTreeMap<overlay::Id, Overlay>>,
    pub(crate) added: Cell<usize>,
    pub(crate) panels: RefCell<HashMap<Panel, bool>>,
    pub(crate) detail: RefCell<Option<view::View>>,
    pub(crate) hidden_details: Cell<usize>,
    next_id: Cell<u64>,
    events: Events,
}

impl Default for MockSurface {
    fn default() -> Self {
        let paris = Bbox::new(
            LatLng { lat: 48.85, lng: 2.30 },
            LatLng { lat: 48.90, lng: 2.35 },
        );
        Self {
            viewport: Cell::new(Viewport {
                bbox: paris,
                zoom: Zoom::from(12),
            }),
            overlays: RefCell::default(),
            added: Cell::new(0),
            panels: RefCell::default(),
            detail: RefCell::default(),
            hidden_details: Cell::new(0),
            next_id: Cell::new(0),
            events: Events::default(),
        }
    }
}

impl MockSurface {
    /// Indicates whether the provided [`Panel`] is currently shown.
    pub(crate) fn is_panel_shown(&self, panel: Panel) -> bool {
        self.panels.borrow().get(&panel).copied().unwrap_or_default()
    }
}

impl Surface for MockSurface {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn add_overlay(&self, overlay: Overlay) -> overlay::Id {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.added.set(self.added.get() + 1);
        _ = self.overlays.borrow_mut().insert(id.into(), overlay);
        id.into()
    }

    fn remove_overlay(&self, id: overlay::Id) {
        _ = self.overlays.borrow_mut().remove(&id);
    }

    fn set_panel(&self, panel: Panel, visible: bool) {
        _ = self.panels.borrow_mut().insert(panel, visible);
    }

    fn show_detail(&self, view: view::View) {
        *self.detail.borrow_mut() = Some(view);
    }

    fn hide_detail(&self) {
        self.hidden_details.set(self.hidden_details.get() + 1);
        *self.detail.borrow_mut() = None;
    }

    fn events(&self) -> &Events {
        &self.events
    }
}
