//! Map events and their listeners.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::domain::{LatLng, Viewport};

use super::overlay;

/// Events emitted by a [`Surface`].
///
/// [`Surface`]: super::Surface
#[derive(Debug, Default)]
pub struct Events {
    /// Map finished panning or zooming.
    pub move_end: Emitter<Viewport>,

    /// Marker was clicked.
    pub marker_click: Emitter<MarkerClick>,
}

/// Click on a marker of an [`Overlay`].
///
/// [`Overlay`]: super::Overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerClick {
    /// ID of the [`Overlay`] the clicked marker belongs to.
    ///
    /// [`Overlay`]: super::Overlay
    pub overlay: overlay::Id,

    /// Position of the clicked marker.
    pub position: LatLng,
}

/// Listener of `E` events.
type Listener<E> = Rc<dyn Fn(&E)>;

/// Registered listeners of an [`Emitter`].
struct Listeners<E> {
    /// Key of the next registered listener.
    next: u64,

    /// Registered listeners along with their keys.
    entries: Vec<(u64, Listener<E>)>,
}

/// Registry of `E` event listeners.
pub struct Emitter<E> {
    /// Registered listeners.
    listeners: Rc<RefCell<Listeners<E>>>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next: 0,
                entries: vec![],
            })),
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<E: 'static> Emitter<E> {
    /// Registers the provided `listener`.
    ///
    /// The `listener` stays registered until the returned [`Subscription`]
    /// is unsubscribed or dropped.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let listener: Listener<E> = Rc::new(listener);
        let key = {
            let mut listeners = self.listeners.borrow_mut();
            let key = listeners.next;
            listeners.next += 1;
            listeners.entries.push((key, listener));
            key
        };

        let weak: Weak<RefCell<Listeners<E>>> = Rc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().entries.retain(|(k, _)| *k != key);
                }
            })),
        }
    }
}

impl<E> Emitter<E> {
    /// Notifies all the registered listeners about the provided `event`.
    ///
    /// Listeners (un)subscribing while being notified don't affect the
    /// current notification.
    pub fn emit(&self, event: &E) {
        let snapshot = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect::<Vec<_>>();
        for listener in snapshot {
            (*listener)(event);
        }
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Indicates whether there are no registered listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration of a listener in an [`Emitter`].
///
/// Unregisters the listener once dropped.
#[must_use = "listener is unregistered once `Subscription` is dropped"]
pub struct Subscription {
    /// Unregistering of the listener, [`None`] once done.
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregisters the listener.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    /// Unregisters the listener, if not done yet.
    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
