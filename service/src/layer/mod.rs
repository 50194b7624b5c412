//! Controllers of the layers drawn on a map [`Surface`].
//!
//! Controllers are driven from a single UI thread: listeners of [`Surface`]
//! events spawn their work with [`tokio::task::spawn_local()`], so they must
//! run inside a [`tokio::task::LocalSet`].
//!
//! [`Surface`]: crate::map::Surface

pub mod parcels;
pub mod sales;
pub mod tiles;

use std::cell::Cell;

pub use self::{parcels::Parcels, sales::Sales, tiles::Tiles};

common::define_kind! {
    #[doc = "Kind of a map layer."]
    enum Kind {
        #[doc = "Property sales ([DVF](https://www.data.gouv.fr/fr/datasets/demandes-de-valeurs-foncieres))."]
        Dvf = "dvf",

        #[doc = "Flood risk zones ([Géorisques](https://www.georisques.gouv.fr))."]
        Risk = "risk",

        #[doc = "Cadastral map tiles."]
        Cadastre = "cadastre",

        #[doc = "Cadastral parcels ([API Carto](https://apicarto.ign.fr/api/doc/cadastre))."]
        Parcels = "parcels",
    }
}

/// Monotonic sequence of requests issued by a layer.
///
/// Only a response to the latest issued request is allowed to be rendered,
/// so a slow stale response never overwrites a newer one.
#[derive(Debug, Default)]
pub struct Sequence(Cell<u64>);

impl Sequence {
    /// Issues a [`Ticket`] of a new request, invalidating all the previous
    /// ones.
    #[must_use]
    pub fn next(&self) -> Ticket {
        let n = self.0.get().wrapping_add(1);
        self.0.set(n);
        Ticket(n)
    }

    /// Invalidates all the issued [`Ticket`]s.
    pub fn invalidate(&self) {
        self.0.set(self.0.get().wrapping_add(1));
    }

    /// Indicates whether the provided [`Ticket`] is of the latest request.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.get() == ticket.0
    }
}

/// Ticket of a request issued by a [`Sequence`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket(u64);

#[cfg(test)]
mod spec {
    use super::{Kind, Sequence};

    #[test]
    fn latest_ticket_wins() {
        let seq = Sequence::default();

        let first = seq.next();
        assert!(seq.is_current(first));

        let second = seq.next();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));

        seq.invalidate();
        assert!(!seq.is_current(second));
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("DVF".parse::<Kind>().unwrap(), Kind::Dvf);
        assert_eq!(Kind::Parcels.to_string(), "parcels");
        assert_eq!(Kind::ALL.len(), 4);
        assert!("roads".parse::<Kind>().is_err());
    }
}
