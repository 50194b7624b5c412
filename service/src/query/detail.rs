//! [`Query`] of the sales at a clicked place.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{sale, Bbox, LatLng, Record},
    infra::{api, Api},
    pipeline, view, Query, Service,
};

/// Queries the detail [`view::View`] of the sales at a clicked marker.
///
/// [`None`] is returned if no sales are found at the position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detail {
    /// Position of the clicked marker.
    pub position: LatLng,
}

impl<A> Query<Detail> for Service<A>
where
    A: Api<
        Select<By<Vec<Record>, sale::Around>>,
        Ok = Vec<Record>,
        Err = Traced<api::Error>,
    >,
{
    type Ok = Option<view::View>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Detail { position }: Detail,
    ) -> Result<Self::Ok, Self::Err> {
        let conf = self.config();
        let around = sale::Around {
            bbox: Bbox::around(position, conf.detail_padding),
        };
        let records = self
            .api()
            .execute(Select(By::new(around)))
            .await
            .map_err(tracerr::wrap!())?;

        let fetched = records.len();
        let matching = records
            .into_iter()
            .filter(|r| r.position.approx_eq(&position, conf.match_tolerance))
            .collect::<Vec<_>>();
        log::debug!(
            "{} of {fetched} sales around {position} match it",
            matching.len(),
        );

        // Several places may fall within the tolerance, so the nearest one
        // is shown.
        let groups = pipeline::group(matching);
        Ok(groups
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance2(&position)
                    .total_cmp(&b.position.distance2(&position))
            })
            .map(view::View::from_group))
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use futures::executor::block_on;

    use crate::{
        domain::{
            sale::{Address, Area, LocalType},
            LatLng, Lot, Record,
        },
        mock::{self, MockApi},
        view::detail::Lots,
        Query as _,
    };

    use super::Detail;

    fn record(lat: f64, lng: f64, address: &str, year: i32) -> Record {
        Record {
            position: LatLng::new(lat, lng).unwrap(),
            price: Some(Money::new(320_000.into())),
            date: Date::from_ymd(year, 9, 1),
            address: Address::new(address),
            mutation_id: None,
            lot: Lot::default(),
            lots: vec![Lot {
                kind: LocalType::new("Maison"),
                surface: Some(Area::new(80.into())),
                carrez: None,
                rooms: Some(4),
            }],
        }
    }

    #[test]
    fn shows_nearest_matching_place() {
        let svc = mock::service(MockApi::default());
        svc.api().grouped.borrow_mut().push_back(mock::ready(vec![
            record(47.218_40, -1.553_60, "Near", 2021),
            record(47.218_40, -1.553_60, "Near", 2018),
            record(47.218_48, -1.553_68, "Close", 2020),
            record(47.218_60, -1.553_60, "Far", 2022),
        ]));
        let position = LatLng::new(47.218_41, -1.553_61).unwrap();

        let view = block_on(svc.execute(Detail { position }))
            .unwrap()
            .unwrap();

        let bbox = svc.api().around_queries.borrow()[0].bbox;
        assert_eq!(bbox.query(), "-1.55381,47.21821,-1.55341,47.21861");

        assert_eq!(view.address, "Near");
        assert_eq!(view.mutations.len(), 2);
        assert_eq!(view.mutations[0].date, "01/09/2021");
        assert!(matches!(view.mutations[0].lots, Lots::Rows(ref r) if r.len() == 1));
    }

    #[test]
    fn nothing_found() {
        let svc = mock::service(MockApi::default());
        svc.api()
            .grouped
            .borrow_mut()
            .push_back(mock::ready(vec![record(47.3, -1.5, "Far", 2022)]));

        let view = block_on(svc.execute(Detail {
            position: LatLng::new(47.2, -1.5).unwrap(),
        }))
        .unwrap();

        assert_eq!(view, None);
    }
}
