//! [`Query`] of the sales shown on a map.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{sale, AddressGroup, Filter, Record, Viewport},
    infra::{api, Api},
    pipeline, Query, Service,
};

/// Queries [`AddressGroup`]s of the sales within a [`Viewport`].
#[derive(Clone, Debug, PartialEq)]
pub struct Sales {
    /// [`Viewport`] to query the sales within.
    pub viewport: Viewport,

    /// [`Filter`] of the sales.
    pub filter: Filter,
}

impl<A> Query<Sales> for Service<A>
where
    A: Api<
        Select<By<Vec<Record>, sale::Query>>,
        Ok = Vec<Record>,
        Err = Traced<api::Error>,
    >,
{
    type Ok = Vec<AddressGroup>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Sales { viewport, filter }: Sales,
    ) -> Result<Self::Ok, Self::Err> {
        let query = sale::Query {
            bbox: viewport.bbox,
            limit: viewport.limit(),
            filter,
        };
        let records = self
            .api()
            .execute(Select(By::new(query.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        let fetched = records.len();
        let records = pipeline::dedupe(records);
        let unique = records.len();
        let groups = query.filter.apply(pipeline::group(records));
        log::debug!(
            "{fetched} sales fetched for `{}` (limit {}), {unique} unique, \
             {} places after filtering",
            query.bbox.query(),
            query.limit,
            groups.len(),
        );

        Ok(groups)
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use futures::executor::block_on;

    use crate::{
        domain::{
            sale::{Address, Area, LocalType, MutationId},
            Bbox, Filter, LatLng, Lot, Record, Viewport, Zoom,
        },
        mock::{self, MockApi},
        Query as _,
    };

    use super::Sales;

    fn record(lat: f64, carrez: &str, price: i64) -> Record {
        Record {
            position: LatLng::new(lat, 2.33).unwrap(),
            price: Some(Money::new(price.into())),
            date: Date::from_ymd(2024, 4, 2),
            address: Address::new("10 Rue Soufflot 75005 Paris"),
            mutation_id: MutationId::new("2024-001"),
            lot: Lot {
                kind: LocalType::new("Appartement"),
                surface: Some(Area::new(50.into())),
                carrez: Some(Area::new(carrez.parse().unwrap())),
                rooms: Some(2),
            },
            lots: vec![],
        }
    }

    fn viewport() -> Viewport {
        Viewport {
            bbox: "2.30,48.85,2.35,48.90".parse::<Bbox>().unwrap(),
            zoom: Zoom::from(12),
        }
    }

    #[test]
    fn groups_lots_of_one_mutation() {
        let svc = mock::service(MockApi::default());
        svc.api().sales.borrow_mut().push_back(mock::ready(vec![
            record(48.861, "48.10", 500_000),
            record(48.862, "12.00", 500_000),
            record(48.863, "48.104", 500_000),
        ]));

        let groups = block_on(svc.execute(Sales {
            viewport: viewport(),
            filter: Filter::default(),
        }))
        .unwrap();

        let query = &svc.api().sale_queries.borrow()[0];
        assert_eq!(query.bbox.query(), "2.30000,48.85000,2.35000,48.90000");
        assert_eq!(u16::from(query.limit), 600);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mutations.len(), 1);
        assert_eq!(groups[0].mutations[0].lots.len(), 2);
    }

    #[test]
    fn filters_and_dedupes_client_side() {
        let svc = mock::service(MockApi::default());
        let cheap = Record {
            mutation_id: MutationId::new("2024-002"),
            address: Address::new("1 Rue Cujas 75005 Paris"),
            ..record(48.87, "20", 100_000)
        };
        svc.api().sales.borrow_mut().push_back(mock::ready(vec![
            record(48.861, "48.10", 500_000),
            record(48.861, "48.10", 500_000),
            cheap,
        ]));
        let filter = Filter {
            price_max: Some(Money::new(200_000.into())),
            ..Filter::default()
        };

        let groups = block_on(svc.execute(Sales {
            viewport: viewport(),
            filter: filter.clone(),
        }))
        .unwrap();

        assert_eq!(svc.api().sale_queries.borrow()[0].filter, filter);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key.to_string(), "1 Rue Cujas 75005 Paris");
    }

    #[test]
    fn filters_whole_mutations() {
        let svc = mock::service(MockApi::default());
        let small = Record {
            lot: Lot {
                kind: LocalType::new("Dépendance"),
                surface: Some(Area::new(8.into())),
                ..Lot::default()
            },
            ..record(48.862, "12.00", 500_000)
        };
        svc.api().sales.borrow_mut().push_back(mock::ready(vec![
            record(48.861, "48.10", 500_000),
            small,
        ]));

        let groups = block_on(svc.execute(Sales {
            viewport: viewport(),
            filter: Filter {
                price_m2_max: Some(Money::new(15_000.into())),
                ..Filter::default()
            },
        }))
        .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mutations.len(), 1);
        assert_eq!(groups[0].mutations[0].lots.len(), 2);
    }

    #[test]
    fn propagates_failures() {
        let svc = mock::service(MockApi::default());
        svc.api().sales.borrow_mut().push_back(mock::failed(503));

        let res = block_on(svc.execute(Sales {
            viewport: viewport(),
            filter: Filter::default(),
        }));

        assert!(res.is_err());
    }
}
