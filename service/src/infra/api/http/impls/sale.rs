//! Sale-related [`Api`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{sale, Record},
    infra::{
        api::{
            self,
            http::{dto, with_query},
            Http,
        },
        Api,
    },
};

impl Api<Select<By<Vec<Record>, sale::Query>>> for Http {
    type Ok = Vec<Record>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, sale::Query>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sale::Query { bbox, limit, filter } = by.into_inner();

        let url = with_query(
            &self.endpoints.sales,
            [("bbox", bbox.query()), ("limit", limit.to_string())]
                .into_iter()
                .chain(filter.params()),
        );
        Ok(self
            .get_json::<dto::Sales>(url)
            .await
            .map_err(tracerr::wrap!())?
            .into_records())
    }
}

impl Api<Select<By<Vec<Record>, sale::Around>>> for Http {
    type Ok = Vec<Record>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Record>, sale::Around>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sale::Around { bbox } = by.into_inner();

        let url = with_query(&self.endpoints.grouped, [("bbox", bbox.query())]);
        Ok(self
            .get_json::<dto::Sales>(url)
            .await
            .map_err(tracerr::wrap!())?
            .into_records())
    }
}
