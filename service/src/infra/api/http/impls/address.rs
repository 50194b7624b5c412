//! Address search [`Api`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::address::{Search, Suggestion},
    infra::{
        api::{
            self,
            http::{dto, with_query},
            Http,
        },
        Api,
    },
};

impl Api<Select<By<Vec<Suggestion>, Search>>> for Http {
    type Ok = Vec<Suggestion>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Suggestion>, Search>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Search { text, limit } = by.into_inner();

        let url = with_query(
            &self.endpoints.address,
            [
                ("q", text.trim().to_owned()),
                ("limit", limit.to_string()),
                ("autocomplete", "1".to_owned()),
            ],
        );
        Ok(self
            .get_json::<dto::FeatureCollection<dto::AddressFeature>>(url)
            .await
            .map_err(tracerr::wrap!())?
            .features
            .into_iter()
            .filter_map(dto::AddressFeature::into_domain)
            .collect())
    }
}
