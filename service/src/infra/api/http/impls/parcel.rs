//! Cadastral parcels [`Api`] implementations.

use common::operations::{By, Select};
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::{
        parcel::{Collection, Query},
        LngLat,
    },
    infra::{
        api::{
            self,
            http::{dto, with_query},
            Http,
        },
        Api,
    },
};

/// Cadastre source of the parcels (`PCI` stands for the cadastral map
/// published by the DGFiP).
const SOURCE: &str = "PCI";

impl Api<Select<By<Collection, Query>>> for Http {
    type Ok = Collection;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Collection, Query>>,
    ) -> Result<Self::Ok, Self::Err> {
        let params = match by.into_inner() {
            Query::Commune { insee, limit } => vec![
                ("code_insee", insee.to_string()),
                ("_limit", limit.to_string()),
            ],
            Query::Point(position) => {
                let LngLat { lng, lat } = position.into();
                let geom = json!({ "type": "Point", "coordinates": [lng, lat] });
                vec![("geom", geom.to_string())]
            }
        };

        let url = with_query(
            &self.endpoints.parcels,
            params.into_iter().chain([("source_ign", SOURCE.to_owned())]),
        );
        let features = self
            .get_json::<dto::FeatureCollection<dto::ParcelFeature>>(url)
            .await
            .map_err(tracerr::wrap!())?
            .features
            .into_iter()
            .map(dto::ParcelFeature::into_domain)
            .collect();

        Ok(Collection { features })
    }
}
