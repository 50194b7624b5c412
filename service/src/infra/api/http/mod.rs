//! HTTP [`Api`] implementation.

mod dto;
mod impls;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::infra::api;
#[cfg(doc)]
use crate::infra::Api;

/// Endpoints of the remote services used by the [`Http`] client.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Sales ([DVF]) service endpoint.
    ///
    /// The grouped sales are served under its `/grouped` sub-path.
    ///
    /// [DVF]: https://www.data.gouv.fr/fr/datasets/demandes-de-valeurs-foncieres
    #[default = "http://localhost:8000/api/dvf"]
    pub sales: String,

    /// Address search ([BAN]) endpoint.
    ///
    /// [BAN]: https://adresse.data.gouv.fr
    #[default = "https://api-adresse.data.gouv.fr/search/"]
    pub address: String,

    /// Cadastral parcels ([API Carto]) endpoint.
    ///
    /// [API Carto]: https://apicarto.ign.fr/api/doc/cadastre
    #[default = "https://apicarto.ign.fr/api/cadastre/parcelle"]
    pub parcels: String,

    /// Timeout of every request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,
}

/// Parsed endpoints of the [`Http`] client.
#[derive(Clone, Debug)]
struct Endpoints {
    /// Sales query endpoint.
    sales: Url,

    /// Grouped sales query endpoint.
    grouped: Url,

    /// Address search endpoint.
    address: Url,

    /// Cadastral parcels endpoint.
    parcels: Url,
}

/// HTTP client of the remote services.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying HTTP [`Client`].
    client: Client,

    /// [`Endpoints`] of the remote services.
    endpoints: Endpoints,
}

impl Http {
    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If any of the endpoints is not a valid URL, or the underlying
    /// [`Client`] cannot be built.
    pub fn new(conf: &Config) -> Result<Self, Traced<api::Error>> {
        let parse = |url: &str| {
            Url::parse(url)
                .map_err(|e| api::Error::Url(format!("`{url}`: {e}")))
                .map_err(tracerr::wrap!())
        };

        let sales = conf.sales.trim_end_matches('/');
        let endpoints = Endpoints {
            sales: parse(sales)?,
            grouped: parse(&format!("{sales}/grouped"))?,
            address: parse(&conf.address)?,
            parcels: parse(&conf.parcels)?,
        };
        let client = Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;

        Ok(Self { client, endpoints })
    }

    /// Sends a `GET` request to the provided [`Url`] and decodes its JSON
    /// response body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, Traced<api::Error>> {
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(tracerr::new!(api::Error::Status(status.as_u16())));
        }
        let body = resp
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;

        serde_json::from_slice(&body)
            .map_err(tracerr::from_and_wrap!(=> api::Error))
    }
}

/// Builds a [`Url`] out of the provided `base` one and query `params`.
fn with_query<'a>(
    base: &Url,
    params: impl IntoIterator<Item = (&'a str, String)>,
) -> Url {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in params {
            _ = query.append_pair(k, &v);
        }
    }
    url
}
