//! [`Query`] of address suggestions.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::address::{Search, Suggestion},
    infra::{api, Api},
    Query, Service,
};

/// Searches addresses matching the provided text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchAddress {
    /// Text typed by a user.
    pub text: String,

    /// Maximum number of [`Suggestion`]s to return.
    pub limit: u8,
}

impl<A> Query<SearchAddress> for Service<A>
where
    A: Api<
        Select<By<Vec<Suggestion>, Search>>,
        Ok = Vec<Suggestion>,
        Err = Traced<api::Error>,
    >,
{
    type Ok = Vec<Suggestion>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        SearchAddress { text, limit }: SearchAddress,
    ) -> Result<Self::Ok, Self::Err> {
        let search = Search { text, limit };
        if search.is_blank() {
            return Ok(vec![]);
        }

        self.api()
            .execute(Select(By::new(search)))
            .await
            .map_err(tracerr::wrap!())
    }
}
