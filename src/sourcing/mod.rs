//! Keeps a local copy of the mortgages in a product group and matches them
//! against a borrower's requirements.
//!
//! [`MortgageProductsRepository`] resolves a group to its product ids and
//! lists those mortgages, replacing its snapshot on each [`sync`]. It only
//! depends on the two remote capabilities below, so tests can substitute
//! in-memory stubs for the [`Client`](crate::Client).
//!
//! [`sync`]: MortgageProductsRepository::sync

mod repository;
mod run;

use async_trait::async_trait;
pub use repository::MortgageProductsRepository;
pub use run::SourcingRun;
use thiserror::Error;

use crate::http::{CapisError, Client};
use crate::resources::FindGroupResponse;
use crate::resources::products::{ListMortgagesResponse, MortgageProductFilters, ProductsService};

/// Resolves a group name to the group and its product ids.
#[async_trait]
pub trait GroupsRemote: Send + Sync {
    async fn find_group(&self, name: &str) -> Result<FindGroupResponse, CapisError>;
}

/// Lists mortgages, optionally restricted to a set of ids.
#[async_trait]
pub trait MortgageProductsRemote: Send + Sync {
    async fn list_mortgages(&self, filters: &MortgageProductFilters) -> Result<ListMortgagesResponse, CapisError>;
}

#[async_trait]
impl GroupsRemote for Client {
    async fn find_group(&self, name: &str) -> Result<FindGroupResponse, CapisError> {
        Client::find_group(self, name).await
    }
}

#[async_trait]
impl MortgageProductsRemote for ProductsService {
    async fn list_mortgages(&self, filters: &MortgageProductFilters) -> Result<ListMortgagesResponse, CapisError> {
        ProductsService::list_mortgages(self, Some(filters)).await
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unable to get group {group}")]
    GroupLookup {
        group: String,
        #[source]
        source: CapisError,
    },

    #[error("unable to get products list")]
    ProductListing(#[source] CapisError),
}
