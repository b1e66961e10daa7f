//! Business logic services

pub mod catalog;
pub mod loans;
pub mod members;

use std::sync::Arc;

use crate::{config::LoansConfig, error::AppResult, repository::LibraryStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
    store: Arc<dyn LibraryStore>,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn LibraryStore>, loans_config: LoansConfig) -> Self {
        let members = members::MembersService::new(store.clone());
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            loans: loans::LoansService::new(store.clone(), members.clone(), loans_config),
            members,
            store,
        }
    }

    /// Check that the database answers
    pub async fn check_database(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
