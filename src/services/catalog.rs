//! Catalog management service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::collection::{Collection, CollectionInput},
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn LibraryStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    pub async fn list_collections(&self) -> AppResult<Vec<Collection>> {
        self.store.list_collections().await
    }

    pub async fn get_collection(&self, id: i32) -> AppResult<Collection> {
        self.store.get_collection(id).await
    }

    /// Add a collection; all copies start on the shelf
    pub async fn add_collection(&self, data: &CollectionInput) -> AppResult<Collection> {
        let collection = self.store.create_collection(data).await?;
        tracing::info!(
            "Collection {} added: \"{}\" ({} copies)",
            collection.id,
            collection.title,
            collection.total_copies
        );
        Ok(collection)
    }

    /// Overwrite title, author and total copies without touching available stock.
    ///
    /// Use [`CatalogService::resize_collection`] to change stock together with the total.
    pub async fn update_collection(&self, id: i32, data: &CollectionInput) -> AppResult<Collection> {
        self.store.update_collection(id, data).await
    }

    /// Change the number of owned copies, moving available stock by the same amount
    pub async fn resize_collection(&self, id: i32, total_copies: i32) -> AppResult<Collection> {
        let collection = self.store.resize_collection(id, total_copies).await?;
        tracing::info!(
            "Collection {} resized to {} copies ({} available)",
            id,
            collection.total_copies,
            collection.available_copies
        );
        Ok(collection)
    }

    pub async fn delete_collection(&self, id: i32) -> AppResult<()> {
        self.store.delete_collection(id).await?;
        tracing::info!("Collection {} deleted", id);
        Ok(())
    }
}
