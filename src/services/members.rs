//! Member resolution service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::member::Member,
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct MembersService {
    store: Arc<dyn LibraryStore>,
}

impl MembersService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Member registered under this exact name, created on first use
    pub async fn find_or_create_by_name(&self, name: &str) -> AppResult<Member> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Member name is required".to_string()));
        }
        self.store.find_or_create_member(name).await
    }
}
