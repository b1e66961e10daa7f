//! Collection (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A catalog entry representing a book title with a stock count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Collection {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Number of copies the library owns
    pub total_copies: i32,
    /// Copies currently on the shelf
    pub available_copies: i32,
}

/// Create or update collection request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CollectionInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: i32,
}

/// Resize request: changes total copies and shifts available stock by the same amount
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResizeCollection {
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: i32,
}
