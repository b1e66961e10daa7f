//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{collections, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Loans API",
        version = "0.1.0",
        description = "Catalog, member and loan lifecycle REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Collections
        collections::list_collections,
        collections::get_collection,
        collections::create_collection,
        collections::update_collection,
        collections::resize_collection,
        collections::delete_collection,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::borrow,
        loans::return_loan,
        loans::loan_history,
        loans::loans_by_member,
    ),
    components(
        schemas(
            // Collections
            crate::models::collection::Collection,
            crate::models::collection::CollectionInput,
            crate::models::collection::ResizeCollection,
            collections::MessageResponse,
            collections::CollectionCreatedResponse,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanHistoryEntry,
            crate::models::loan::MemberLoan,
            loans::BorrowRequest,
            loans::BorrowResponse,
            loans::ReturnRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "collections", description = "Catalog management"),
        (name = "loans", description = "Borrowing, returns and loan reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
