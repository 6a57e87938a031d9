//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, borrows, cart, health, items, manifests, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gearhouse API",
        version = "0.3.0",
        description = "Team Equipment Checkout REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Gearhouse Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::attach_image,
        items::set_borrowed,
        // Cart
        cart::view,
        cart::add,
        cart::set_quantity,
        cart::remove,
        cart::clear,
        // Borrows
        borrows::checkout,
        borrows::list_records,
        borrows::return_record,
        borrows::return_all,
        // Manifests
        manifests::download,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SessionResponse,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemStatus,
            crate::models::item::ItemWithStatus,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::enums::Category,
            crate::models::enums::ItemState,
            crate::models::enums::StatusSeverity,
            crate::models::enums::Role,
            items::CreateItemResponse,
            items::SetBorrowedRequest,
            // Cart
            cart::AddToCartRequest,
            cart::SetQuantityRequest,
            cart::CartLineView,
            cart::CartView,
            // Borrows
            crate::models::record::BorrowRecord,
            crate::models::record::BorrowRecordDetails,
            crate::models::record::CheckoutRequest,
            crate::models::record::CheckoutSummary,
            crate::models::record::CommittedLine,
            crate::models::record::BulkReturnReport,
            borrows::BulkReturnRequest,
            // Stats
            stats::StatsResponse,
            stats::CategoryUnits,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session management"),
        (name = "items", description = "Equipment catalog"),
        (name = "cart", description = "Reservation cart"),
        (name = "borrows", description = "Checkout and returns"),
        (name = "manifests", description = "Borrow manifest downloads"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
