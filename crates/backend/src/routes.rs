use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Product handlers
        .route(
            "/api/product",
            get(handlers::a001_product::list_all).post(handlers::a001_product::upsert),
        )
        .route(
            "/api/product/search",
            get(handlers::a001_product::search_by_reference),
        )
        .route(
            "/api/product/:id",
            get(handlers::a001_product::get_by_id).delete(handlers::a001_product::delete),
        )
        // A002 Product image handlers
        .route(
            "/api/product/:id/images",
            get(handlers::a002_product_image::list_by_product),
        )
        // A004 Image type catalog
        .route(
            "/api/image-types",
            get(handlers::a004_image_type::list_all),
        )
        // Form settings (key-value store read by the import trigger)
        .route(
            "/api/settings/:form_key",
            get(handlers::form_settings::get_settings),
        )
        .route("/api/settings", post(handlers::form_settings::save_settings))
        // U501 Bulk cover-image import trigger
        .route(
            "/api/import/cover-images",
            get(handlers::import_images::trigger),
        )
}
