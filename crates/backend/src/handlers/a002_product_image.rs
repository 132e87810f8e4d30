use axum::{extract::Path, Json};

use crate::domain::a002_product_image;

/// GET /api/product/:id/images
pub async fn list_by_product(
    Path(id): Path<String>,
) -> Result<Json<Vec<contracts::domain::a002_product_image::ProductImage>>, axum::http::StatusCode>
{
    if uuid::Uuid::parse_str(&id).is_err() {
        return Err(axum::http::StatusCode::BAD_REQUEST);
    }
    match a002_product_image::service::list_by_product(&id).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list product images: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
