use axum::Json;

use crate::domain::a004_image_type;

/// GET /api/image-types
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a004_image_type::ImageType>>, axum::http::StatusCode> {
    match a004_image_type::repository::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list image types: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
