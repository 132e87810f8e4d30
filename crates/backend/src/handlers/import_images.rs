use axum::Json;
use contracts::usecases::u501_import_cover_images::ImportResponse;

use crate::shared::config::get_config;
use crate::usecases::u501_import_cover_images::executor;

/// GET /api/import/cover-images
///
/// Триггер одного прохода импорта. Всегда отвечает 200 с JSON-отчётом:
/// любая ошибка уровня прохода превращается в тело об ошибке, а не в
/// не-JSON ответ.
pub async fn trigger() -> Json<ImportResponse> {
    match executor::run_import(get_config()).await {
        Ok(report) => {
            tracing::info!(
                "Import pass finished: {:?}, {} succeeded, {} failed",
                report.status,
                report.detail.succeeded.len(),
                report.detail.failed.len()
            );
            Json(report.into())
        }
        Err(e) => {
            tracing::error!("Import pass aborted: {}", e);
            Json(ImportResponse::unhandled(format!(
                "Unable to process import: {}.",
                e
            )))
        }
    }
}
