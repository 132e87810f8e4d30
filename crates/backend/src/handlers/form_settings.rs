use axum::{extract::Path, http::StatusCode, Json};
use chrono::Utc;
use contracts::shared::form_settings::{FormSettings, SaveSettingsRequest, SaveSettingsResponse};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;

/// GET /api/settings/:form_key
///
/// Читает сырой блоб настроек; типизация и валидация формы — на
/// стороне потребителя (импорт валидирует при запуске).
pub async fn get_settings(
    Path(form_key): Path<String>,
) -> Result<Json<Option<FormSettings>>, StatusCode> {
    let conn = get_connection();

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT settings_json FROM user_form_settings WHERE form_key = ?",
            vec![form_key.clone().into()],
        ))
        .await
        .map_err(|e| {
            tracing::error!("Failed to load form settings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match row {
        Some(row) => {
            let settings_json: String = row.try_get("", "settings_json").map_err(|e| {
                tracing::error!("Failed to get settings_json: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
            Ok(Json(Some(FormSettings {
                form_key,
                settings_json,
            })))
        }
        None => Ok(Json(None)),
    }
}

/// POST /api/settings
///
/// Last writer wins; существование пути-источника на записи не
/// проверяется (проверка откладывается до запуска импорта).
pub async fn save_settings(
    Json(request): Json<SaveSettingsRequest>,
) -> Result<Json<SaveSettingsResponse>, StatusCode> {
    let conn = get_connection();

    let settings_json = serde_json::to_string(&request.settings).map_err(|e| {
        tracing::error!("Failed to serialize settings: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let query = r#"
        INSERT INTO user_form_settings (form_key, settings_json, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(form_key) DO UPDATE SET
            settings_json = excluded.settings_json,
            updated_at = excluded.updated_at
    "#;

    match conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            query,
            vec![
                request.form_key.into(),
                settings_json.into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await
    {
        Ok(_) => Ok(Json(SaveSettingsResponse {
            success: true,
            message: "Settings saved successfully".to_string(),
        })),
        Err(e) => {
            tracing::error!("Failed to save form settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
