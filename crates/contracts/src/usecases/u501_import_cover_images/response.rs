use serde::{Deserialize, Serialize};

/// Итоговый статус прохода импорта
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportStatus {
    /// Все файлы импортированы
    Success,
    /// Часть файлов импортирована
    PartialFailure,
    /// Ни один файл не импортирован
    Failure,
    /// В папке не было файлов для импорта
    NoInput,
}

/// Списки результатов по файлам в порядке обхода папки
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportDetail {
    /// Пути установленных обложек (базовый путь назначения)
    pub succeeded: Vec<String>,
    /// Сообщения об ошибках по файлам
    pub failed: Vec<String>,
}

/// Отчёт одного прохода импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub status: ImportStatus,
    pub message: String,
    pub detail: ImportDetail,
}

/// Ответ триггер-эндпоинта.
///
/// На проводе `status` — булево: `true` только при полном успехе,
/// `NoInput`/`Failure`/`PartialFailure` отдаются как `false` (поведение
/// исходного контроллера). `detail` отсутствует только на пути
/// необработанной ошибки всего прохода.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImportDetail>,
}

impl ImportResponse {
    /// Ответ для ошибки, не привязанной к конкретному файлу
    pub fn unhandled(message: String) -> Self {
        Self {
            status: Some(false),
            message,
            detail: None,
        }
    }
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            status: Some(report.status == ImportStatus::Success),
            message: report.message,
            detail: Some(report.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_status_is_true_only_on_success() {
        for (status, expected) in [
            (ImportStatus::Success, true),
            (ImportStatus::PartialFailure, false),
            (ImportStatus::Failure, false),
            (ImportStatus::NoInput, false),
        ] {
            let report = ImportReport {
                status,
                message: String::new(),
                detail: ImportDetail::default(),
            };
            let response = ImportResponse::from(report);
            assert_eq!(response.status, Some(expected));
            assert!(response.detail.is_some());
        }
    }

    #[test]
    fn unhandled_response_has_no_detail() {
        let response = ImportResponse::unhandled("Unable to process import: boom.".into());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], serde_json::Value::Bool(false));
        assert!(json.get("detail").is_none());
    }
}
