use serde::{Deserialize, Serialize};

/// Ключ настроек импорта обложек в user_form_settings
pub const IMPORT_SETTINGS_FORM_KEY: &str = "import_cover_images";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FormSettings {
    pub form_key: String,
    pub settings_json: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SaveSettingsRequest {
    pub form_key: String,
    pub settings: serde_json::Value,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SaveSettingsResponse {
    pub success: bool,
    pub message: String,
}

/// Типизированная схема настроек импорта обложек.
///
/// Блоб хранится как `{"form": {"path_source": "..."}}` — при чтении
/// перед запуском импорта он обязан десериализоваться в эту структуру,
/// иначе запуск завершается ошибкой конфигурации.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImportSettings {
    pub form: ImportSettingsForm,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImportSettingsForm {
    /// Абсолютный путь к папке с изображениями для импорта
    #[serde(default)]
    pub path_source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_settings_roundtrip() {
        let json = r#"{"form":{"path_source":"/var/images/in"}}"#;
        let parsed: ImportSettings = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.form.path_source, "/var/images/in");
    }

    #[test]
    fn missing_path_defaults_to_empty() {
        let parsed: ImportSettings = serde_json::from_str(r#"{"form":{}}"#).unwrap();
        assert!(parsed.form.path_source.is_empty());
    }
}
