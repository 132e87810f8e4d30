use serde::{Deserialize, Serialize};

/// Язык магазина; подписи изображений хранятся по ISO-коду языка
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    #[serde(rename = "isoCode")]
    pub iso_code: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}
