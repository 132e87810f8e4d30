use crate::domain::common::{AggregateId, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Уникальный идентификатор изображения товара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductImageId(pub Uuid);

impl ProductImageId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductImageId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductImageId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Запись изображения товара.
///
/// Файлы на диске лежат по пути, выводимому из id записи
/// (см. `shared::images::path_for_creation` в backend); сама запись
/// хранит только позицию, признак обложки и подписи по языкам.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,

    /// Ссылка на товар (a001_product)
    #[serde(rename = "productRef")]
    pub product_ref: String,

    /// Позиция в галерее товара; обложка всегда первая
    pub position: i32,

    /// Признак обложки (cover image)
    pub cover: bool,

    /// Подписи (legend) по ISO-кодам языков
    #[serde(default)]
    pub legends: HashMap<String, String>,

    pub metadata: EntityMetadata,
}

impl ProductImage {
    /// Новая запись обложки; подписи переносятся со старой обложки
    pub fn new_cover(product_ref: String, legends: HashMap<String, String>) -> Self {
        Self {
            id: ProductImageId::new_v4(),
            product_ref,
            position: 1,
            cover: true,
            legends,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }
}
