use contracts::domain::a004_image_type::ImageType;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::EntityTrait;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_image_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ImageType {
    fn from(m: Model) -> Self {
        ImageType {
            name: m.name,
            width: m.width as u32,
            height: m.height as u32,
        }
    }
}

/// Настроенный набор вариантов изображений каталога
pub async fn list_all() -> anyhow::Result<Vec<ImageType>> {
    let items = Entity::find().all(get_connection()).await?;
    Ok(items.into_iter().map(Into::into).collect())
}
