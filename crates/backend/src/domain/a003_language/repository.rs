use contracts::domain::a003_language::Language;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_language")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub iso_code: String,
    pub name: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Language {
    fn from(m: Model) -> Self {
        Language {
            iso_code: m.iso_code,
            name: m.name,
            active: m.active,
        }
    }
}

pub async fn list_active() -> anyhow::Result<Vec<Language>> {
    let items = Entity::find()
        .filter(Column::Active.eq(true))
        .all(get_connection())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}
