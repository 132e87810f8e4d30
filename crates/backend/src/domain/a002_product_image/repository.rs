use chrono::Utc;
use contracts::domain::a002_product_image::{ProductImage, ProductImageId};
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_product_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_ref: String,
    pub position: i32,
    pub cover: bool,
    pub legends_json: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductImage {
    fn from(m: Model) -> Self {
        let legends: HashMap<String, String> =
            serde_json::from_str(&m.legends_json).unwrap_or_default();
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ProductImage {
            id: ProductImageId(uuid),
            product_ref: m.product_ref,
            position: m.position,
            cover: m.cover,
            legends,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                version: m.version,
            },
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(aggregate: &ProductImage) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        product_ref: Set(aggregate.product_ref.clone()),
        position: Set(aggregate.position),
        cover: Set(aggregate.cover),
        legends_json: Set(serde_json::to_string(&aggregate.legends)?),
        is_deleted: Set(aggregate.metadata.is_deleted),
        created_at: Set(Some(aggregate.metadata.created_at)),
        updated_at: Set(Some(aggregate.metadata.updated_at)),
        version: Set(aggregate.metadata.version),
    };
    active.insert(conn()).await?;
    Ok(uuid)
}

/// Текущая обложка товара, если есть
pub async fn find_cover(product_ref: &str) -> anyhow::Result<Option<ProductImage>> {
    let result = Entity::find()
        .filter(Column::ProductRef.eq(product_ref))
        .filter(Column::Cover.eq(true))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<ProductImage>> {
    let items = Entity::find()
        .filter(Column::ProductRef.eq(product_ref))
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Position)
        .all(conn())
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Жёсткое удаление записи (замена обложки и компенсация при сбое копии)
pub async fn delete_record(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
