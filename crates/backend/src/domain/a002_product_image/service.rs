use super::repository;
use crate::domain::{a003_language, a004_image_type};
use crate::shared::images;
use contracts::domain::a002_product_image::{ProductImage, ProductImageId};
use contracts::domain::common::AggregateId;
use std::collections::HashMap;
use std::path::Path;

/// Подписи текущей обложки товара по всем активным языкам.
///
/// Вызывается перед заменой обложки, чтобы новая запись сохранила
/// подписи старой.
pub async fn cover_legends(product_ref: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut legends = HashMap::new();
    let Some(cover) = repository::find_cover(product_ref).await? else {
        return Ok(legends);
    };
    for language in a003_language::repository::list_active().await? {
        if let Some(legend) = cover.legends.get(&language.iso_code) {
            legends.insert(language.iso_code.clone(), legend.clone());
        }
    }
    Ok(legends)
}

/// Удалить текущую обложку товара: запись и файлы на диске.
///
/// Деструктивный шаг без отката — если последующая установка новой
/// обложки сорвётся, товар останется без обложки до следующего
/// успешного прохода.
pub async fn remove_cover(product_ref: &str, img_root: &Path) -> anyhow::Result<()> {
    let Some(cover) = repository::find_cover(product_ref).await? else {
        return Ok(());
    };
    remove_files(img_root, &cover.id.as_string()).await;
    repository::delete_record(cover.id.value()).await?;
    Ok(())
}

/// Создать запись новой обложки (позиция 1, cover = true)
pub async fn create_cover(
    product_ref: &str,
    legends: HashMap<String, String>,
) -> anyhow::Result<ProductImage> {
    let aggregate = ProductImage::new_cover(product_ref.to_string(), legends);
    repository::insert(&aggregate).await?;
    Ok(aggregate)
}

/// Удалить запись изображения вместе с файлами (если они уже есть)
pub async fn delete(id: ProductImageId, img_root: &Path) -> anyhow::Result<bool> {
    remove_files(img_root, &id.as_string()).await;
    repository::delete_record(id.value()).await
}

pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<ProductImage>> {
    repository::list_by_product(product_ref).await
}

/// Best-effort удаление базового файла и файлов вариантов
async fn remove_files(img_root: &Path, image_id: &str) {
    let Ok(destination) = images::path_for_creation(img_root, image_id) else {
        return;
    };
    let _ = std::fs::remove_file(images::base_file(&destination));
    if let Ok(types) = a004_image_type::repository::list_all().await {
        for image_type in types {
            let _ = std::fs::remove_file(images::variant_file(&destination, &image_type.name));
        }
    }
}
