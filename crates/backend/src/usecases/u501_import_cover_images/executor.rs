//! UseCase массового импорта обложек товаров.
//!
//! Один проход: читаем настроенную папку-источник, для каждого
//! `<reference>.jpg` ищем товар по артикулу и ставим файл обложкой
//! (базовый рендер + все настроенные варианты). Сбои по отдельным
//! файлам не прерывают проход — они копятся в отчёте.

use once_cell::sync::Lazy;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use std::path::{Path, PathBuf};
use thiserror::Error;

use contracts::shared::form_settings::{ImportSettings, IMPORT_SETTINGS_FORM_KEY};
use contracts::usecases::u501_import_cover_images::{ImportDetail, ImportReport, ImportStatus};

use crate::domain::{a001_product, a002_product_image, a004_image_type};
use crate::shared::config::Config;
use crate::shared::data::db::get_connection;
use crate::shared::images;

/// Сериализация конкурентных запусков: проходы делят папку-источник и
/// обложки товаров, без блокировки возможны двойное удаление исходных
/// файлов и дубли записей обложек.
static RUN_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Отказ по конкретному файлу; текст попадает в `detail.failed`
#[derive(Debug, Error)]
pub enum ImportFileError {
    #[error("{filename}: Product was not found at reference \"{reference}\".")]
    ProductNotFound { filename: String, reference: String },

    #[error("{filename}: Image exceeds {limit} Mo.")]
    MemoryLimitExceeded { filename: String, limit: u64 },

    #[error("{filename}: Image failed to copy to {destination}.")]
    CopyFailed {
        filename: String,
        destination: String,
    },
}

/// Ошибка всего прохода (до обработки файлов)
#[derive(Debug, Error)]
pub enum ImportPassError {
    /// Блоб настроек есть, но не десериализуется в ImportSettings
    #[error("the import settings record is corrupt and cannot be parsed")]
    ConfigurationCorrupt,
}

enum FileOutcome {
    Installed { path: String },
    Rejected(ImportFileError),
}

/// Выполнить один проход импорта и собрать отчёт.
///
/// Ошибки уровня прохода (битые настройки, недоступная БД) уходят
/// наверх как `Err`; триггер-эндпоинт превращает их в JSON-ответ об
/// ошибке.
pub async fn run_import(config: &Config) -> anyhow::Result<ImportReport> {
    let _guard = RUN_LOCK.lock().await;

    let settings = load_settings().await?;
    let source_path = PathBuf::from(
        settings
            .map(|s| s.form.path_source)
            .unwrap_or_default(),
    );

    // Ненастроенный или несуществующий путь даёт пустой список
    let filenames = list_jpg_files(&source_path);
    if filenames.is_empty() {
        return Ok(ImportReport {
            status: ImportStatus::NoInput,
            message: "There is no image to import.".to_string(),
            detail: ImportDetail::default(),
        });
    }

    std::fs::create_dir_all(&config.images.tmp_dir)?;

    let mut detail = ImportDetail::default();
    for filename in &filenames {
        let reference = reference_from_filename(filename);
        match import_image(filename, &reference, &source_path, config).await? {
            FileOutcome::Installed { path } => {
                tracing::info!("{} successfully imported.", filename);
                detail.succeeded.push(path);
            }
            FileOutcome::Rejected(error) => {
                let message = error.to_string();
                tracing::warn!("{}", message);
                detail.failed.push(message);
            }
        }
    }

    Ok(build_report(filenames.len(), detail))
}

/// Импорт одного файла: поиск товара, pre-flight проверка памяти,
/// перенос подписей, замена обложки, staging-копия, рендеры, зачистка.
async fn import_image(
    filename: &str,
    reference: &str,
    source_dir: &Path,
    config: &Config,
) -> anyhow::Result<FileOutcome> {
    let Some(product) = a001_product::repository::find_by_reference(reference).await? else {
        return Ok(FileOutcome::Rejected(ImportFileError::ProductNotFound {
            filename: filename.to_string(),
            reference: reference.to_string(),
        }));
    };

    let source_file = source_dir.join(filename);
    let limit = config.images.memory_limit_mo;
    if !images::check_memory_limit(&source_file, limit) {
        // Файл-источник остаётся на месте
        return Ok(FileOutcome::Rejected(ImportFileError::MemoryLimitExceeded {
            filename: filename.to_string(),
            limit,
        }));
    }

    let product_ref = product.to_string_id();
    let img_root = Path::new(&config.images.root);

    // Подписи старой обложки переносятся на новую по всем активным языкам
    let legends = a002_product_image::service::cover_legends(&product_ref).await?;
    a002_product_image::service::remove_cover(&product_ref, img_root).await?;
    let image = a002_product_image::service::create_cover(&product_ref, legends).await?;
    let destination = images::path_for_creation(img_root, &image.to_string_id())?;

    let tmp_file = Path::new(&config.images.tmp_dir).join(filename);
    if let Err(e) = std::fs::copy(&source_file, &tmp_file) {
        tracing::warn!("Staging copy failed for {}: {}", filename, e);
        let _ = std::fs::remove_file(&tmp_file);
        // Компенсация шага создания записи
        a002_product_image::service::delete(image.id, img_root).await?;
        return Ok(FileOutcome::Rejected(ImportFileError::CopyFailed {
            filename: filename.to_string(),
            destination: destination.display().to_string(),
        }));
    }

    // Базовый рендер + по файлу на каждый настроенный вариант. Сбой
    // отдельного рендера файл не заваливает (поведение исходного
    // модуля), но попадает в лог.
    let base = images::base_file(&destination);
    if let Err(e) = images::resize(&tmp_file, &base, None) {
        tracing::warn!("Base render failed for {}: {}", base.display(), e);
    }
    for image_type in a004_image_type::repository::list_all().await? {
        let variant = images::variant_file(&destination, &image_type.name);
        if let Err(e) = images::resize(
            &tmp_file,
            &variant,
            Some((image_type.width, image_type.height)),
        ) {
            tracing::warn!("Variant render failed for {}: {}", variant.display(), e);
        }
    }

    if let Err(e) = std::fs::remove_file(&source_file) {
        tracing::warn!("Could not remove source file {}: {}", source_file.display(), e);
    }
    let _ = std::fs::remove_file(&tmp_file);

    Ok(FileOutcome::Installed {
        path: base.display().to_string(),
    })
}

/// Настройки импорта из user_form_settings.
///
/// Отсутствующая запись — не ошибка (пустой путь, проход отдаст
/// NoInput); запись, которая не парсится, — ошибка прохода.
async fn load_settings() -> anyhow::Result<Option<ImportSettings>> {
    let conn = get_connection();
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT settings_json FROM user_form_settings WHERE form_key = ?",
            vec![IMPORT_SETTINGS_FORM_KEY.into()],
        ))
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let settings_json: String = row.try_get("", "settings_json")?;
    let settings: ImportSettings =
        serde_json::from_str(&settings_json).map_err(|_| ImportPassError::ConfigurationCorrupt)?;
    Ok(Some(settings))
}

/// Файлы с расширением `jpg` прямо в папке-источнике.
///
/// Без рекурсии; сравнение расширения точное (чувствительность к
/// регистру — как у файловой системы хоста). Порядок — порядок обхода
/// `read_dir`: стабилен в рамках одного прохода, но зависит от
/// платформы.
fn list_jpg_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut filenames = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some("jpg") {
            filenames.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    filenames
}

/// Артикул — имя файла без расширения
fn reference_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Итоговый статус и сообщение по счётчикам прохода
fn build_report(total: usize, detail: ImportDetail) -> ImportReport {
    let succeeded = detail.succeeded.len();
    let (status, message) = if succeeded == total {
        (
            ImportStatus::Success,
            "Import successfully completed.".to_string(),
        )
    } else if succeeded > 0 {
        let percent = (succeeded as f64 / total as f64 * 100.0).round() as u32;
        (
            ImportStatus::PartialFailure,
            format!(
                "Import completed at {}%: {} image(s) failed to import.",
                percent,
                total - succeeded
            ),
        )
    } else {
        (ImportStatus::Failure, "Import failed.".to_string())
    };

    ImportReport {
        status,
        message,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::{DatabaseConfig, ImagesConfig, ServerConfig};
    use contracts::domain::a001_product::ProductDto;

    #[test]
    fn reference_is_filename_without_extension() {
        assert_eq!(reference_from_filename("SKU-001.jpg"), "SKU-001");
        assert_eq!(reference_from_filename("archive.tar.jpg"), "archive.tar");
        assert_eq!(reference_from_filename("noext"), "noext");
    }

    #[test]
    fn listing_ignores_other_extensions_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(tmp.path().join("b.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("sub.jpg")).unwrap();
        std::fs::write(tmp.path().join("sub.jpg").join("nested.jpg"), b"x").unwrap();

        let files = list_jpg_files(tmp.path());
        assert_eq!(files, vec!["a.jpg".to_string()]);
    }

    #[test]
    fn listing_missing_directory_is_empty() {
        assert!(list_jpg_files(Path::new("/does/not/exist")).is_empty());
        assert!(list_jpg_files(Path::new("")).is_empty());
    }

    #[test]
    fn report_status_from_tallies() {
        let all = build_report(
            2,
            ImportDetail {
                succeeded: vec!["a".into(), "b".into()],
                failed: vec![],
            },
        );
        assert_eq!(all.status, ImportStatus::Success);
        assert_eq!(all.message, "Import successfully completed.");

        let none = build_report(
            3,
            ImportDetail {
                succeeded: vec![],
                failed: vec!["x".into(), "y".into(), "z".into()],
            },
        );
        assert_eq!(none.status, ImportStatus::Failure);
        assert_eq!(none.message, "Import failed.");

        let mixed = build_report(
            3,
            ImportDetail {
                succeeded: vec!["a".into()],
                failed: vec!["x".into(), "y".into()],
            },
        );
        assert_eq!(mixed.status, ImportStatus::PartialFailure);
        assert_eq!(
            mixed.message,
            "Import completed at 33%: 2 image(s) failed to import."
        );
    }

    fn test_config(base: &Path, memory_limit_mo: u64) -> Config {
        Config {
            server: ServerConfig { port: 0 },
            database: DatabaseConfig {
                path: base.join("app.db").to_string_lossy().into_owned(),
            },
            images: ImagesConfig {
                root: base.join("img").to_string_lossy().into_owned(),
                tmp_dir: base.join("img").join("tmp").to_string_lossy().into_owned(),
                memory_limit_mo,
            },
        }
    }

    fn write_test_jpeg(path: &Path) {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 180, 90]));
        img.save(path).unwrap();
    }

    async fn save_settings_row(settings_json: &str) {
        let conn = get_connection();
        conn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
                INSERT INTO user_form_settings (form_key, settings_json, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(form_key) DO UPDATE SET
                    settings_json = excluded.settings_json,
                    updated_at = excluded.updated_at
            "#,
            vec![
                IMPORT_SETTINGS_FORM_KEY.into(),
                settings_json.into(),
                chrono::Utc::now().to_rfc3339().into(),
            ],
        ))
        .await
        .unwrap();
    }

    // Глобальное подключение к БД инициализируется один раз на процесс,
    // поэтому все сценарии с БД идут последовательно в одном тесте.
    #[tokio::test]
    async fn import_pass_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("app.db");
        crate::shared::data::db::initialize_database(db_path.to_str())
            .await
            .unwrap();

        let source_dir = tmp.path().join("incoming");
        std::fs::create_dir_all(&source_dir).unwrap();
        let config = test_config(tmp.path(), 128);

        let settings =
            serde_json::json!({ "form": { "path_source": source_dir.to_string_lossy() } });
        save_settings_row(&settings.to_string()).await;

        // Пустая папка: NoInput, пустой detail
        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::NoInput);
        assert_eq!(report.message, "There is no image to import.");
        assert!(report.detail.succeeded.is_empty());
        assert!(report.detail.failed.is_empty());

        let product_id = a001_product::service::create(ProductDto {
            id: None,
            code: Some("PRD-001".into()),
            description: "Bathroom sink".into(),
            reference: Some("SKU-001".into()),
            comment: None,
        })
        .await
        .unwrap();
        let product_ref = product_id.to_string();

        // Один файл находит товар, второй — нет
        write_test_jpeg(&source_dir.join("SKU-001.jpg"));
        write_test_jpeg(&source_dir.join("UNKNOWN.jpg"));

        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::PartialFailure);
        assert_eq!(
            report.message,
            "Import completed at 50%: 1 image(s) failed to import."
        );
        assert_eq!(report.detail.succeeded.len(), 1);
        assert_eq!(
            report.detail.failed,
            vec!["UNKNOWN.jpg: Product was not found at reference \"UNKNOWN\".".to_string()]
        );
        // Совпавший источник удалён, несовпавший остался
        assert!(!source_dir.join("SKU-001.jpg").exists());
        assert!(source_dir.join("UNKNOWN.jpg").exists());

        // Базовый рендер и все варианты на диске
        let base = PathBuf::from(&report.detail.succeeded[0]);
        assert!(base.exists());
        let destination = base.with_extension("");
        for name in ["cart", "small", "home", "medium", "large"] {
            assert!(images::variant_file(&destination, name).exists());
        }
        let first_cover = a002_product_image::repository::find_cover(&product_ref)
            .await
            .unwrap()
            .expect("cover record");
        assert!(first_cover.cover);
        assert_eq!(first_cover.position, 1);

        // Остался только несовпадающий файл: Failure
        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::Failure);
        assert_eq!(report.message, "Import failed.");
        std::fs::remove_file(source_dir.join("UNKNOWN.jpg")).unwrap();

        // Повторный импорт того же артикула заменяет обложку, запись
        // ровно одна, файлы старой обложки удалены
        write_test_jpeg(&source_dir.join("SKU-001.jpg"));
        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::Success);
        assert_eq!(report.message, "Import successfully completed.");
        let covers = a002_product_image::repository::list_by_product(&product_ref)
            .await
            .unwrap();
        assert_eq!(covers.len(), 1);
        assert_ne!(covers[0].to_string_id(), first_cover.to_string_id());
        assert!(!base.exists());

        // Нулевой бюджет памяти: отказ, источник не тронут
        write_test_jpeg(&source_dir.join("SKU-001.jpg"));
        let strict = test_config(tmp.path(), 0);
        let report = run_import(&strict).await.unwrap();
        assert_eq!(report.status, ImportStatus::Failure);
        assert_eq!(
            report.detail.failed,
            vec!["SKU-001.jpg: Image exceeds 0 Mo.".to_string()]
        );
        assert!(source_dir.join("SKU-001.jpg").exists());
        std::fs::remove_file(source_dir.join("SKU-001.jpg")).unwrap();

        // Папка снова пуста: NoInput
        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::NoInput);

        // Подписи старой обложки переезжают на новую запись
        let second_id = a001_product::service::create(ProductDto {
            id: None,
            code: Some("PRD-002".into()),
            description: "Kitchen tap".into(),
            reference: Some("SKU-002".into()),
            comment: None,
        })
        .await
        .unwrap();
        let second_ref = second_id.to_string();
        let old_cover = a002_product_image::service::create_cover(
            &second_ref,
            std::collections::HashMap::from([("en".to_string(), "Old caption".to_string())]),
        )
        .await
        .unwrap();

        write_test_jpeg(&source_dir.join("SKU-002.jpg"));
        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::Success);
        let covers = a002_product_image::repository::list_by_product(&second_ref)
            .await
            .unwrap();
        assert_eq!(covers.len(), 1);
        assert_ne!(covers[0].to_string_id(), old_cover.to_string_id());
        assert_eq!(covers[0].legends.get("en"), Some(&"Old caption".to_string()));

        // Срыв staging-копии: каталог на месте scratch-файла делает
        // fs::copy невозможным. Свежая запись обложки компенсируется,
        // источник остаётся на месте
        write_test_jpeg(&source_dir.join("SKU-002.jpg"));
        let tmp_blocker = Path::new(&config.images.tmp_dir).join("SKU-002.jpg");
        std::fs::create_dir_all(&tmp_blocker).unwrap();

        let report = run_import(&config).await.unwrap();
        assert_eq!(report.status, ImportStatus::Failure);
        assert_eq!(report.detail.failed.len(), 1);
        assert!(report.detail.failed[0].starts_with("SKU-002.jpg: Image failed to copy to "));
        assert!(source_dir.join("SKU-002.jpg").exists());
        assert!(a002_product_image::repository::find_cover(&second_ref)
            .await
            .unwrap()
            .is_none());
        std::fs::remove_dir(&tmp_blocker).unwrap();
        std::fs::remove_file(source_dir.join("SKU-002.jpg")).unwrap();

        // Битый блоб настроек валит весь проход
        save_settings_row("not json at all").await;
        let err = run_import(&config).await.unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }
}
