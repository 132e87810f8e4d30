use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Запас по памяти при декодировании (RGBA + накладные расходы декодера)
const DECODE_OVERHEAD: f64 = 1.8;

/// Pre-flight проверка бюджета памяти перед обработкой изображения.
///
/// Размеры читаются из заголовка без полного декодирования; оценка
/// стоимости — `w * h * 4 * 1.8` байт против `limit_mo` мегабайт.
/// Нечитаемый или битый файл бюджет не проходит.
pub fn check_memory_limit(path: &Path, limit_mo: u64) -> bool {
    let Ok((width, height)) = image::image_dimensions(path) else {
        return false;
    };
    let needed = (width as u64 * height as u64 * 4) as f64 * DECODE_OVERHEAD;
    needed <= (limit_mo * 1024 * 1024) as f64
}

/// Перекодировать изображение в JPEG по пути `dest`.
///
/// `size = Some((w, h))` — ресайз с сохранением пропорций (вписывание
/// в рамку w×h), `None` — базовый рендер обложки в полном размере.
pub fn resize(src: &Path, dest: &Path, size: Option<(u32, u32)>) -> anyhow::Result<()> {
    let img = image::open(src)?;
    let out = match size {
        Some((width, height)) => img.resize(width, height, FilterType::Triangle),
        None => img,
    };
    out.into_rgb8().save(dest)?;
    Ok(())
}

/// Путь назначения для новой записи изображения.
///
/// Схема аллокации выводится из id записи: два уровня вложенности по
/// первым символам id (`<root>/a/b/<id>`), директории создаются.
/// Возвращается базовый путь без расширения; файлы пишутся как
/// `<base>.jpg` и `<base>-<variant>.jpg`.
pub fn path_for_creation(img_root: &Path, image_id: &str) -> anyhow::Result<PathBuf> {
    let mut chars = image_id.chars();
    let first = chars.next().unwrap_or('0').to_string();
    let second = chars.next().unwrap_or('0').to_string();
    let dir = img_root.join(first).join(second);
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(image_id))
}

/// `<base>.jpg` — базовый рендер обложки
pub fn base_file(destination: &Path) -> PathBuf {
    PathBuf::from(format!("{}.jpg", destination.display()))
}

/// `<base>-<variant>.jpg` — файл именованного варианта
pub fn variant_file(destination: &Path, variant_name: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}.jpg", destination.display(), variant_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 30, 200]));
        img.save(path).unwrap();
    }

    #[test]
    fn path_for_creation_nests_by_id_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let base = path_for_creation(tmp.path(), "ab12cd").unwrap();
        assert_eq!(base, tmp.path().join("a").join("b").join("ab12cd"));
        assert!(base.parent().unwrap().is_dir());
    }

    #[test]
    fn base_and_variant_file_names() {
        let dest = Path::new("/img/a/b/ab12cd");
        assert_eq!(base_file(dest), Path::new("/img/a/b/ab12cd.jpg"));
        assert_eq!(
            variant_file(dest, "large"),
            Path::new("/img/a/b/ab12cd-large.jpg")
        );
    }

    #[test]
    fn resize_produces_bounded_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src.jpg");
        write_test_jpeg(&src, 16, 8);

        let dest = tmp.path().join("out.jpg");
        resize(&src, &dest, Some((4, 4))).unwrap();

        let (w, h) = image::image_dimensions(&dest).unwrap();
        assert!(w <= 4 && h <= 4);

        let full = tmp.path().join("full.jpg");
        resize(&src, &full, None).unwrap();
        assert_eq!(image::image_dimensions(&full).unwrap(), (16, 8));
    }

    #[test]
    fn memory_limit_check() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("small.jpg");
        write_test_jpeg(&src, 10, 10);

        assert!(check_memory_limit(&src, 128));
        // Нулевой бюджет не проходит даже крошечный файл
        assert!(!check_memory_limit(&src, 0));
        // Нечитаемый файл считается превышением
        assert!(!check_memory_limit(&tmp.path().join("missing.jpg"), 128));
    }
}
