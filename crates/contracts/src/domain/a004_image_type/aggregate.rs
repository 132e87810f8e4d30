use serde::{Deserialize, Serialize};

/// Именованный вариант изображения (width × height), настраиваемый в каталоге.
/// Для каждого варианта при импорте пишется файл `<dest>-<name>.jpg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageType {
    pub name: String,
    pub width: u32,
    pub height: u32,
}
