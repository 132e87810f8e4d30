pub mod a001_product;
pub mod a002_product_image;
pub mod a003_language;
pub mod a004_image_type;
pub mod common;
