pub mod a001_product;
pub mod a002_product_image;
pub mod a004_image_type;
pub mod form_settings;
pub mod import_images;
