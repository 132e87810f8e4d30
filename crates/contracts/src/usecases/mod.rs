pub mod u501_import_cover_images;
