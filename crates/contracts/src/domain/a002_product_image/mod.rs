pub mod aggregate;

pub use aggregate::{ProductImage, ProductImageId};
