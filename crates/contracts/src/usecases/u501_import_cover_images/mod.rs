pub mod response;

pub use response::{ImportDetail, ImportReport, ImportResponse, ImportStatus};
