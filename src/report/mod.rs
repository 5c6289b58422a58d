//! Diagnosis report rendering and persistence

pub mod html;
pub mod markdown;
pub mod store;
pub mod table;

pub use store::{ReportStore, StoredReport};
