//! Rule-based pod diagnosis
//!
//! The pipeline is small: [`rules`] define the known failure
//! signatures, the [`engine`] picks the first matching one per
//! container, and the [`analyzer`] combines rule results with log
//! evidence and recent events into one [`DiagnosisResult`].

pub mod analyzer;
pub mod engine;
pub mod events;
pub mod logs;
pub mod rules;
pub mod source;
pub mod types;

pub use analyzer::Analyzer;
pub use engine::RuleEngine;
pub use source::{DiagnosticSource, KubeSource};
pub use types::*;
