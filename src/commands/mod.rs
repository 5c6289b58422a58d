//! Command implementations

pub mod diagnose;
pub mod monitor;
pub mod reports;

pub use diagnose::*;
pub use monitor::*;
pub use reports::*;
