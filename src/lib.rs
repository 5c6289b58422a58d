//! kubetriage - rule-based diagnosis for failing Kubernetes pods

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod monitor;
pub mod output;
pub mod report;
