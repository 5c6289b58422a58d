//! Reports command implementation

use crate::cli::{OutputFormat, ReportsArgs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::format_table_raw;
use crate::report::ReportStore;

/// Run the reports command
pub fn run_reports(args: &ReportsArgs, output: OutputFormat, config: &AppConfig) -> Result<()> {
    let dir = args
        .report_dir
        .clone()
        .unwrap_or_else(|| config.monitor.report_dir.clone());
    let store = ReportStore::new(&dir);
    let reports = store.list()?;

    if reports.is_empty() {
        println!("No reports found in {}", dir);
        return Ok(());
    }

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = reports
        .iter()
        .map(|r| {
            vec![
                r.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.pod_name.clone(),
                format_size(r.size_bytes),
                r.file_name.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        format_table_raw(&["MODIFIED", "POD", "SIZE", "FILE"], &rows)
    );

    Ok(())
}

/// Byte count as "X.X KB"
fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
