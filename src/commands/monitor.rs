//! Monitor command implementation

use crate::cli::MonitorArgs;
use crate::client::create_client;
use crate::config::AppConfig;
use crate::error::{KtError, Result};
use crate::monitor::{ChangeMonitor, MonitorOptions};
use crate::report::ReportStore;
use std::time::Duration;
use tracing::info;

/// Run the monitor command
pub async fn run_monitor(
    context: Option<&str>,
    namespace: Option<&str>,
    args: &MonitorArgs,
    config: &AppConfig,
) -> Result<()> {
    let client = create_client(context).await?;

    let resync = match &args.resync {
        Some(raw) => humantime::parse_duration(raw)
            .map_err(|e| KtError::InvalidArgument(format!("Invalid resync '{}': {}", raw, e)))?,
        None => Duration::from_secs(config.monitor.resync_secs),
    };

    let options = MonitorOptions {
        label_selector: args.selector.clone(),
        resync,
        cooldown: Duration::from_secs(args.cooldown.unwrap_or(config.monitor.cooldown_secs)),
        max_concurrent: args.max_concurrent.unwrap_or(config.monitor.max_concurrent),
    };

    let dir = args
        .report_dir
        .clone()
        .unwrap_or_else(|| config.monitor.report_dir.clone());
    let store = ReportStore::new(&dir);

    let monitor = ChangeMonitor::new(client, namespace.map(String::from), store, options);

    tokio::select! {
        result = monitor.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping watch");
            Ok(())
        }
    }
}
