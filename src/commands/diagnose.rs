//! Diagnose command implementation

use crate::cli::{DiagnoseArgs, OutputFormat};
use crate::client::create_client;
use crate::config::AppConfig;
use crate::diagnosis::{Analyzer, KubeSource};
use crate::error::{KtError, Result};
use crate::report::{html, markdown, table, ReportStore};
use chrono::Duration as ChronoDuration;
use k8s_openapi::api::core::v1::Pod;
use kube::Api;

/// Run the diagnose command
pub async fn run_diagnose(
    context: Option<&str>,
    namespace: Option<&str>,
    args: &DiagnoseArgs,
    output: OutputFormat,
    config: &AppConfig,
) -> Result<()> {
    let client = create_client(context).await?;
    let ns = namespace.unwrap_or("default");
    let api: Api<Pod> = Api::namespaced(client.clone(), ns);

    let pod = match api.get(&args.pod).await {
        Ok(pod) => pod,
        Err(kube::Error::Api(response)) if response.code == 404 => {
            return Err(KtError::PodNotFound {
                name: args.pod.clone(),
                namespace: ns.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let window = match &args.window {
        Some(raw) => parse_window(raw)?,
        None => ChronoDuration::seconds(config.diagnose.event_window_secs),
    };

    let analyzer = Analyzer::new(KubeSource::new(client))
        .with_event_window(window)
        .with_event_limit(args.events.unwrap_or(config.diagnose.event_limit))
        .with_tail_lines(args.tail.unwrap_or(config.diagnose.tail_lines));

    let result = analyzer.analyze_pod(&pod).await;

    match output {
        OutputFormat::Table => println!("{}", table::render(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Markdown => println!("{}", markdown::render(&result)),
        OutputFormat::Html => {
            let dir = args
                .report_dir
                .clone()
                .unwrap_or_else(|| config.monitor.report_dir.clone());
            let store = ReportStore::new(&dir);
            let path = store.write_report(&result, "html", &html::render(&result))?;
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Parse an event window like "1h" or "30m"
fn parse_window(raw: &str) -> Result<ChronoDuration> {
    let parsed = humantime::parse_duration(raw)
        .map_err(|e| KtError::InvalidArgument(format!("Invalid window '{}': {}", raw, e)))?;
    Ok(ChronoDuration::seconds(parsed.as_secs() as i64))
}
