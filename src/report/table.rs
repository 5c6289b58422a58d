//! Terminal rendering of a diagnosis

use owo_colors::OwoColorize;

use crate::diagnosis::{ContainerDiagnosis, DiagnosisResult, Severity};
use crate::output::format_table_raw;

/// Render a diagnosis for the terminal
pub fn render(result: &DiagnosisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        format!("Diagnosis: {}/{}", result.namespace, result.pod_name).bold()
    ));
    out.push_str(&format!("{}\n\n", "=".repeat(60)));

    let rows = vec![
        vec!["Phase".to_string(), result.phase.clone()],
        vec![
            "Node".to_string(),
            result.node_name.clone().unwrap_or_else(|| "<none>".to_string()),
        ],
        vec!["Restarts".to_string(), result.restart_count.to_string()],
        vec!["Containers".to_string(), result.containers.len().to_string()],
        vec!["Issues".to_string(), colorize_issue_count(result.issue_count())],
    ];
    out.push_str(&format_table_raw(&["FIELD", "VALUE"], &rows));
    out.push_str("\n\n");

    for container in &result.containers {
        render_container(&mut out, container);
    }

    out.push_str(&format!("{}\n", "Recent events".bold()));
    for line in &result.events {
        out.push_str(&format!("  {}\n", line));
    }

    out
}

fn render_container(out: &mut String, container: &ContainerDiagnosis) {
    out.push_str(&format!(
        "{} {}  {} | ready: {} | restarts: {}\n",
        container.status_icon(),
        container.name.bold(),
        container.state,
        container.ready,
        container.restart_count
    ));

    if let Some(resources) = &container.resource_info {
        out.push_str(&format!("   resources: {}\n", resources));
    }

    for issue in &container.issues {
        let tag = match issue.severity {
            Severity::Error => "[ERROR]".red().bold().to_string(),
            Severity::Warning => "[WARNING]".yellow().to_string(),
        };
        out.push_str(&format!("   {} {}\n", tag, issue.title));
        if !issue.raw_error.is_empty() {
            out.push_str(&format!("     {}\n", issue.raw_error));
        }
        out.push_str(&format!("     💡 {}\n", issue.suggestion));
    }

    if !container.log_signatures.is_empty() {
        out.push_str(&format!("   log signatures: {}\n", container.log_signatures.join(", ")));
    }
    if !container.log_tail.is_empty() {
        out.push_str(&format!("   last {} log lines:\n", container.log_tail.len()));
        for line in &container.log_tail {
            out.push_str(&format!("     {}\n", line));
        }
    }

    out.push('\n');
}

fn colorize_issue_count(count: usize) -> String {
    if count == 0 {
        "none".green().to_string()
    } else {
        count.to_string().red().bold().to_string()
    }
}
