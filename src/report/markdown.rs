//! Markdown rendering of a diagnosis

use chrono::Local;

use crate::diagnosis::{DiagnosisResult, Severity};

/// Render a diagnosis as a Markdown document
pub fn render(result: &DiagnosisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Pod diagnosis: {}\n\n", result.pod_name));
    out.push_str(&format!(
        "> Generated {} for `{}/{}`\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        result.namespace,
        result.pod_name
    ));

    out.push_str("## Basic info\n\n");
    out.push_str("| Field | Value |\n");
    out.push_str("| :--- | :--- |\n");
    out.push_str(&format!("| Namespace | `{}` |\n", result.namespace));
    out.push_str(&format!(
        "| Node | `{}` |\n",
        result.node_name.as_deref().unwrap_or("<none>")
    ));
    out.push_str(&format!("| Phase | **{}** |\n", result.phase));
    out.push_str(&format!("| Restarts | {} |\n\n", result.restart_count));

    out.push_str("## Containers\n\n");
    for container in &result.containers {
        out.push_str(&format!("### {} {}\n\n", container.status_icon(), container.name));
        out.push_str(&format!(
            "State: {} | ready: {} | restarts: {}\n\n",
            container.state, container.ready, container.restart_count
        ));
        if let Some(resources) = &container.resource_info {
            out.push_str(&format!("Resources: `{}`\n\n", resources));
        }

        if container.issues.is_empty() {
            out.push_str("No issues found.\n\n");
        }
        for issue in &container.issues {
            let icon = match issue.severity {
                Severity::Error => "🛑",
                Severity::Warning => "⚠️",
            };
            out.push_str(&format!("> {} **{}** {}\n", icon, issue.severity, issue.title));
            if !issue.raw_error.is_empty() {
                out.push_str(&format!("> `{}`\n", issue.raw_error));
            }
            out.push_str(&format!("> 💡 {}\n>\n", issue.suggestion));
        }
        if !container.issues.is_empty() {
            out.push('\n');
        }

        if !container.log_tail.is_empty() {
            out.push_str("<details><summary>Log tail</summary>\n\n```\n");
            for line in &container.log_tail {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("```\n\n</details>\n\n");
        }
    }

    out.push_str("## Recent events\n\n");
    for line in &result.events {
        out.push_str(&format!("- {}\n", line));
    }

    out
}
