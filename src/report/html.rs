//! Self-contained HTML rendering of a diagnosis

use chrono::Local;

use crate::diagnosis::{ContainerDiagnosis, DiagnosisResult, Severity};

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #1f2328; }
h1 { border-bottom: 1px solid #d1d9e0; padding-bottom: .3em; }
.meta { color: #59636e; }
table { border-collapse: collapse; margin: 1rem 0; }
td, th { border: 1px solid #d1d9e0; padding: .4em .8em; text-align: left; }
.container { border: 1px solid #d1d9e0; border-radius: 6px; padding: 1rem; margin: 1rem 0; }
.container.error { border-color: #cf222e; }
.container.warning { border-color: #9a6700; }
.issue { border-left: 4px solid #d1d9e0; padding: .4em .8em; margin: .6em 0; background: #f6f8fa; }
.issue.error { border-left-color: #cf222e; }
.issue.warning { border-left-color: #9a6700; }
.suggestion { color: #1a7f37; margin: .3em 0 0; }
.raw { font-family: monospace; color: #59636e; margin: .3em 0 0; }
pre { background: #f6f8fa; border-radius: 6px; padding: .8em; overflow-x: auto; }
";

/// Render a diagnosis as a single self-contained HTML document.
///
/// No external assets, so the file stays viewable when moved around or
/// attached to a ticket.
pub fn render(result: &DiagnosisResult) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>Diagnosis: {}</title>\n", escape(&result.pod_name)));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!("<h1>Pod diagnosis: {}</h1>\n", escape(&result.pod_name)));
    out.push_str(&format!(
        "<p class=\"meta\">Generated {} for {}/{}</p>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        escape(&result.namespace),
        escape(&result.pod_name)
    ));

    out.push_str("<table>\n");
    push_row(&mut out, "Namespace", &result.namespace);
    push_row(&mut out, "Node", result.node_name.as_deref().unwrap_or("<none>"));
    push_row(&mut out, "Phase", &result.phase);
    push_row(&mut out, "Restarts", &result.restart_count.to_string());
    push_row(&mut out, "Issues", &result.issue_count().to_string());
    out.push_str("</table>\n");

    for container in &result.containers {
        render_container(&mut out, container);
    }

    out.push_str("<h2>Recent events</h2>\n<ul>\n");
    for line in &result.events {
        out.push_str(&format!("<li>{}</li>\n", escape(line)));
    }
    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

fn render_container(out: &mut String, container: &ContainerDiagnosis) {
    let class = match container.worst_severity() {
        Some(Severity::Error) => "error",
        Some(Severity::Warning) => "warning",
        None => "ok",
    };
    out.push_str(&format!(
        "<div class=\"container {}\">\n<h2>{} {}</h2>\n",
        class,
        container.status_icon(),
        escape(&container.name)
    ));
    out.push_str(&format!(
        "<p>State: {} | ready: {} | restarts: {}</p>\n",
        escape(&container.state.to_string()),
        container.ready,
        container.restart_count
    ));
    if let Some(resources) = &container.resource_info {
        out.push_str(&format!("<p class=\"raw\">{}</p>\n", escape(resources)));
    }

    for issue in &container.issues {
        let class = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        out.push_str(&format!("<div class=\"issue {}\">\n", class));
        out.push_str(&format!("<strong>{}</strong> {}\n", issue.severity, escape(&issue.title)));
        if !issue.raw_error.is_empty() {
            out.push_str(&format!("<p class=\"raw\">{}</p>\n", escape(&issue.raw_error)));
        }
        out.push_str(&format!("<p class=\"suggestion\">💡 {}</p>\n</div>\n", escape(&issue.suggestion)));
    }

    if !container.log_tail.is_empty() {
        out.push_str("<h3>Log tail</h3>\n<pre>");
        for line in &container.log_tail {
            out.push_str(&escape(line));
            out.push('\n');
        }
        out.push_str("</pre>\n");
    }
    out.push_str("</div>\n");
}

fn push_row(out: &mut String, field: &str, value: &str) {
    out.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", field, escape(value)));
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
