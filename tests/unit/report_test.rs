// Tests for report rendering and the on-disk store

use std::time::Duration;

use kubetriage::diagnosis::{
    ContainerDiagnosis, ContainerState, DiagnosisResult, Issue, Severity,
};
use kubetriage::report::{html, markdown, table, ReportStore};

fn sample_result() -> DiagnosisResult {
    DiagnosisResult {
        pod_name: "web".to_string(),
        namespace: "default".to_string(),
        uid: "uid-web".to_string(),
        node_name: Some("node-1".to_string()),
        phase: "Running".to_string(),
        restart_count: 3,
        containers: vec![ContainerDiagnosis {
            name: "app".to_string(),
            state: ContainerState::Waiting {
                reason: "CrashLoopBackOff".to_string(),
                message: None,
            },
            ready: false,
            restart_count: 3,
            resource_info: Some("CPU(req=unset/lim=500m) | Mem(req=unset/lim=256Mi)".to_string()),
            issues: vec![Issue {
                severity: Severity::Error,
                title: "Container app was OOM killed".to_string(),
                raw_error: "Exit code: 137 (killed by SIGKILL, often OOM)".to_string(),
                suggestion: "Memory limit is 256Mi. Raise the limit or reduce the workload's memory footprint.".to_string(),
            }],
            log_tail: vec!["Out of memory: Kill process 1 (app)".to_string()],
            log_signatures: vec!["Out of memory".to_string()],
        }],
        events: vec!["🔸 [10m ago] BackOff: Back-off restarting failed container".to_string()],
    }
}

fn healthy_result() -> DiagnosisResult {
    DiagnosisResult {
        pod_name: "web".to_string(),
        namespace: "default".to_string(),
        uid: "uid-web".to_string(),
        node_name: None,
        phase: "Running".to_string(),
        restart_count: 0,
        containers: vec![ContainerDiagnosis {
            name: "app".to_string(),
            state: ContainerState::Running,
            ready: true,
            restart_count: 0,
            resource_info: None,
            issues: Vec::new(),
            log_tail: Vec::new(),
            log_signatures: Vec::new(),
        }],
        events: vec!["No recent events".to_string()],
    }
}

#[test]
fn test_table_render_sections() {
    let out = table::render(&sample_result());
    assert!(out.contains("Diagnosis: default/web"));
    assert!(out.contains("Phase"));
    assert!(out.contains("node-1"));
    assert!(out.contains("[ERROR]"));
    assert!(out.contains("Container app was OOM killed"));
    assert!(out.contains("💡 Memory limit is 256Mi."));
    assert!(out.contains("resources: CPU(req=unset/lim=500m)"));
    assert!(out.contains("log signatures: Out of memory"));
    assert!(out.contains("last 1 log lines:"));
    assert!(out.contains("Recent events"));
    assert!(out.contains("BackOff"));
}

#[test]
fn test_table_render_healthy_pod() {
    let out = table::render(&healthy_result());
    assert!(out.contains("none"));
    assert!(!out.contains("[ERROR]"));
    assert!(!out.contains("log signatures"));
    assert!(out.contains("<none>"));
}

#[test]
fn test_markdown_render_structure() {
    let out = markdown::render(&sample_result());
    assert!(out.contains("# Pod diagnosis: web"));
    assert!(out.contains("## Basic info"));
    assert!(out.contains("| Phase | **Running** |"));
    assert!(out.contains("### 🛑 app"));
    assert!(out.contains("> 🛑 **ERROR** Container app was OOM killed"));
    assert!(out.contains("> `Exit code: 137 (killed by SIGKILL, often OOM)`"));
    assert!(out.contains("<details><summary>Log tail</summary>"));
    assert!(out.contains("## Recent events"));
    assert!(out.contains("- 🔸 [10m ago] BackOff"));
}

#[test]
fn test_markdown_render_healthy_pod() {
    let out = markdown::render(&healthy_result());
    assert!(out.contains("No issues found."));
    assert!(out.contains("| Node | `<none>` |"));
    assert!(!out.contains("<details>"));
}

#[test]
fn test_html_render_is_self_contained_document() {
    let out = html::render(&sample_result());
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("<style>"));
    assert!(out.contains("<h1>Pod diagnosis: web</h1>"));
    assert!(out.contains("<div class=\"container error\">"));
    assert!(out.contains("class=\"issue error\""));
    assert!(out.contains("Recent events"));
    assert!(out.ends_with("</html>\n"));
}

#[test]
fn test_html_render_escapes_markup() {
    let mut result = sample_result();
    result.pod_name = "web<1>".to_string();
    result.containers[0].log_tail = vec!["<script>alert(1)</script>".to_string()];

    let out = html::render(&result);
    assert!(out.contains("web&lt;1&gt;"));
    assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!out.contains("<script>"));
}

#[test]
fn test_html_render_healthy_container_class() {
    let out = html::render(&healthy_result());
    assert!(out.contains("<div class=\"container ok\">"));
}

#[test]
fn test_store_write_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());
    let content = "<html></html>";

    let path = store.write_report(&sample_result(), "html", content).unwrap();
    assert!(path.exists());
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("web_report_"));
    assert!(file_name.ends_with(".html"));

    let reports = store.list().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].pod_name, "web");
    assert_eq!(reports[0].file_name, file_name);
    assert_eq!(reports[0].size_bytes, content.len() as u64);
}

#[test]
fn test_store_auto_report_renders_html() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());

    let path = store.write_auto_report(&sample_result()).unwrap();
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("web_auto_"));
    assert!(file_name.ends_with(".html"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("<h1>Pod diagnosis: web</h1>"));

    let reports = store.list().unwrap();
    assert_eq!(reports[0].pod_name, "web");
}

#[test]
fn test_store_list_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path().join("does-not-exist"));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_store_list_skips_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());
    store.write_report(&sample_result(), "html", "x").unwrap();
    std::fs::write(dir.path().join("README.md"), "not a report").unwrap();
    std::fs::write(dir.path().join("notes.html"), "no marker").unwrap();

    let reports = store.list().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].pod_name, "web");
}

#[test]
fn test_store_list_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());

    let mut first = sample_result();
    first.pod_name = "older".to_string();
    store.write_report(&first, "html", "a").unwrap();

    std::thread::sleep(Duration::from_millis(50));

    let mut second = sample_result();
    second.pod_name = "newer".to_string();
    store.write_report(&second, "html", "b").unwrap();

    let reports = store.list().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].pod_name, "newer");
    assert_eq!(reports[1].pod_name, "older");
}
