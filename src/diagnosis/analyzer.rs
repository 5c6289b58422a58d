//! Pod diagnosis orchestration

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use k8s_openapi::api::core::v1::{Container, ContainerStatus, Pod};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::diagnosis::engine::RuleEngine;
use crate::diagnosis::events::{summarize_events, DEFAULT_EVENT_LIMIT, DEFAULT_EVENT_WINDOW_SECS};
use crate::diagnosis::logs::{analyze_tail, LogEvidence, DEFAULT_TAIL_LINES};
use crate::diagnosis::rules::OOM_RULE;
use crate::diagnosis::source::DiagnosticSource;
use crate::diagnosis::types::{
    resource_summary, total_restarts, ContainerDiagnosis, ContainerState, ContainerView, DiagnosisResult,
    Issue, Severity,
};
use crate::error::{KtError, Result};

/// Cap on any single events or logs fetch
const SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the rule engine, log classification and event summary for one
/// pod and folds everything into a [`DiagnosisResult`].
pub struct Analyzer<S> {
    source: S,
    engine: RuleEngine,
    event_window: ChronoDuration,
    event_limit: usize,
    tail_lines: i64,
}

impl<S: DiagnosticSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            engine: RuleEngine::new(),
            event_window: ChronoDuration::seconds(DEFAULT_EVENT_WINDOW_SECS),
            event_limit: DEFAULT_EVENT_LIMIT,
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    pub fn with_event_window(mut self, window: ChronoDuration) -> Self {
        self.event_window = window;
        self
    }

    pub fn with_event_limit(mut self, limit: usize) -> Self {
        self.event_limit = limit;
        self
    }

    pub fn with_tail_lines(mut self, lines: i64) -> Self {
        self.tail_lines = lines;
        self
    }

    /// Diagnose a single pod.
    ///
    /// This never fails: anything the source cannot deliver degrades
    /// into a placeholder line inside the result.
    pub async fn analyze_pod(&self, pod: &Pod) -> DiagnosisResult {
        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let mut result = DiagnosisResult {
            pod_name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_else(|| "default".to_string()),
            uid: pod.metadata.uid.clone().unwrap_or_default(),
            node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
            phase: phase.clone(),
            restart_count: total_restarts(pod),
            containers: Vec::new(),
            events: self.collect_events(pod).await,
        };

        let statuses: &[ContainerStatus] = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_deref())
            .unwrap_or(&[]);
        for status in statuses {
            let spec = find_container_spec(pod, &status.name);
            result.containers.push(self.diagnose_container(pod, status, spec).await);
        }

        // A pod that never got a container status can still be broken:
        // scheduling failures live on the pod conditions, not on the
        // containers. Probe the rules with a placeholder status and keep
        // the entry only if something actually matched.
        if statuses.is_empty() && phase == "Pending" {
            let placeholder = ContainerStatus {
                name: "n/a".to_string(),
                ..Default::default()
            };
            let mut diagnosis = self.diagnose_container(pod, &placeholder, None).await;
            if !diagnosis.issues.is_empty() {
                diagnosis.state = ContainerState::Waiting {
                    reason: phase,
                    message: None,
                };
                result.containers.push(diagnosis);
            }
        }

        result
    }

    async fn diagnose_container(
        &self,
        pod: &Pod,
        status: &ContainerStatus,
        spec: Option<&Container>,
    ) -> ContainerDiagnosis {
        let view = ContainerView::from_status(status);
        let mut issues = Vec::new();

        if let Some(check) = self.engine.run(pod, spec, &view) {
            let severity = if check.rule == OOM_RULE { Severity::Error } else { Severity::Warning };
            issues.push(Issue::from_check(check, severity));
        }

        // Fetching logs of a healthy never-restarted container would be
        // wasted work.
        let needs_logs = !view.state.is_running() || view.restart_count > 0;
        let evidence = if needs_logs {
            self.collect_log_evidence(pod, &view).await
        } else {
            LogEvidence::default()
        };

        if !evidence.signatures.is_empty() {
            issues.push(Issue {
                severity: Severity::Error,
                title: format!("Log tail matches: {}", evidence.signatures.join(", ")),
                raw_error: String::new(),
                suggestion: "Inspect the captured log tail below for the underlying failure.".to_string(),
            });
        }

        ContainerDiagnosis {
            name: view.name.clone(),
            state: view.state.clone(),
            ready: view.ready,
            restart_count: view.restart_count,
            resource_info: spec.map(resource_summary),
            issues,
            log_tail: evidence.lines,
            log_signatures: evidence.signatures,
        }
    }

    async fn collect_log_evidence(&self, pod: &Pod, view: &ContainerView) -> LogEvidence {
        // After a restart the interesting output usually belongs to the
        // incarnation that died, so ask for the previous stream first.
        if view.restart_count > 0 {
            match self.fetch_tail(pod, &view.name, true).await {
                Ok(raw) => return analyze_tail(&raw),
                Err(e) => debug!("No previous log stream for {}: {}", view.name, e),
            }
        }

        match self.fetch_tail(pod, &view.name, false).await {
            Ok(raw) => analyze_tail(&raw),
            Err(e) => LogEvidence {
                lines: vec![format!("❌ Cannot fetch logs: {}", e)],
                signatures: Vec::new(),
            },
        }
    }

    async fn fetch_tail(&self, pod: &Pod, container: &str, previous: bool) -> Result<String> {
        timeout(SOURCE_TIMEOUT, self.source.log_tail(pod, container, previous, self.tail_lines))
            .await
            .map_err(|_| KtError::Timeout(format!("logs of container {}", container)))?
    }

    async fn collect_events(&self, pod: &Pod) -> Vec<String> {
        let fetched = timeout(SOURCE_TIMEOUT, self.source.pod_events(pod))
            .await
            .map_err(|_| KtError::Timeout("pod events".to_string()))
            .and_then(|r| r);

        match fetched {
            Ok(events) => summarize_events(&events, self.event_window, self.event_limit, Utc::now()),
            Err(e) => {
                warn!("Failed to fetch events: {}", e);
                vec![format!("❌ Failed to fetch events: {}", e)]
            }
        }
    }
}

fn find_container_spec<'a>(pod: &'a Pod, name: &str) -> Option<&'a Container> {
    pod.spec.as_ref().and_then(|s| s.containers.iter().find(|c| c.name == name))
}
