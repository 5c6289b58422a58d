//! Diagnosis types and structures

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Container, ContainerStatus, Pod};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for diagnosis issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The pod is broken and needs intervention
    Error,
    /// Something is off but the pod may recover on its own
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Simplified view of a container's lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContainerState {
    Waiting {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Running,
    Terminated {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        exit_code: i32,
    },
}

impl ContainerState {
    /// Collapse the three optional Kubernetes state structs into one variant.
    ///
    /// An absent or empty state is reported as waiting with an unknown
    /// reason, which is how the API server represents a container that
    /// has not started yet.
    pub fn from_k8s(state: Option<&k8s_openapi::api::core::v1::ContainerState>) -> Self {
        if let Some(state) = state {
            if let Some(waiting) = &state.waiting {
                return ContainerState::Waiting {
                    reason: waiting.reason.clone().unwrap_or_else(|| "Unknown".to_string()),
                    message: waiting.message.clone(),
                };
            }
            if let Some(terminated) = &state.terminated {
                return ContainerState::Terminated {
                    reason: terminated.reason.clone().unwrap_or_else(|| "Unknown".to_string()),
                    message: terminated.message.clone(),
                    exit_code: terminated.exit_code,
                };
            }
            if state.running.is_some() {
                return ContainerState::Running;
            }
        }
        ContainerState::Waiting {
            reason: "Unknown".to_string(),
            message: None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerState::Waiting { reason, .. } => write!(f, "Waiting ({})", reason),
            ContainerState::Running => write!(f, "Running"),
            ContainerState::Terminated { reason, .. } => write!(f, "Terminated ({})", reason),
        }
    }
}

/// Flattened container status handed to the rules
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerView {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i32,
    pub state: ContainerState,
    /// State of the previous incarnation, if the container restarted
    pub last_state: Option<ContainerState>,
}

impl ContainerView {
    pub fn from_status(status: &ContainerStatus) -> Self {
        // The API server serializes a missing last state as an empty
        // object, so filter those out instead of mapping them to Unknown.
        let last_state = status
            .last_state
            .as_ref()
            .filter(|s| s.waiting.is_some() || s.running.is_some() || s.terminated.is_some())
            .map(|s| ContainerState::from_k8s(Some(s)));

        Self {
            name: status.name.clone(),
            image: status.image.clone(),
            ready: status.ready,
            restart_count: status.restart_count,
            state: ContainerState::from_k8s(status.state.as_ref()),
            last_state,
        }
    }
}

/// Outcome of a single rule firing
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Name of the rule that produced this result
    pub rule: &'static str,
    pub title: String,
    pub raw_error: String,
    pub suggestion: String,
}

/// A single finding attached to a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub title: String,
    pub raw_error: String,
    pub suggestion: String,
}

impl Issue {
    pub fn from_check(check: CheckResult, severity: Severity) -> Self {
        Self {
            severity,
            title: check.title,
            raw_error: check.raw_error,
            suggestion: check.suggestion,
        }
    }
}

/// Everything the analyzer learned about one container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDiagnosis {
    pub name: String,
    pub state: ContainerState,
    pub ready: bool,
    pub restart_count: i32,
    /// Requests and limits summary, if the container spec declares any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_info: Option<String>,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub log_tail: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub log_signatures: Vec<String>,
}

impl ContainerDiagnosis {
    /// Most severe issue attached to this container, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).min()
    }

    pub fn status_icon(&self) -> &'static str {
        match self.worst_severity() {
            Some(Severity::Error) => "🛑",
            Some(Severity::Warning) => "⚠️",
            None => "✅",
        }
    }
}

/// Full diagnosis for one pod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub pod_name: String,
    pub namespace: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    pub phase: String,
    /// Restarts summed across all containers
    pub restart_count: i32,
    pub containers: Vec<ContainerDiagnosis>,
    /// Pre-formatted recent event lines, oldest first
    pub events: Vec<String>,
}

impl DiagnosisResult {
    pub fn has_issues(&self) -> bool {
        self.containers.iter().any(|c| !c.issues.is_empty())
    }

    pub fn issue_count(&self) -> usize {
        self.containers.iter().map(|c| c.issues.len()).sum()
    }

    /// Most severe issue across all containers, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.containers.iter().filter_map(|c| c.worst_severity()).min()
    }
}

/// Human meaning of a container exit code
pub fn explain_exit_code(code: i32) -> String {
    match code {
        0 => "success".to_string(),
        1 => "general error".to_string(),
        2 => "misuse of shell builtins".to_string(),
        126 => "command cannot execute".to_string(),
        127 => "command not found".to_string(),
        128 => "invalid exit argument".to_string(),
        130 => "terminated by SIGINT".to_string(),
        137 => "killed by SIGKILL, often OOM".to_string(),
        143 => "terminated by SIGTERM".to_string(),
        c if c > 128 => format!("killed by signal {}", c - 128),
        _ => "unknown exit code".to_string(),
    }
}

pub fn format_exit_code(code: i32) -> String {
    format!("{} ({})", code, explain_exit_code(code))
}

/// Sum restart counts across all containers of a pod
pub fn total_restarts(pod: &Pod) -> i32 {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .map(|statuses| statuses.iter().map(|cs| cs.restart_count).sum())
        .unwrap_or(0)
}

/// Coarse "Ns/Nm/Nh ago" formatting for event timestamps
pub fn relative_age(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - ts).num_seconds().max(0);
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}

/// One-line requests/limits summary for a container spec
pub fn resource_summary(container: &Container) -> String {
    let quantity = |map: Option<&std::collections::BTreeMap<String, k8s_openapi::apimachinery::pkg::api::resource::Quantity>>,
                    key: &str| {
        map.and_then(|m| m.get(key))
            .map(|q| q.0.clone())
            .filter(|v| !v.is_empty() && v != "0")
            .unwrap_or_else(|| "unset".to_string())
    };
    let requests = container.resources.as_ref().and_then(|r| r.requests.as_ref());
    let limits = container.resources.as_ref().and_then(|r| r.limits.as_ref());
    format!(
        "CPU(req={}/lim={}) | Mem(req={}/lim={})",
        quantity(requests, "cpu"),
        quantity(limits, "cpu"),
        quantity(requests, "memory"),
        quantity(limits, "memory"),
    )
}

/// Memory limit of a container spec, ignoring unset or zero values
pub fn memory_limit(container: &Container) -> Option<String> {
    container
        .resources
        .as_ref()?
        .limits
        .as_ref()?
        .get("memory")
        .map(|q| q.0.clone())
        .filter(|v| !v.is_empty() && v != "0")
}
