// Common test utilities and helpers

use chrono::{Duration as ChronoDuration, Utc};
use k8s_openapi::api::core::v1::{
    Container, ContainerState, ContainerStateRunning, ContainerStateTerminated,
    ContainerStateWaiting, ContainerStatus, Event, Pod, PodCondition, PodSpec, PodStatus,
    ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use std::collections::BTreeMap;

/// Create a mock Pod for testing
pub fn create_mock_pod(name: &str, namespace: &str, phase: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("uid-{}", name)),
            creation_timestamp: Some(Time(Utc::now() - ChronoDuration::hours(1))),
            ..Default::default()
        },
        spec: Some(PodSpec::default()),
        status: Some(PodStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        }),
    }
}

/// Add a container to the pod spec, optionally with a memory limit
pub fn with_container_spec(mut pod: Pod, name: &str, memory_limit: Option<&str>) -> Pod {
    let mut container = Container {
        name: name.to_string(),
        image: Some(format!("{}:latest", name)),
        ..Default::default()
    };
    if let Some(limit) = memory_limit {
        let mut limits = BTreeMap::new();
        limits.insert("memory".to_string(), Quantity(limit.to_string()));
        container.resources = Some(ResourceRequirements {
            limits: Some(limits),
            ..Default::default()
        });
    }
    let spec = pod.spec.get_or_insert_with(PodSpec::default);
    spec.containers.push(container);
    pod
}

/// Add a container status to the pod
pub fn with_container_status(mut pod: Pod, status: ContainerStatus) -> Pod {
    let pod_status = pod.status.get_or_insert_with(PodStatus::default);
    pod_status
        .container_statuses
        .get_or_insert_with(Vec::new)
        .push(status);
    pod
}

/// Container status stuck in a waiting state
pub fn waiting_status(name: &str, reason: &str, message: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        image: format!("{}:latest", name),
        ready: false,
        restart_count: 0,
        state: Some(ContainerState {
            waiting: Some(ContainerStateWaiting {
                reason: Some(reason.to_string()),
                message: Some(message.to_string()),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Container status whose current state is terminated
pub fn terminated_status(name: &str, reason: &str, exit_code: i32) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        image: format!("{}:latest", name),
        ready: false,
        restart_count: 1,
        state: Some(ContainerState {
            terminated: Some(ContainerStateTerminated {
                reason: Some(reason.to_string()),
                exit_code,
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Healthy running container status
pub fn running_status(name: &str) -> ContainerStatus {
    ContainerStatus {
        name: name.to_string(),
        image: format!("{}:latest", name),
        ready: true,
        restart_count: 0,
        state: Some(ContainerState {
            running: Some(ContainerStateRunning::default()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Record a previous termination on an existing status
pub fn with_last_termination(
    mut status: ContainerStatus,
    reason: &str,
    exit_code: i32,
) -> ContainerStatus {
    status.last_state = Some(ContainerState {
        terminated: Some(ContainerStateTerminated {
            reason: Some(reason.to_string()),
            exit_code,
            ..Default::default()
        }),
        ..Default::default()
    });
    status
}

/// Mark the pod as failed scheduling
pub fn with_unschedulable_condition(mut pod: Pod, message: &str) -> Pod {
    let status = pod.status.get_or_insert_with(PodStatus::default);
    status
        .conditions
        .get_or_insert_with(Vec::new)
        .push(PodCondition {
            type_: "PodScheduled".to_string(),
            status: "False".to_string(),
            reason: Some("Unschedulable".to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        });
    pod
}

/// Create a mock Event stamped the given number of minutes in the past
pub fn create_mock_event(reason: &str, message: &str, event_type: &str, minutes_ago: i64) -> Event {
    Event {
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        type_: Some(event_type.to_string()),
        last_timestamp: Some(Time(Utc::now() - ChronoDuration::minutes(minutes_ago))),
        ..Default::default()
    }
}

/// In-memory diagnostic source for analyzer tests.
///
/// A `None` log slot makes the corresponding stream fail, which is how
/// the fallback paths get exercised.
#[derive(Default)]
pub struct MockSource {
    pub events: Vec<Event>,
    pub current_logs: Option<String>,
    pub previous_logs: Option<String>,
    pub fail_events: bool,
}

#[async_trait::async_trait]
impl kubetriage::diagnosis::DiagnosticSource for MockSource {
    async fn pod_events(&self, _pod: &Pod) -> kubetriage::error::Result<Vec<Event>> {
        if self.fail_events {
            return Err(kubetriage::error::KtError::Timeout("pod events".to_string()));
        }
        Ok(self.events.clone())
    }

    async fn log_tail(
        &self,
        _pod: &Pod,
        _container: &str,
        previous: bool,
        _lines: i64,
    ) -> kubetriage::error::Result<String> {
        let slot = if previous {
            &self.previous_logs
        } else {
            &self.current_logs
        };
        slot.clone()
            .ok_or_else(|| kubetriage::error::KtError::Config("no log stream".to_string()))
    }
}

/// Check if running in a Kubernetes environment (has kubeconfig)
pub fn has_kubeconfig() -> bool {
    std::env::var("KUBECONFIG").is_ok()
        || std::path::Path::new(&format!(
            "{}/.kube/config",
            std::env::var("HOME").unwrap_or_default()
        ))
        .exists()
}
