//! Cluster data access used by the analyzer

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::api::{ListParams, LogParams};
use kube::{Api, Client};

use crate::error::Result;

/// Read-only access to the cluster data the analyzer consumes.
///
/// The analyzer only ever reads through this trait, which keeps the
/// diagnosis logic testable without a live cluster.
#[async_trait]
pub trait DiagnosticSource: Send + Sync {
    /// Events recorded for the pod, unfiltered and unordered
    async fn pod_events(&self, pod: &Pod) -> Result<Vec<Event>>;

    /// The last `lines` lines of one container's log stream
    async fn log_tail(&self, pod: &Pod, container: &str, previous: bool, lines: i64) -> Result<String>;
}

/// Production source backed by the Kubernetes API
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DiagnosticSource for KubeSource {
    async fn pod_events(&self, pod: &Pod) -> Result<Vec<Event>> {
        let namespace = pod.metadata.namespace.as_deref().unwrap_or("default");
        let name = pod.metadata.name.as_deref().unwrap_or_default();
        let events: Api<Event> = Api::namespaced(self.client.clone(), namespace);

        // Matching the UID as well keeps events belonging to an earlier
        // pod of the same name out of the result.
        let mut selector = format!("involvedObject.name={},involvedObject.namespace={}", name, namespace);
        if let Some(uid) = &pod.metadata.uid {
            selector.push_str(&format!(",involvedObject.uid={}", uid));
        }

        let list = events.list(&ListParams::default().fields(&selector)).await?;
        Ok(list.items)
    }

    async fn log_tail(&self, pod: &Pod, container: &str, previous: bool, lines: i64) -> Result<String> {
        let namespace = pod.metadata.namespace.as_deref().unwrap_or("default");
        let name = pod.metadata.name.as_deref().unwrap_or_default();
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        let params = LogParams {
            container: Some(container.to_string()),
            tail_lines: Some(lines),
            previous,
            ..Default::default()
        };
        Ok(pods.logs(name, &params).await?)
    }
}
