//! Change-triggered re-diagnosis
//!
//! Watches a pod collection and re-runs the analyzer whenever a pod
//! transitions in a way that warrants a fresh look. Triggers are
//! deduplicated per pod identity by a [`CooldownTracker`] and dispatched
//! as independent tasks so the watch loop never blocks on a diagnosis.

pub mod cooldown;

pub use cooldown::CooldownTracker;

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::watcher;
use kube::{Api, Client};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::diagnosis::{total_restarts, Analyzer, KubeSource};
use crate::error::Result;
use crate::report::ReportStore;

/// Tuning knobs for the watch loop
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub label_selector: Option<String>,
    pub resync: Duration,
    pub cooldown: Duration,
    pub max_concurrent: usize,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            label_selector: None,
            resync: Duration::from_secs(600),
            cooldown: Duration::from_secs(60),
            max_concurrent: 8,
        }
    }
}

/// Last observed state of a pod, kept to detect qualifying transitions
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub phase: String,
    pub restarts: i32,
}

/// Whether a pod seen for the first time warrants a diagnosis
pub fn should_diagnose_new(phase: &str) -> bool {
    phase != "Running" && phase != "Succeeded"
}

/// Whether an updated pod warrants a diagnosis.
///
/// Unchanged phase and restart count is resync noise and never
/// qualifies. A change into Running without a restart increase is a
/// recovery and needs no diagnosis either.
pub fn should_diagnose_update(previous: &Observed, phase: &str, restarts: i32) -> bool {
    let phase_changed = previous.phase != phase;
    let restarted = restarts > previous.restarts;
    if !phase_changed && !restarted {
        return false;
    }
    phase != "Running" || restarted
}

/// Watches pods and dispatches analyzer runs on qualifying changes
pub struct ChangeMonitor {
    client: Client,
    namespace: Option<String>,
    options: MonitorOptions,
    analyzer: Arc<Analyzer<KubeSource>>,
    store: Arc<ReportStore>,
    cooldown: CooldownTracker,
    observed: DashMap<String, Observed>,
    permits: Arc<Semaphore>,
}

impl ChangeMonitor {
    pub fn new(client: Client, namespace: Option<String>, store: ReportStore, options: MonitorOptions) -> Self {
        let analyzer = Analyzer::new(KubeSource::new(client.clone()));
        let cooldown = CooldownTracker::new(options.cooldown);
        let permits = Arc::new(Semaphore::new(options.max_concurrent));
        Self {
            client,
            namespace,
            options,
            analyzer: Arc::new(analyzer),
            store: Arc::new(store),
            cooldown,
            observed: DashMap::new(),
            permits,
        }
    }

    /// Run the watch loop until the stream ends or fails
    pub async fn run(&self) -> Result<()> {
        let api: Api<Pod> = match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let mut config = watcher::Config::default();
        if let Some(selector) = &self.options.label_selector {
            config = config.labels(selector);
        }
        // The API server caps watch requests at roughly five minutes,
        // so longer resync settings would be silently truncated.
        config = config.timeout(self.options.resync.as_secs().min(290) as u32);

        info!(
            "Watching pods in {} (cooldown {}s, max {} concurrent diagnoses)",
            self.namespace.as_deref().unwrap_or("all namespaces"),
            self.options.cooldown.as_secs(),
            self.options.max_concurrent
        );

        let stream = watcher(api, config);
        futures::pin_mut!(stream);

        while let Some(event) = stream.try_next().await? {
            match event {
                watcher::Event::Init | watcher::Event::InitDone => {}
                watcher::Event::InitApply(pod) | watcher::Event::Apply(pod) => self.handle_apply(&pod),
                watcher::Event::Delete(pod) => self.handle_delete(&pod),
            }
        }

        Ok(())
    }

    fn handle_apply(&self, pod: &Pod) {
        let Some(uid) = pod.metadata.uid.clone() else {
            return;
        };
        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let restarts = total_restarts(pod);

        // Clone out of the map before the insert below; holding the
        // guard across it would deadlock on the shard.
        let previous = self.observed.get(&uid).map(|entry| entry.value().clone());

        let wanted = match &previous {
            None => should_diagnose_new(&phase),
            Some(previous) => should_diagnose_update(previous, &phase, restarts),
        };

        self.observed.insert(uid.clone(), Observed { phase, restarts });

        if wanted {
            self.schedule(&uid, pod);
        }
    }

    fn handle_delete(&self, pod: &Pod) {
        let Some(uid) = pod.metadata.uid.as_deref() else {
            return;
        };
        self.observed.remove(uid);
        self.cooldown.forget(uid);
        debug!("Forgot deleted pod {}", pod.metadata.name.as_deref().unwrap_or_default());
    }

    fn schedule(&self, uid: &str, pod: &Pod) {
        let name = pod.metadata.name.clone().unwrap_or_default();

        if !self.cooldown.try_begin(uid) {
            debug!("Change on {} suppressed by cooldown", name);
            return;
        }

        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            warn!("Diagnosis queue full, dropping trigger for {}", name);
            return;
        };

        info!("Scheduling diagnosis for {}", name);

        let analyzer = Arc::clone(&self.analyzer);
        let store = Arc::clone(&self.store);
        let pod = pod.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let result = analyzer.analyze_pod(&pod).await;
            match store.write_auto_report(&result) {
                Ok(path) => info!(
                    "Wrote report for {} ({} issues) to {}",
                    result.pod_name,
                    result.issue_count(),
                    path.display()
                ),
                Err(e) => error!("Failed to write report for {}: {}", result.pod_name, e),
            }
        });
    }
}
