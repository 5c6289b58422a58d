//! Failure-signature rules evaluated against a single container

use k8s_openapi::api::core::v1::{Container, Pod};

use crate::diagnosis::types::{format_exit_code, memory_limit, CheckResult, ContainerState, ContainerView};

pub const OOM_RULE: &str = "oom";
pub const IMAGE_PULL_RULE: &str = "image-pull";
pub const CRASH_LOOP_RULE: &str = "crash-loop";
pub const UNSCHEDULABLE_RULE: &str = "unschedulable";

/// A stateless check for one known failure signature.
///
/// Rules never look at each other's results. The engine decides which
/// rule wins when several would match.
pub trait Rule: Send + Sync {
    /// Stable identifier used for severity mapping and logging
    fn name(&self) -> &'static str;

    /// Evaluate one container, returning None when the rule does not apply
    fn check(&self, pod: &Pod, spec: Option<&Container>, view: &ContainerView) -> Option<CheckResult>;
}

/// Matches containers whose current or previous incarnation was OOM killed
pub struct OomRule;

impl Rule for OomRule {
    fn name(&self) -> &'static str {
        OOM_RULE
    }

    fn check(&self, _pod: &Pod, spec: Option<&Container>, view: &ContainerView) -> Option<CheckResult> {
        // A crash-looping container is usually Waiting right now with the
        // OOM kill recorded on its previous incarnation, so both states
        // are consulted. The current termination wins when both exist.
        let (reason, exit_code) = match (&view.state, &view.last_state) {
            (ContainerState::Terminated { reason, exit_code, .. }, _) => (reason, *exit_code),
            (_, Some(ContainerState::Terminated { reason, exit_code, .. })) => (reason, *exit_code),
            _ => return None,
        };
        if reason != "OOMKilled" {
            return None;
        }

        let suggestion = match spec.and_then(memory_limit) {
            Some(limit) => format!(
                "Memory limit is {}. Raise the limit or reduce the workload's memory footprint.",
                limit
            ),
            None => "No memory limit is set. Configure a memory limit sized to the workload.".to_string(),
        };

        Some(CheckResult {
            rule: OOM_RULE,
            title: format!("Container {} was OOM killed", view.name),
            raw_error: format!("Exit code: {}", format_exit_code(exit_code)),
            suggestion,
        })
    }
}

/// Matches containers stuck waiting on an image that cannot be fetched
pub struct ImagePullRule;

impl Rule for ImagePullRule {
    fn name(&self) -> &'static str {
        IMAGE_PULL_RULE
    }

    fn check(&self, _pod: &Pod, _spec: Option<&Container>, view: &ContainerView) -> Option<CheckResult> {
        let ContainerState::Waiting { reason, message } = &view.state else {
            return None;
        };
        if reason != "ImagePullBackOff" && reason != "ErrImagePull" {
            return None;
        }

        Some(CheckResult {
            rule: IMAGE_PULL_RULE,
            title: format!("Image {} cannot be pulled", view.image),
            raw_error: message.clone().unwrap_or_else(|| reason.clone()),
            suggestion: "Check that the image name has no typo, the tag exists in the registry, \
                         and the pull secret grants access."
                .to_string(),
        })
    }
}

/// Matches containers that start and promptly die, over and over
pub struct CrashLoopRule;

impl Rule for CrashLoopRule {
    fn name(&self) -> &'static str {
        CRASH_LOOP_RULE
    }

    fn check(&self, _pod: &Pod, _spec: Option<&Container>, view: &ContainerView) -> Option<CheckResult> {
        let ContainerState::Waiting { reason, message } = &view.state else {
            return None;
        };
        if reason != "CrashLoopBackOff" {
            return None;
        }

        let mut raw_error = message.clone().unwrap_or_else(|| reason.clone());
        if let Some(ContainerState::Terminated { reason, exit_code, .. }) = &view.last_state {
            raw_error.push_str(&format!(" | last exit: {} ({})", format_exit_code(*exit_code), reason));
        }

        Some(CheckResult {
            rule: CRASH_LOOP_RULE,
            title: format!("Container {} is crash looping", view.name),
            raw_error,
            suggestion: "The application keeps failing right after start. Check the captured log \
                         tail and the container configuration."
                .to_string(),
        })
    }
}

/// Matches pods the scheduler has explicitly refused to place
pub struct UnschedulableRule;

impl Rule for UnschedulableRule {
    fn name(&self) -> &'static str {
        UNSCHEDULABLE_RULE
    }

    fn check(&self, pod: &Pod, _spec: Option<&Container>, _view: &ContainerView) -> Option<CheckResult> {
        let status = pod.status.as_ref()?;
        if status.phase.as_deref() != Some("Pending") {
            return None;
        }

        let conditions = status.conditions.as_ref()?;
        let scheduling = conditions
            .iter()
            .find(|c| c.type_ == "PodScheduled" && c.status == "False")?;

        Some(CheckResult {
            rule: UNSCHEDULABLE_RULE,
            title: "Pod cannot be scheduled".to_string(),
            raw_error: scheduling.message.clone().unwrap_or_default(),
            suggestion: "The cluster is out of capacity or placement constraints cannot be \
                         satisfied. The recent events below carry the scheduler's explanation."
                .to_string(),
        })
    }
}
