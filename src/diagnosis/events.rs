//! Recent-event summarization for a pod

use chrono::{DateTime, Duration, Utc};
use k8s_openapi::api::core::v1::Event;

use crate::diagnosis::types::relative_age;

pub const DEFAULT_EVENT_WINDOW_SECS: i64 = 3600;
pub const DEFAULT_EVENT_LIMIT: usize = 5;

/// Resolve the effective timestamp of an event.
///
/// Kubernetes populates different timestamp fields depending on which
/// component reported the event and how it was aggregated, so resolution
/// has to try them in priority order: the most recent observation, then
/// the precise event time, then the first observation. Returns None when
/// the event carries no usable timestamp at all.
pub fn event_timestamp(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| event.event_time.as_ref().map(|t| t.0))
        .or_else(|| event.first_timestamp.as_ref().map(|t| t.0))
}

/// Render the most recent in-window events, oldest first.
///
/// Events without a usable timestamp or older than the window are
/// dropped. At most `limit` lines come back, and an empty result is
/// replaced with a single placeholder line.
pub fn summarize_events(events: &[Event], window: Duration, limit: usize, now: DateTime<Utc>) -> Vec<String> {
    let cutoff = now - window;

    let mut timestamped: Vec<(DateTime<Utc>, &Event)> = events
        .iter()
        .filter_map(|e| event_timestamp(e).map(|ts| (ts, e)))
        .filter(|(ts, _)| *ts > cutoff)
        .collect();
    timestamped.sort_by_key(|(ts, _)| *ts);

    let start = timestamped.len().saturating_sub(limit);
    let lines: Vec<String> = timestamped[start..]
        .iter()
        .map(|(ts, e)| format_event_line(e, *ts, now))
        .collect();

    if lines.is_empty() {
        return vec!["No recent events".to_string()];
    }
    lines
}

fn format_event_line(event: &Event, ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let icon = if event.type_.as_deref() == Some("Warning") { "🔸" } else { "🔹" };
    let reason = event.reason.as_deref().unwrap_or("Unknown");
    let message = event.message.as_deref().unwrap_or("").trim();
    format!("{} [{}] {}: {}", icon, relative_age(ts, now), reason, message)
}
