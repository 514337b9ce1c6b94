//! Event log reporter: per-component outcome counts for `sheweldo log`.

use std::collections::BTreeMap;

use crate::analytics::logger::ClientEvent;

/// Aggregated outcome counts for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummary {
    pub component: String,
    pub total: usize,
    /// Outcome name → count, sorted by outcome name.
    pub outcomes: BTreeMap<String, usize>,
    /// Timestamp of the most recent event.
    pub last_seen: String,
}

impl ComponentSummary {
    pub fn count(&self, outcome: &str) -> usize {
        self.outcomes.get(outcome).copied().unwrap_or(0)
    }

    /// Share of events that succeeded, in percent; 0.0 with no events.
    pub fn success_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.count("success") as f64 / self.total as f64) * 100.0
        }
    }
}

/// Group events by component, busiest component first.
pub fn summarize(events: &[ClientEvent]) -> Vec<ComponentSummary> {
    let mut groups: BTreeMap<&str, Vec<&ClientEvent>> = BTreeMap::new();
    for event in events {
        groups.entry(&event.component).or_default().push(event);
    }

    let mut summaries: Vec<ComponentSummary> = groups
        .into_iter()
        .map(|(component, group)| {
            let mut outcomes = BTreeMap::new();
            for e in &group {
                *outcomes.entry(e.outcome.clone()).or_default() += 1;
            }
            let last_seen = group
                .iter()
                .map(|e| e.timestamp.as_str())
                .max()
                .unwrap_or_default()
                .to_string();

            ComponentSummary {
                component: component.to_string(),
                total: group.len(),
                outcomes,
                last_seen,
            }
        })
        .collect();

    // Stable sort keeps component-name order among ties.
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
