// --- File: crates/calmirror_sync/src/diff.rs ---
//! Pure planning step of a reconcile.
//!
//! Given the provider's full event list (A) and the account's active mirror
//! rows (B), decides which rows to overwrite (B ∩ A, only when a field
//! differs), which to soft-delete (B \ A) and which provider events to leave
//! alone (A \ B).

use calmirror_common::{
    EventFieldsUpdate, EventSchedule, MirrorEvent, ProviderEvent, RecordFailure, ScheduleError,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub updates: Vec<EventFieldsUpdate>,
    pub deletes: Vec<String>,
    pub unchanged: usize,
    pub ignored: usize,
    /// Provider events in B ∩ A whose start or end cannot be decomposed.
    pub failed: Vec<RecordFailure>,
}

/// Decomposes a provider event's start and end into mirror schedules.
pub fn decompose(event: &ProviderEvent) -> Result<(EventSchedule, EventSchedule), ScheduleError> {
    Ok((event.start.to_schedule()?, event.end.to_schedule()?))
}

pub fn plan(provider_events: &[ProviderEvent], active: &[MirrorEvent]) -> SyncPlan {
    let mirror: HashMap<&str, &MirrorEvent> = active
        .iter()
        .map(|row| (row.provider_event_id.as_str(), row))
        .collect();

    let mut plan = SyncPlan::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(provider_events.len());

    for event in provider_events {
        // The first listing of an id wins.
        if !seen.insert(event.id.as_str()) {
            continue;
        }

        let Some(row) = mirror.get(event.id.as_str()) else {
            plan.ignored += 1;
            continue;
        };

        match decompose(event) {
            Ok((start, end)) => {
                if row.title == event.title && row.start == start && row.end == end {
                    plan.unchanged += 1;
                } else {
                    plan.updates.push(EventFieldsUpdate {
                        provider_event_id: event.id.clone(),
                        title: event.title.clone(),
                        start,
                        end,
                    });
                }
            }
            Err(e) => plan.failed.push(RecordFailure::new(
                &event.id,
                format!("cannot decompose start/end: {}", e),
            )),
        }
    }

    plan.deletes = active
        .iter()
        .filter(|row| !seen.contains(row.provider_event_id.as_str()))
        .map(|row| row.provider_event_id.clone())
        .collect();

    plan
}
