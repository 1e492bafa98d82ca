#[cfg(test)]
mod tests {
    use crate::diff::{decompose, plan};
    use calmirror_common::{EventSchedule, MirrorEvent, ProviderEvent, ProviderTime};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn provider_event(id: u8, day: u32, minutes: Option<u32>, title: &str) -> ProviderEvent {
        let time = match minutes {
            Some(m) => ProviderTime::date_time(&format!(
                "2024-05-{:02}T{:02}:{:02}:00+02:00",
                day,
                m / 60,
                m % 60
            )),
            None => ProviderTime::date(&format!("2024-05-{:02}", day)),
        };
        ProviderEvent {
            id: format!("e{}", id),
            title: title.to_string(),
            start: time.clone(),
            end: time,
        }
    }

    fn mirror_row(id: u8, day: u32, title: &str) -> MirrorEvent {
        let start = EventSchedule::parse(&format!("2024-05-{:02}", day), Some("12:00")).unwrap();
        MirrorEvent {
            account_id: "acc".to_string(),
            provider_event_id: format!("e{}", id),
            mapping_id: None,
            title: title.to_string(),
            start,
            end: start,
            deleted: false,
        }
    }

    fn provider_strategy() -> impl Strategy<Value = Vec<ProviderEvent>> {
        prop::collection::vec(
            (0u8..20, 1u32..29, prop::option::of(0u32..1440), "[a-c]{1,2}"),
            0..15,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .map(|(id, day, minutes, title)| provider_event(id, day, minutes, &title))
                .collect()
        })
    }

    fn mirror_strategy() -> impl Strategy<Value = Vec<MirrorEvent>> {
        prop::collection::btree_map(0u8..20, (1u32..29, "[a-c]{1,2}"), 0..15).prop_map(|rows| {
            rows.into_iter()
                .map(|(id, (day, title))| mirror_row(id, day, &title))
                .collect()
        })
    }

    /// Applies a plan the way the store would.
    fn apply(active: &[MirrorEvent], plan: &crate::diff::SyncPlan) -> Vec<MirrorEvent> {
        active
            .iter()
            .filter(|row| !plan.deletes.contains(&row.provider_event_id))
            .map(|row| {
                let mut row = row.clone();
                if let Some(update) = plan
                    .updates
                    .iter()
                    .find(|u| u.provider_event_id == row.provider_event_id)
                {
                    row.title = update.title.clone();
                    row.start = update.start;
                    row.end = update.end;
                }
                row
            })
            .collect()
    }

    proptest! {
        #[test]
        fn test_every_active_row_lands_in_exactly_one_bucket(
            provider in provider_strategy(),
            active in mirror_strategy(),
        ) {
            let plan = plan(&provider, &active);
            let provider_ids: HashSet<&str> = provider.iter().map(|e| e.id.as_str()).collect();
            let updated: HashSet<&str> =
                plan.updates.iter().map(|u| u.provider_event_id.as_str()).collect();
            let deleted: HashSet<&str> = plan.deletes.iter().map(String::as_str).collect();

            prop_assert!(updated.is_disjoint(&deleted));
            for row in &active {
                let id = row.provider_event_id.as_str();
                prop_assert_eq!(deleted.contains(id), !provider_ids.contains(id));
            }
            prop_assert_eq!(
                plan.updates.len() + plan.unchanged + plan.failed.len(),
                active.iter().filter(|r| provider_ids.contains(r.provider_event_id.as_str())).count()
            );
            prop_assert_eq!(
                plan.ignored,
                provider_ids
                    .iter()
                    .filter(|id| !active.iter().any(|r| r.provider_event_id == **id))
                    .count()
            );
        }

        #[test]
        fn test_replanning_after_apply_is_empty(
            provider in provider_strategy(),
            active in mirror_strategy(),
        ) {
            let first = plan(&provider, &active);
            let after = apply(&active, &first);
            let second = plan(&provider, &after);

            prop_assert!(second.updates.is_empty());
            prop_assert!(second.deletes.is_empty());
        }

        #[test]
        fn test_applied_rows_carry_provider_values(
            provider in provider_strategy(),
            active in mirror_strategy(),
        ) {
            let after = apply(&active, &plan(&provider, &active));
            for row in &after {
                // The first listing of an id is the one that counts.
                let event = provider.iter().find(|e| e.id == row.provider_event_id).unwrap();
                let (start, end) = decompose(event).unwrap();
                prop_assert_eq!(&row.title, &event.title);
                prop_assert_eq!(row.start, start);
                prop_assert_eq!(row.end, end);
            }
        }
    }
}
