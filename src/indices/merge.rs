//! Append-only merge of a fresh reading into an indicator history

use crate::model::DailyObservation;

/// What `merge_observation` did with the new reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No entry had the same date; the reading was appended
    Appended,
    /// An entry for that date already exists; history left untouched
    AlreadyPresent,
}

/// Returns true if both readings are for the same day
///
/// Dates are compared as calendar dates when both parse, so `05/01/2024` and
/// `2024-01-05` are the same day; otherwise the raw text must match.
fn same_day(a: &DailyObservation, b: &DailyObservation) -> bool {
    match (a.date(), b.date()) {
        (Some(left), Some(right)) => left == right,
        _ => a.fecha.trim() == b.fecha.trim(),
    }
}

/// Appends `new` unless the history already holds a reading for that day
///
/// Idempotent: merging the same reading twice gives the same history as
/// merging it once.
pub fn merge_observation(
    mut history: Vec<DailyObservation>,
    new: DailyObservation,
) -> (Vec<DailyObservation>, MergeOutcome) {
    if history.iter().any(|existing| same_day(existing, &new)) {
        tracing::info!("Reading for {} already present", new.fecha);
        return (history, MergeOutcome::AlreadyPresent);
    }

    tracing::info!("Appending reading for {}", new.fecha);
    history.push(new);
    (history, MergeOutcome::Appended)
}
