//! Pattern catalog - static definitions of ordering/timing patterns
//!
//! These are the human-readable definitions interpolated into prompts so
//! the model applies the pattern the user actually picked.

use crate::domain::PatternKey;

/// Look up the definition for a pattern name
pub fn definition(name: &str) -> Option<&'static str> {
    match name {
        "untimed" => Some(
            "Order tasks within each section without assigning clock times. \
             Sequence matters; start and end times do not.",
        ),
        "timebox" => Some(
            "Assign every task an explicit start and end time within the user's \
             work hours. Estimate a realistic duration from the task text and \
             leave short gaps between demanding tasks.",
        ),
        "batching" => Some(
            "Group tasks of the same category back-to-back to minimize context \
             switching. Finish one category's batch before starting the next.",
        ),
        "alternating" => Some(
            "Alternate between categories so no two consecutive tasks share a \
             category. Use lighter tasks as recovery between demanding ones.",
        ),
        "3-3-3" => Some(
            "Structure the day as: 3 hours of deep focus on the most important \
             task, then 3 shorter urgent tasks, then 3 maintenance tasks that \
             keep life in order.",
        ),
        _ => None,
    }
}

/// Definitions for every name referenced by a key, preserving key order.
/// Unknown names are skipped - the prompt simply carries fewer definitions.
pub fn definitions_for(key: &PatternKey) -> Vec<(&str, &'static str)> {
    key.names()
        .into_iter()
        .filter_map(|name| definition(name).map(|text| (name, text)))
        .collect()
}
