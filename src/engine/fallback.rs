//! Fallback assembly and the terminal error response
//!
//! Round-robin distribution keeps schedules available when the ordering
//! stage fails; the error response keeps the user's pre-existing task list
//! intact when anything else does. Neither path touches the completion
//! service.

use serde_json::Value;
use tracing::debug;

use crate::domain::{LayoutType, PatternKey, ScheduleResult, Task, TaskRegistry};

use super::registry::convert_task;

/// Distribute registry tasks round-robin across the sections.
///
/// Task `i` lands in section `i % section_count`, keeping each bucket in
/// registry order. With no sections (unstructured layouts) the result is
/// the flat registry order.
pub fn round_robin(registry: &TaskRegistry, sections: &[String]) -> Vec<Task> {
    if sections.is_empty() {
        return registry.iter().cloned().collect();
    }

    let mut buckets: Vec<Vec<Task>> = vec![Vec::new(); sections.len()];
    for (i, task) in registry.iter().enumerate() {
        let slot = i % sections.len();
        let mut task = task.clone();
        task.section = Some(sections[slot].clone());
        buckets[slot].push(task);
    }

    let mut out = Vec::with_capacity(registry.len() + sections.len());
    for (section, bucket) in sections.iter().zip(buckets) {
        out.push(Task::section_header(section));
        out.extend(bucket);
    }
    out
}

/// The terminal error response.
///
/// Reconstructs the caller's original tasks best-effort from the raw input
/// and wraps them with the planned section headers, so a failure anywhere
/// in the pipeline never costs the user their existing schedule.
pub fn error_response(
    raw_tasks: &[Value],
    layout: LayoutType,
    pattern: PatternKey,
    sections: &[String],
    error: impl ToString,
) -> ScheduleResult {
    let mut registry = TaskRegistry::new();
    for value in raw_tasks {
        if let Some(converted) = convert_task(value) {
            if !converted.task.is_header() {
                registry.insert(converted.task);
            }
        }
    }
    debug!(
        recovered = registry.len(),
        "building error response from original tasks"
    );

    let tasks = round_robin(&registry, sections);
    ScheduleResult::failed(tasks, layout, pattern, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_of(ids: &[&str]) -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for id in ids {
            registry.insert(Task::with_id(*id, format!("task {}", id)));
        }
        registry
    }

    fn sections() -> Vec<String> {
        vec![
            "Morning".to_string(),
            "Afternoon".to_string(),
            "Evening".to_string(),
        ]
    }

    #[test]
    fn test_round_robin_distribution() {
        let registry = registry_of(&["a", "b", "c", "d", "e"]);
        let tasks = round_robin(&registry, &sections());

        let shape: Vec<(&str, bool)> = tasks
            .iter()
            .map(|t| (t.text.as_str(), t.is_header()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Morning", true),
                ("task a", false),
                ("task d", false),
                ("Afternoon", true),
                ("task b", false),
                ("task e", false),
                ("Evening", true),
                ("task c", false),
            ]
        );
    }

    #[test]
    fn test_round_robin_sets_section_field() {
        let registry = registry_of(&["a", "b"]);
        let tasks = round_robin(&registry, &sections());
        let a = tasks.iter().find(|t| t.id == "a").unwrap();
        let b = tasks.iter().find(|t| t.id == "b").unwrap();
        assert_eq!(a.section.as_deref(), Some("Morning"));
        assert_eq!(b.section.as_deref(), Some("Afternoon"));
    }

    #[test]
    fn test_round_robin_no_sections_is_flat() {
        let registry = registry_of(&["a", "b", "c"]);
        let tasks = round_robin(&registry, &[]);
        assert!(tasks.iter().all(|t| !t.is_header()));
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_round_robin_empty_registry() {
        let registry = TaskRegistry::new();
        let tasks = round_robin(&registry, &sections());
        // Headers only
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.is_header()));
    }

    #[test]
    fn test_error_response_preserves_original_tasks() {
        let raw = vec![
            json!({"id": "a", "text": "first", "categories": ["Work"]}),
            json!({"id": "b", "text": "second"}),
        ];
        let result = error_response(
            &raw,
            LayoutType::Structured,
            PatternKey::default(),
            &sections(),
            "prompt construction failed",
        );

        assert!(!result.success);
        assert!(result.fallback_used);
        assert!(result.show_notice);
        assert_eq!(result.error.as_deref(), Some("prompt construction failed"));

        let ids: Vec<&str> = result
            .tasks
            .iter()
            .filter(|t| !t.is_header())
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_error_response_tolerates_garbage_input() {
        let raw = vec![json!(42), json!({"id": "a", "text": "survivor"})];
        let result = error_response(
            &raw,
            LayoutType::Unstructured,
            PatternKey::default(),
            &[],
            "boom",
        );
        assert_eq!(result.tasks.len(), 1);
        assert_eq!(result.tasks[0].id, "a");
    }
}
