//! Task Registry Builder - the conversion boundary
//!
//! Accepts the caller's loosely-typed task records and normalizes them into
//! the closed Task type. Variant shapes never leak past this module: every
//! downstream stage sees only `TaskRegistry`.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Category, Task, TaskKind, TaskRegistry, generate_task_id};

/// A normalized task plus its categorization verdict
pub(crate) struct ConvertedTask {
    pub task: Task,
    pub needs_categorization: bool,
}

/// Build the per-invocation registry from raw task records.
///
/// Returns the registry plus the ids of tasks needing categorization: those
/// whose category set is empty or contains values outside the fixed
/// vocabulary. Section header records are presentation artifacts of the
/// previous render and are not ingested - the assembly stage rebuilds
/// headers fresh. Pure function of its input.
pub fn build_registry(raw_tasks: &[Value]) -> (TaskRegistry, Vec<String>) {
    let mut registry = TaskRegistry::new();
    let mut flags: HashMap<String, bool> = HashMap::new();

    for value in raw_tasks {
        let Some(converted) = convert_task(value) else {
            warn!("skipping non-object task record");
            continue;
        };

        if converted.task.is_header() {
            debug!(id = %converted.task.id, "skipping section header record");
            continue;
        }

        flags.insert(converted.task.id.clone(), converted.needs_categorization);
        registry.insert(converted.task);
    }

    let needs: Vec<String> = registry
        .ids()
        .filter(|id| flags.get(*id).copied().unwrap_or(false))
        .map(String::from)
        .collect();

    (registry, needs)
}

/// Normalize one raw record into a Task. Returns None for records that are
/// not JSON objects.
pub(crate) fn convert_task(value: &Value) -> Option<ConvertedTask> {
    let obj = value.as_object()?;

    let text = str_field(obj, "text").unwrap_or_default();
    let id = match str_field(obj, "id") {
        Some(id) if !id.is_empty() => id,
        _ => generate_task_id(&text),
    };

    let mut categories = Vec::new();
    let mut saw_unknown = false;
    match obj.get("categories") {
        Some(Value::Array(raw)) => {
            for entry in raw {
                match entry.as_str().map(Category::from_str) {
                    Some(Ok(category)) => {
                        if !categories.contains(&category) {
                            categories.push(category);
                        }
                    }
                    _ => saw_unknown = true,
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => saw_unknown = true,
    }

    let is_section = obj.get("is_section").and_then(Value::as_bool).unwrap_or(false);
    let kind = match str_field(obj, "type").as_deref() {
        Some("section") => TaskKind::Section,
        _ => TaskKind::Task,
    };

    let task = Task {
        id,
        text,
        categories,
        completed: obj.get("completed").and_then(Value::as_bool).unwrap_or(false),
        is_section,
        section: str_field(obj, "section"),
        parent_id: str_field(obj, "parent_id"),
        level: obj.get("level").and_then(Value::as_u64).unwrap_or(0) as u32,
        kind,
        is_recurring: recurrence_field(obj.get("is_recurring")),
        start_time: str_field(obj, "start_time"),
        end_time: str_field(obj, "end_time"),
        source: str_field(obj, "source"),
        external_link: str_field(obj, "external_link"),
    };

    let needs_categorization =
        !task.is_header() && (task.categories.is_empty() || saw_unknown);

    Some(ConvertedTask {
        task,
        needs_categorization,
    })
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

/// A recurrence descriptor may arrive as a plain string or as an object
/// carrying a frequency field.
fn recurrence_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => match obj.get("frequency").and_then(Value::as_str) {
            Some(freq) => Some(freq.to_string()),
            None => Some(Value::Object(obj.clone()).to_string()),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_registry_assigns_missing_ids() {
        let raw = vec![json!({"text": "no id here"})];
        let (registry, _) = build_registry(&raw);
        assert_eq!(registry.len(), 1);
        let task = registry.iter().next().unwrap();
        assert!(!task.id.is_empty());
        assert_eq!(task.text, "no id here");
    }

    #[test]
    fn test_build_registry_flags_empty_categories() {
        let raw = vec![
            json!({"id": "a", "text": "uncategorized"}),
            json!({"id": "b", "text": "categorized", "categories": ["Work"]}),
        ];
        let (registry, needs) = build_registry(&raw);
        assert_eq!(registry.len(), 2);
        assert_eq!(needs, vec!["a".to_string()]);
    }

    #[test]
    fn test_build_registry_flags_unknown_categories() {
        let raw = vec![json!({"id": "a", "text": "t", "categories": ["Work", "Chores"]})];
        let (registry, needs) = build_registry(&raw);
        assert_eq!(needs, vec!["a".to_string()]);
        // The known category survives conversion
        assert_eq!(registry.get("a").unwrap().categories, vec![Category::Work]);
    }

    #[test]
    fn test_build_registry_skips_section_records() {
        let raw = vec![
            json!({"id": "s1", "text": "Morning", "is_section": true}),
            json!({"id": "s2", "text": "Evening", "type": "section"}),
            json!({"id": "t1", "text": "real task", "categories": ["Fun"]}),
        ];
        let (registry, needs) = build_registry(&raw);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("t1"));
        assert!(needs.is_empty());
    }

    #[test]
    fn test_build_registry_dedupes_by_id() {
        let raw = vec![
            json!({"id": "a", "text": "first", "categories": ["Work"]}),
            json!({"id": "a", "text": "second", "categories": ["Fun"]}),
        ];
        let (registry, _) = build_registry(&raw);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().text, "second");
    }

    #[test]
    fn test_build_registry_skips_non_objects() {
        let raw = vec![json!("just a string"), json!({"id": "a", "text": "ok"})];
        let (registry, _) = build_registry(&raw);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_convert_task_full_record() {
        let value = json!({
            "id": "t1",
            "text": "9:00am - 10:00am: standup",
            "categories": ["Work", "Work"],
            "completed": true,
            "level": 2,
            "parent_id": "t0",
            "is_recurring": {"frequency": "weekly"},
            "start_time": "9:00am",
            "end_time": "10:00am",
            "source": "slack",
            "external_link": "https://example.com/msg/1"
        });
        let converted = convert_task(&value).unwrap();
        let task = converted.task;
        assert_eq!(task.categories, vec![Category::Work]); // deduped
        assert!(task.completed);
        assert_eq!(task.level, 2);
        assert_eq!(task.parent_id.as_deref(), Some("t0"));
        assert_eq!(task.is_recurring.as_deref(), Some("weekly"));
        assert_eq!(task.source.as_deref(), Some("slack"));
        assert!(!converted.needs_categorization);
    }

    #[test]
    fn test_convert_task_recurrence_string() {
        let value = json!({"id": "t1", "text": "daily", "is_recurring": "daily"});
        let converted = convert_task(&value).unwrap();
        assert_eq!(converted.task.is_recurring.as_deref(), Some("daily"));
    }
}
