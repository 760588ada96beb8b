//! Categorization Stage
//!
//! One batched completion call assigns categories to every flagged task.
//! Failure is recoverable: flagged tasks default to Work and the pipeline
//! continues.

use std::str::FromStr;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{Category, TaskRegistry};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::prompts::PromptLoader;

use super::extract_json_object;

#[derive(Debug, Deserialize)]
struct CategorizationResponse {
    #[serde(default)]
    categorizations: Vec<CategorizationEntry>,
}

#[derive(Debug, Deserialize)]
struct CategorizationEntry {
    task_id: String,
    #[serde(default)]
    categories: Vec<String>,
}

/// Categorize the flagged tasks with a single batched completion call.
///
/// Returns true when the service's assignments were applied, false when the
/// stage degraded to the Work default. Never raises.
pub async fn categorize_tasks(
    client: &dyn CompletionClient,
    loader: &PromptLoader,
    registry: &mut TaskRegistry,
    needs: &[String],
    tuning: &EngineConfig,
) -> bool {
    if needs.is_empty() {
        debug!("all tasks pre-categorized, skipping categorization call");
        return true;
    }

    let task_block = needs
        .iter()
        .filter_map(|id| registry.get(id))
        .map(|task| json!({"task_id": task.id, "text": task.text}).to_string())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = match loader.render("categorize", &json!({ "task_block": task_block })) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!(error = %e, "categorization prompt failed to render, defaulting categories");
            default_categories(registry, needs);
            return false;
        }
    };

    let request = CompletionRequest::new(prompt, tuning.categorization_max_tokens)
        .with_temperature(tuning.temperature);
    let response = match client.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "categorization call failed, defaulting categories");
            default_categories(registry, needs);
            return false;
        }
    };

    match parse_categorizations(&response) {
        Some(entries) if !entries.is_empty() => {
            apply_categorizations(registry, &entries);
            true
        }
        _ => {
            warn!("categorization response unusable, defaulting categories");
            default_categories(registry, needs);
            false
        }
    }
}

/// Parse the categorization response, tolerating surrounding prose
fn parse_categorizations(text: &str) -> Option<Vec<CategorizationEntry>> {
    let body = extract_json_object(text)?;
    let parsed: CategorizationResponse = serde_json::from_str(body).ok()?;
    Some(parsed.categorizations)
}

/// Apply assignments in place. Entries referencing unknown tasks or
/// carrying no recognizable category are skipped individually.
fn apply_categorizations(registry: &mut TaskRegistry, entries: &[CategorizationEntry]) {
    for entry in entries {
        let mut categories = Vec::new();
        for raw in &entry.categories {
            if let Ok(category) = Category::from_str(raw) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            } else {
                debug!(task_id = %entry.task_id, category = %raw, "dropping unknown category");
            }
        }

        if categories.is_empty() {
            debug!(task_id = %entry.task_id, "no valid categories in entry");
            continue;
        }

        match registry.get_mut(&entry.task_id) {
            Some(task) => task.categories = categories,
            None => debug!(task_id = %entry.task_id, "categorization for unknown task"),
        }
    }
}

/// Default every flagged task to Work
fn default_categories(registry: &mut TaskRegistry, needs: &[String]) {
    for id in needs {
        if let Some(task) = registry.get_mut(id) {
            task.categories = vec![Category::Work];
        }
    }
}

/// Defensive invariant enforcement: after the stage, every task carries a
/// non-empty category set.
pub fn enforce_category_floor(registry: &mut TaskRegistry) {
    let empty: Vec<String> = registry
        .iter()
        .filter(|t| !t.is_header() && t.categories.is_empty())
        .map(|t| t.id.clone())
        .collect();

    for id in empty {
        debug!(task_id = %id, "forcing empty category set to Work");
        if let Some(task) = registry.get_mut(&id) {
            task.categories = vec![Category::Work];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::llm::client::mock::MockCompletionClient;

    fn registry_with(ids: &[&str]) -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        for id in ids {
            registry.insert(Task::with_id(*id, format!("task {}", id)));
        }
        registry
    }

    #[tokio::test]
    async fn test_categorize_applies_assignments() {
        let client = MockCompletionClient::new(vec![Ok(
            r#"{"categorizations": [{"task_id": "a", "categories": ["Fun"]}]}"#.to_string(),
        )]);
        let loader = PromptLoader::embedded_only();
        let mut registry = registry_with(&["a"]);
        let needs = vec!["a".to_string()];

        let ok = categorize_tasks(
            &client,
            &loader,
            &mut registry,
            &needs,
            &EngineConfig::default(),
        )
        .await;

        assert!(ok);
        assert_eq!(client.call_count(), 1);
        assert_eq!(registry.get("a").unwrap().categories, vec![Category::Fun]);
    }

    #[tokio::test]
    async fn test_categorize_skips_when_nothing_flagged() {
        let client = MockCompletionClient::new(vec![]);
        let loader = PromptLoader::embedded_only();
        let mut registry = registry_with(&["a"]);

        let ok = categorize_tasks(&client, &loader, &mut registry, &[], &EngineConfig::default())
            .await;

        assert!(ok);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_categorize_defaults_on_service_error() {
        let client = MockCompletionClient::new(vec![Err("connection refused".to_string())]);
        let loader = PromptLoader::embedded_only();
        let mut registry = registry_with(&["a", "b"]);
        let needs = vec!["a".to_string(), "b".to_string()];

        let ok = categorize_tasks(
            &client,
            &loader,
            &mut registry,
            &needs,
            &EngineConfig::default(),
        )
        .await;

        assert!(!ok);
        assert_eq!(registry.get("a").unwrap().categories, vec![Category::Work]);
        assert_eq!(registry.get("b").unwrap().categories, vec![Category::Work]);
    }

    #[tokio::test]
    async fn test_categorize_defaults_on_malformed_json() {
        let client = MockCompletionClient::new(vec![Ok("I couldn't decide, sorry!".to_string())]);
        let loader = PromptLoader::embedded_only();
        let mut registry = registry_with(&["a"]);
        let needs = vec!["a".to_string()];

        let ok = categorize_tasks(
            &client,
            &loader,
            &mut registry,
            &needs,
            &EngineConfig::default(),
        )
        .await;

        assert!(!ok);
        assert_eq!(registry.get("a").unwrap().categories, vec![Category::Work]);
    }

    #[tokio::test]
    async fn test_categorize_tolerates_surrounding_prose() {
        let client = MockCompletionClient::new(vec![Ok(
            "Here you go:\n{\"categorizations\": [{\"task_id\": \"a\", \"categories\": [\"Exercise\"]}]}\nDone."
                .to_string(),
        )]);
        let loader = PromptLoader::embedded_only();
        let mut registry = registry_with(&["a"]);
        let needs = vec!["a".to_string()];

        let ok = categorize_tasks(
            &client,
            &loader,
            &mut registry,
            &needs,
            &EngineConfig::default(),
        )
        .await;

        assert!(ok);
        assert_eq!(
            registry.get("a").unwrap().categories,
            vec![Category::Exercise]
        );
    }

    #[test]
    fn test_apply_skips_unknown_categories_and_tasks() {
        let mut registry = registry_with(&["a"]);
        apply_categorizations(
            &mut registry,
            &[
                CategorizationEntry {
                    task_id: "a".to_string(),
                    categories: vec!["Chores".to_string(), "Ambition".to_string()],
                },
                CategorizationEntry {
                    task_id: "ghost".to_string(),
                    categories: vec!["Work".to_string()],
                },
            ],
        );
        assert_eq!(
            registry.get("a").unwrap().categories,
            vec![Category::Ambition]
        );
    }

    #[test]
    fn test_enforce_category_floor() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.get("a").unwrap().categories.is_empty());
        enforce_category_floor(&mut registry);
        assert_eq!(registry.get("a").unwrap().categories, vec![Category::Work]);
    }
}
