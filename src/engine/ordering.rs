//! Ordering Stage
//!
//! One completion call turns the built prompt into per-task placements.
//! Parsing tolerates surrounding prose and drops malformed entries
//! individually; an unusable response signals failure without raising so
//! the caller can fall back to local assembly.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::Placement;
use crate::llm::{CompletionClient, CompletionRequest};

use super::extract_json_object;

/// Request placements for the prompt.
///
/// Returns None when the call errors or the response yields no valid
/// placements - the signal for the round-robin fallback.
pub async fn request_placements(
    client: &dyn CompletionClient,
    prompt: &str,
    tuning: &EngineConfig,
) -> Option<Vec<Placement>> {
    let request = CompletionRequest::new(prompt, tuning.ordering_max_tokens)
        .with_temperature(tuning.temperature);

    let response = match client.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "ordering call failed");
            return None;
        }
    };

    let placements = parse_placements(&response);
    if placements.is_empty() {
        warn!("ordering response contained no usable placements");
        return None;
    }

    debug!(count = placements.len(), "placements parsed");
    Some(placements)
}

/// Parse placements out of free-form response text.
///
/// Locates the outermost JSON object, then accepts each entry of its
/// `placements` array that carries all of task_id, section and order.
/// One malformed entry does not invalidate the rest.
pub fn parse_placements(text: &str) -> Vec<Placement> {
    let Some(body) = extract_json_object(text) else {
        debug!("no JSON object found in ordering response");
        return Vec::new();
    };

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "ordering response JSON did not parse");
            return Vec::new();
        }
    };

    let Some(entries) = parsed.get("placements").and_then(Value::as_array) else {
        debug!("ordering response missing placements array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match placement_from_entry(entry) {
            Some(placement) => Some(placement),
            None => {
                debug!("dropping invalid placement entry");
                None
            }
        })
        .collect()
}

/// A placement is accepted only with all three required fields present
fn placement_from_entry(entry: &Value) -> Option<Placement> {
    let task_id = entry.get("task_id")?.as_str()?.to_string();
    let section = entry.get("section")?.as_str()?.to_string();
    let order = entry
        .get("order")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))?;
    let time_allocation = entry
        .get("time_allocation")
        .and_then(Value::as_str)
        .map(String::from);

    Some(Placement {
        task_id,
        section,
        order,
        time_allocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockCompletionClient;

    #[test]
    fn test_parse_placements_clean_json() {
        let text = r#"{"placements": [
            {"task_id": "a", "section": "Morning", "order": 0, "time_allocation": "9:00am - 10:00am"},
            {"task_id": "b", "section": "Evening", "order": 1}
        ]}"#;
        let placements = parse_placements(text);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].task_id, "a");
        assert_eq!(
            placements[0].time_allocation.as_deref(),
            Some("9:00am - 10:00am")
        );
        assert!(placements[1].time_allocation.is_none());
    }

    #[test]
    fn test_parse_placements_with_surrounding_prose() {
        let text = "Sure! Here's your schedule:\n\n{\"placements\": [{\"task_id\": \"a\", \"section\": \"Morning\", \"order\": 0}]}\n\nLet me know if you'd like changes.";
        let placements = parse_placements(text);
        assert_eq!(placements.len(), 1);
    }

    #[test]
    fn test_parse_placements_drops_invalid_entries_individually() {
        let text = r#"{"placements": [
            {"task_id": "a", "section": "Morning", "order": 0},
            {"task_id": "missing-order", "section": "Morning"},
            {"section": "no-task-id", "order": 2},
            {"task_id": "b", "section": "Afternoon", "order": 1.0}
        ]}"#;
        let placements = parse_placements(text);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].task_id, "a");
        assert_eq!(placements[1].task_id, "b");
        assert_eq!(placements[1].order, 1);
    }

    #[test]
    fn test_parse_placements_no_json() {
        assert!(parse_placements("I am unable to help with that.").is_empty());
        assert!(parse_placements("").is_empty());
    }

    #[test]
    fn test_parse_placements_malformed_json() {
        assert!(parse_placements("{\"placements\": [").is_empty());
        assert!(parse_placements("{\"something_else\": true}").is_empty());
    }

    #[tokio::test]
    async fn test_request_placements_none_on_error() {
        let client = MockCompletionClient::new(vec![Err("timeout".to_string())]);
        let result = request_placements(&client, "prompt", &EngineConfig::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_request_placements_none_on_empty_parse() {
        let client = MockCompletionClient::new(vec![Ok("no json here".to_string())]);
        let result = request_placements(&client, "prompt", &EngineConfig::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_request_placements_success() {
        let client = MockCompletionClient::new(vec![Ok(
            r#"{"placements": [{"task_id": "a", "section": "Morning", "order": 0}]}"#.to_string(),
        )]);
        let result = request_placements(&client, "prompt", &EngineConfig::default()).await;
        assert_eq!(result.unwrap().len(), 1);
    }
}
