//! Prompt Builder - retrieval-augmented prompt assembly
//!
//! Combines pattern definitions, retrieved example templates, user context
//! and task summaries into one completion-ready prompt, under a hard size
//! budget. Retrieval-path failures degrade to a template-free prompt;
//! an irreducibly oversized prompt is the one fatal condition here.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{PatternKey, Task, TaskRegistry};
use crate::prompts::PromptLoader;
use crate::templates::{TemplateStore, patterns};

use super::ScheduleRequest;

/// Hard upper bound on the assembled prompt
pub const MAX_PROMPT_CHARS: usize = 12_000;

/// Example-count truncation ladder: full, reduced, none
const EXAMPLE_COUNTS: [usize; 3] = [3, 2, 0];

/// Lines kept per example
pub const MAX_EXAMPLE_LINES: usize = 5;

/// Fatal prompt-construction failure for this one request
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt is {0} characters with all examples removed (budget {budget})", budget = MAX_PROMPT_CHARS)]
    OverBudget(usize),
}

/// Build the ordering prompt.
///
/// The retrieval-augmented path is tried first, truncating the example
/// block until the prompt fits the budget. If the templated path itself
/// fails to render, a plain template-free prompt is produced instead so a
/// prompt always exists. Only an over-budget prompt that truncation cannot
/// rescue is an error.
pub fn build_schedule_prompt(
    store: &TemplateStore,
    loader: &PromptLoader,
    request: &ScheduleRequest,
    registry: &TaskRegistry,
    key: &PatternKey,
    subcategory: &str,
    sections: &[String],
) -> Result<String, PromptError> {
    let templates = store.retrieve(subcategory, key);
    let definitions: Vec<serde_json::Value> = patterns::definitions_for(key)
        .into_iter()
        .map(|(name, text)| json!({"name": name, "text": text}))
        .collect();

    let task_block = task_block(registry);
    let response_shape = response_shape(key.is_timed());
    let sections_line = sections_line(sections);

    let mut last_len = 0;
    for count in EXAMPLE_COUNTS {
        let examples_block = format_examples(&templates, count);
        let context = json!({
            "pattern_label": key.label(),
            "pattern_definitions": definitions,
            "examples_block": examples_block,
            "work_start_time": work_time(&request.work_start_time, "9:00am"),
            "work_end_time": work_time(&request.work_end_time, "5:00pm"),
            "energy_patterns": list_or_none(&request.energy_patterns),
            "priorities": priorities_summary(&request.priorities),
            "sections_line": sections_line,
            "task_block": task_block,
            "response_shape": response_shape,
        });

        let prompt = match loader.render("schedule", &context) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "schedule template failed to render, using plain prompt");
                return Ok(simple_prompt(request, registry, key, sections));
            }
        };

        if prompt.len() <= MAX_PROMPT_CHARS {
            if count < EXAMPLE_COUNTS[0] {
                debug!(examples = count, chars = prompt.len(), "prompt truncated to fit budget");
            }
            return Ok(prompt);
        }
        last_len = prompt.len();
    }

    Err(PromptError::OverBudget(last_len))
}

/// The template-free fallback prompt: same user context and task data,
/// the literal pattern name in place of definitions and examples.
fn simple_prompt(
    request: &ScheduleRequest,
    registry: &TaskRegistry,
    key: &PatternKey,
    sections: &[String],
) -> String {
    format!(
        "You are an expert daily-schedule planner. Arrange the user's tasks into the best \
         order for their day using the \"{label}\" ordering pattern.\n\n\
         User context:\n\
         - Work hours: {start} to {end}\n\
         - Energy patterns: {energy}\n\
         - Priorities: {priorities}\n\n\
         Sections:\n{sections_line}\n\n\
         Tasks:\n{task_block}\n\n\
         Place every task into exactly one section, with \"order\" starting at 0 within each \
         section. Respond with a single JSON object and nothing else.\n\n\
         Response format:\n{shape}\n",
        label = key.label(),
        start = work_time(&request.work_start_time, "9:00am"),
        end = work_time(&request.work_end_time, "5:00pm"),
        energy = list_or_none(&request.energy_patterns),
        priorities = priorities_summary(&request.priorities),
        sections_line = sections_line(sections),
        task_block = task_block(registry),
        shape = response_shape(key.is_timed()),
    )
}

/// One JSON summary line per task
fn task_block(registry: &TaskRegistry) -> String {
    registry
        .iter()
        .map(|task| {
            let categories: Vec<&str> = task.categories.iter().map(|c| c.name()).collect();
            let mut line = json!({
                "id": task.id,
                "text": task.text,
                "categories": categories,
            });
            if let Some(constraint) = detect_time_constraint(task) {
                line["time_constraint"] = json!(constraint);
            }
            line.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detect an inline time constraint at the start of the task text, falling
/// back to explicit start/end attributes.
pub fn detect_time_constraint(task: &Task) -> Option<String> {
    static INLINE_RE: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d{1,2}:\d{2}\s*(?:am|pm))\s*-\s*(\d{1,2}:\d{2}\s*(?:am|pm))\s*:")
            .expect("inline time constraint regex")
    });

    if let Some(caps) = re.captures(&task.text) {
        return Some(format!("{} - {}", &caps[1], &caps[2]));
    }

    match (&task.start_time, &task.end_time) {
        (Some(start), Some(end)) => Some(format!("{} - {}", start, end)),
        _ => None,
    }
}

fn format_examples(templates: &[crate::templates::Template], count: usize) -> String {
    templates
        .iter()
        .take(count)
        .map(|template| {
            let lines = template
                .example
                .iter()
                .take(MAX_EXAMPLE_LINES)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            format!("### {}\n{}", template.id, lines)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn sections_line(sections: &[String]) -> String {
    if sections.is_empty() {
        "No sections: produce one flat ordered list, using \"All\" as every placement's section."
            .to_string()
    } else {
        sections.join(", ")
    }
}

fn work_time(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none specified".to_string()
    } else {
        values.join(", ")
    }
}

fn priorities_summary(priorities: &serde_json::Value) -> String {
    match priorities {
        serde_json::Value::Null => "none specified".to_string(),
        other => other.to_string(),
    }
}

/// The JSON response example shown to the model. Untimed patterns omit the
/// time_allocation field entirely.
fn response_shape(timed: bool) -> String {
    if timed {
        r#"{"placements": [ {"task_id": "<id>", "section": "<section name>", "order": 0, "time_allocation": "9:00am - 10:30am"} ] }"#
            .to_string()
    } else {
        r#"{"placements": [ {"task_id": "<id>", "section": "<section name>", "order": 0} ] }"#
            .to_string()
    }
}
