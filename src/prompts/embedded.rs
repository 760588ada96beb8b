//! Embedded prompt templates
//!
//! Compiled-in defaults, used when no override file exists. Rendered with
//! Handlebars by the prompt loader.

/// Main scheduling prompt with retrieved examples
pub const SCHEDULE: &str = r#"You are an expert daily-schedule planner. Arrange the user's tasks into the best order for their day, following the requested ordering pattern.

## Ordering pattern: {{pattern_label}}
{{#each pattern_definitions}}
- {{name}}: {{text}}
{{/each}}
{{#if examples_block}}

## Example schedules using this pattern
{{{examples_block}}}
{{/if}}

## User context
- Work hours: {{work_start_time}} to {{work_end_time}}
- Energy patterns: {{energy_patterns}}
- Priorities: {{priorities}}

## Sections
{{sections_line}}

## Tasks
{{{task_block}}}

## Instructions
- Place every task listed above into exactly one of the sections.
- Within each section, "order" starts at 0 and increases by 1.
- Honor each task's time constraint when one is given.
- Apply the ordering pattern definitions when sequencing tasks.
- Do not invent, drop, rename or merge tasks.
- Respond with a single JSON object and nothing else.

## Response format
{{{response_shape}}}
"#;

/// Batched categorization prompt
pub const CATEGORIZE: &str = r#"You are categorizing tasks for a daily planner. Assign each task one or more of exactly these categories: Work, Exercise, Relationships, Fun, Ambition.

## Tasks
{{{task_block}}}

Respond with a single JSON object and nothing else, shaped like:
{"categorizations": [ {"task_id": "<id>", "categories": ["Work"] } ] }
"#;

/// Get an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "schedule" => Some(SCHEDULE),
        "categorize" => Some(CATEGORIZE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_known() {
        assert!(get_embedded("schedule").is_some());
        assert!(get_embedded("categorize").is_some());
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("nonexistent").is_none());
    }

    #[test]
    fn test_schedule_template_placeholders() {
        let template = get_embedded("schedule").unwrap();
        for placeholder in [
            "{{pattern_label}}",
            "{{{task_block}}}",
            "{{{response_shape}}}",
            "{{work_start_time}}",
        ] {
            assert!(
                template.contains(placeholder),
                "schedule template missing {}",
                placeholder
            );
        }
    }

    #[test]
    fn test_categorize_template_names_vocabulary() {
        let template = get_embedded("categorize").unwrap();
        for category in ["Work", "Exercise", "Relationships", "Fun", "Ambition"] {
            assert!(template.contains(category));
        }
    }
}
