//! Task ID generation
//!
//! IDs use the format: `{6-char-hex}-task-{slug}`
//! Example: `019430-task-review-quarterly-report`

/// Generate a task ID from its text
pub fn generate_task_id(text: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    let slug = slugify(text);
    if slug.is_empty() {
        format!("{}-task", hex_prefix)
    } else {
        format!("{}-task-{}", hex_prefix, slug)
    }
}

/// Slugify task text for use in IDs
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(40)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Review Quarterly Report"), "review-quarterly-report");
        assert_eq!(slugify("Don't forget the gym!"), "dont-forget-the-gym");
    }

    #[test]
    fn test_generate_task_id_format() {
        let id = generate_task_id("Walk the dog");
        assert!(id.contains("-task-walk-the-dog"), "unexpected id: {}", id);
        assert_eq!(id.split('-').next().unwrap().len(), 6);
    }

    #[test]
    fn test_generate_task_id_empty_text() {
        let id = generate_task_id("");
        assert!(id.ends_with("-task"), "unexpected id: {}", id);
    }

    #[test]
    fn test_generated_ids_unique() {
        let a = generate_task_id("same text");
        let b = generate_task_id("same text");
        assert_ne!(a, b);
    }
}
