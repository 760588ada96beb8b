//! Task and category types
//!
//! Task is the closed internal representation every pipeline stage works
//! with. Loosely-typed caller input is normalized into this shape by the
//! registry builder and never leaks past it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed category vocabulary, in canonical order
pub const CATEGORY_NAMES: [&str; 5] = ["Work", "Exercise", "Relationships", "Fun", "Ambition"];

/// A task category. The vocabulary is closed: unknown inbound strings are
/// not representable and flag the owning task for categorization instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Exercise,
    Relationships,
    Fun,
    Ambition,
}

impl Category {
    /// All categories in canonical order
    pub fn all() -> [Category; 5] {
        [
            Category::Work,
            Category::Exercise,
            Category::Relationships,
            Category::Fun,
            Category::Ambition,
        ]
    }

    /// Display name matching the wire vocabulary
    pub fn name(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Exercise => "Exercise",
            Category::Relationships => "Relationships",
            Category::Fun => "Fun",
            Category::Ambition => "Ambition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for category strings outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "exercise" => Ok(Category::Exercise),
            "relationships" => Ok(Category::Relationships),
            "fun" => Ok(Category::Fun),
            "ambition" => Ok(Category::Ambition),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Whether a record is a real task or a section header pseudo-task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
    Section,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Task => write!(f, "task"),
            TaskKind::Section => write!(f, "section"),
        }
    }
}

/// One schedulable item
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Task {
    /// Unique identifier (never empty past the registry builder)
    pub id: String,

    /// Task text as the user wrote it
    pub text: String,

    /// Assigned categories (subset of the fixed vocabulary)
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Completion state
    #[serde(default)]
    pub completed: bool,

    /// Section header marker
    #[serde(default)]
    pub is_section: bool,

    /// Section label this task was placed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Parent task for subtasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Indentation depth
    #[serde(default)]
    pub level: u32,

    /// Record kind on the wire
    #[serde(rename = "type", default)]
    pub kind: TaskKind,

    /// Recurrence descriptor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<String>,

    /// Explicit start time, e.g. "9:00am"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Explicit end time, e.g. "10:30am"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Originating system, if imported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Link back to the originating record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}

impl Task {
    /// Create a task with a generated ID
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: super::id::generate_task_id(&text),
            text,
            ..Default::default()
        }
    }

    /// Create a task with a specific ID (for ingestion and tests)
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a section header pseudo-task
    pub fn section_header(label: impl Into<String>) -> Self {
        let label = label.into();
        let slug = label.to_lowercase().replace(' ', "-");
        Self {
            id: format!("section-{}", slug),
            text: label.clone(),
            is_section: true,
            section: Some(label),
            kind: TaskKind::Section,
            ..Default::default()
        }
    }

    /// Whether this record is a section header
    pub fn is_header(&self) -> bool {
        self.is_section || self.kind == TaskKind::Section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("Work".parse::<Category>(), Ok(Category::Work));
        assert_eq!("fun".parse::<Category>(), Ok(Category::Fun));
        assert_eq!(" Exercise ".parse::<Category>(), Ok(Category::Exercise));
        assert!("Chores".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_names_match_vocabulary() {
        let names: Vec<&str> = Category::all().iter().map(|c| c.name()).collect();
        assert_eq!(names, CATEGORY_NAMES);
    }

    #[test]
    fn test_category_serde_wire_shape() {
        let json = serde_json::to_string(&Category::Relationships).unwrap();
        assert_eq!(json, "\"Relationships\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Relationships);
    }

    #[test]
    fn test_task_new_assigns_id() {
        let task = Task::new("Write report");
        assert!(!task.id.is_empty());
        assert_eq!(task.kind, TaskKind::Task);
        assert!(!task.is_header());
    }

    #[test]
    fn test_section_header() {
        let header = Task::section_header("Morning");
        assert_eq!(header.id, "section-morning");
        assert_eq!(header.text, "Morning");
        assert!(header.is_header());
        assert_eq!(header.kind, TaskKind::Section);
    }

    #[test]
    fn test_task_serde_type_field() {
        let header = Task::section_header("Evening");
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["type"], "section");

        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "text": "Walk",
            "type": "task"
        }))
        .unwrap();
        assert_eq!(task.kind, TaskKind::Task);
    }
}
