//! Placement and ScheduleResult types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::layout::{LayoutType, PatternKey};
use super::task::Task;

/// One placement decision from the ordering stage:
/// which section a task lands in and where within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub task_id: String,
    pub section: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_allocation: Option<String>,
}

/// The engine's output. Failed runs still carry a fully-formed,
/// renderable task list - never null, never empty-handed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Whether the primary pipeline path produced this schedule
    pub success: bool,

    /// Ordered task list, section headers interleaved with placed tasks
    pub tasks: Vec<Task>,

    /// Resolved layout type
    pub layout_type: LayoutType,

    /// The normalized pattern key this schedule was built for
    pub ordering_pattern: PatternKey,

    /// Human-readable failure description, present only on error responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// True when local fallback assembly produced the task order
    #[serde(default)]
    pub fallback_used: bool,

    /// UI hint: surface a non-blocking notice instead of a broken schedule
    #[serde(default)]
    pub show_notice: bool,

    /// When this result was generated
    pub generated_at: DateTime<Utc>,
}

impl ScheduleResult {
    /// A successful result from the primary or round-robin path
    pub fn ok(
        tasks: Vec<Task>,
        layout_type: LayoutType,
        ordering_pattern: PatternKey,
        fallback_used: bool,
    ) -> Self {
        Self {
            success: true,
            tasks,
            layout_type,
            ordering_pattern,
            error: None,
            fallback_used,
            show_notice: false,
            generated_at: Utc::now(),
        }
    }

    /// The terminal error response: the caller's schedule survives, with a
    /// notice flag so the UI can explain what happened.
    pub fn failed(
        tasks: Vec<Task>,
        layout_type: LayoutType,
        ordering_pattern: PatternKey,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            tasks,
            layout_type,
            ordering_pattern,
            error: Some(error.into()),
            fallback_used: true,
            show_notice: true,
            generated_at: Utc::now(),
        }
    }
}
