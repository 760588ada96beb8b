//! Layout preference and ordering pattern types
//!
//! Callers may supply timing and ordering pattern as two fields or as a
//! single legacy `orderingPattern`. Both shapes normalize into one
//! [`PatternKey`] so template matching has a single, exhaustive key type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout preference as supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutPreference {
    /// Layout name, e.g. "todolist-structured" or "todolist-unstructured"
    #[serde(default)]
    pub layout: Option<String>,

    /// Section scheme: "day-sections", "priority" or "category"
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Timing pattern name, e.g. "timebox" or "untimed"
    #[serde(default)]
    pub timing: Option<String>,

    /// Ordering pattern name (also the legacy single-field path)
    #[serde(default, rename = "orderingPattern")]
    pub ordering_pattern: Option<String>,
}

impl LayoutPreference {
    /// The section scheme, defaulting to day-sections
    pub fn subcategory(&self) -> &str {
        self.subcategory.as_deref().unwrap_or("day-sections")
    }
}

/// Structured layouts render section headers; unstructured layouts are one
/// flat ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Structured,
    Unstructured,
}

impl LayoutType {
    /// Derive the layout type from the caller's layout name
    pub fn from_preference(pref: &LayoutPreference) -> Self {
        match &pref.layout {
            Some(name) if name.contains("unstructured") => LayoutType::Unstructured,
            _ => LayoutType::Structured,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutType::Structured => write!(f, "structured"),
            LayoutType::Unstructured => write!(f, "unstructured"),
        }
    }
}

/// The baseline pattern: placements carry no time allocations
pub const UNTIMED: &str = "untimed";

/// An ordering/timing pattern key. Template matching requires the template's
/// own pattern field to have the same shape and the same contents in the
/// same order: `["a","b"]` does not match `["b","a"]` or `"a"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternKey {
    Single(String),
    Compound(Vec<String>),
}

impl PatternKey {
    /// Normalize the caller's timing/ordering fields into one key.
    ///
    /// Timing alone if no ordering pattern, the ordering pattern alone if no
    /// timing, or `[orderingPattern, timing]` when both are present. Neither
    /// present falls back to the untimed baseline. The legacy
    /// "three-three-three" alias is folded to "3-3-3" on every path.
    pub fn from_preference(pref: &LayoutPreference) -> Self {
        let timing = pref.timing.as_deref().map(normalize_alias);
        let pattern = pref.ordering_pattern.as_deref().map(normalize_alias);

        match (pattern, timing) {
            (Some(p), Some(t)) => PatternKey::Compound(vec![p, t]),
            (Some(p), None) => PatternKey::Single(p),
            (None, Some(t)) => PatternKey::Single(t),
            (None, None) => PatternKey::Single(UNTIMED.to_string()),
        }
    }

    /// All pattern names referenced by this key, in order
    pub fn names(&self) -> Vec<&str> {
        match self {
            PatternKey::Single(name) => vec![name.as_str()],
            PatternKey::Compound(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Whether placements should carry time allocations
    pub fn is_timed(&self) -> bool {
        self.names().iter().any(|n| *n != UNTIMED)
    }

    /// Human-readable label, e.g. "alternating+timebox"
    pub fn label(&self) -> String {
        self.names().join("+")
    }
}

impl Default for PatternKey {
    fn default() -> Self {
        PatternKey::Single(UNTIMED.to_string())
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fold legacy pattern aliases to their canonical names
fn normalize_alias(name: &str) -> String {
    match name {
        "three-three-three" => "3-3-3".to_string(),
        other => other.to_string(),
    }
}
