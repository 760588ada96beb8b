//! Section Planner
//!
//! Derives the ordered section list from layout configuration alone - no
//! completion-service involvement.

use crate::domain::{CATEGORY_NAMES, LayoutType};

/// Plan the schedule's sections.
///
/// Unstructured layouts have none; structured layouts derive them from the
/// subcategory, defaulting to day sections for unknown schemes.
pub fn plan_sections(layout: LayoutType, subcategory: &str) -> Vec<String> {
    if layout == LayoutType::Unstructured {
        return Vec::new();
    }

    let names: &[&str] = match subcategory {
        "priority" => &["High Priority", "Medium Priority", "Low Priority"],
        "category" => &CATEGORY_NAMES,
        _ => &["Morning", "Afternoon", "Evening"],
    };
    names.iter().map(|s| s.to_string()).collect()
}
