//! Assembly Stage
//!
//! Merges placements with the registry into the final ordered task list:
//! section headers interleaved with placed tasks for structured layouts,
//! one globally sorted list for unstructured ones. Every registry task
//! appears exactly once - unplaced tasks are appended after all placed
//! work.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{LayoutType, Placement, Task, TaskRegistry};

/// Merge placements and registry into the output task list
pub fn assemble(
    placements: &[Placement],
    registry: &TaskRegistry,
    sections: &[String],
    layout: LayoutType,
) -> Vec<Task> {
    // Duplicate placements for a task are tolerated: last write wins
    let mut by_task: HashMap<&str, &Placement> = HashMap::new();
    for placement in placements {
        if registry.contains(&placement.task_id) {
            by_task.insert(placement.task_id.as_str(), placement);
        } else {
            debug!(task_id = %placement.task_id, "placement references unknown task");
        }
    }

    if layout == LayoutType::Unstructured || sections.is_empty() {
        assemble_flat(&by_task, registry)
    } else {
        assemble_sectioned(&by_task, registry, sections)
    }
}

fn assemble_sectioned(
    by_task: &HashMap<&str, &Placement>,
    registry: &TaskRegistry,
    sections: &[String],
) -> Vec<Task> {
    let mut out = Vec::with_capacity(registry.len() + sections.len());
    let mut placed: HashSet<&str> = HashSet::new();

    for section in sections {
        out.push(Task::section_header(section));

        let mut members: Vec<&Placement> = by_task
            .values()
            .filter(|p| &p.section == section)
            .copied()
            .collect();
        members.sort_by_key(|p| p.order);

        for placement in members {
            if let Some(task) = registry.get(&placement.task_id) {
                placed.insert(task.id.as_str());
                out.push(placed_task(task, placement, Some(section)));
            }
        }
    }

    // Unplaced tasks (including placements aimed at unknown sections) land
    // in the last section, after all placed tasks, in registry order.
    let last_section = sections.last();
    for task in registry.iter() {
        if !placed.contains(task.id.as_str()) {
            let mut task = task.clone();
            task.section = last_section.cloned();
            out.push(task);
        }
    }

    out
}

fn assemble_flat(by_task: &HashMap<&str, &Placement>, registry: &TaskRegistry) -> Vec<Task> {
    let mut entries: Vec<&Placement> = by_task.values().copied().collect();
    entries.sort_by_key(|p| p.order);

    let mut out = Vec::with_capacity(registry.len());
    let mut placed: HashSet<&str> = HashSet::new();

    for placement in entries {
        if let Some(task) = registry.get(&placement.task_id) {
            placed.insert(task.id.as_str());
            out.push(placed_task(task, placement, None));
        }
    }

    for task in registry.iter() {
        if !placed.contains(task.id.as_str()) {
            out.push(task.clone());
        }
    }

    out
}

/// Clone the registry task with its placement applied
fn placed_task(task: &Task, placement: &Placement, section: Option<&String>) -> Task {
    let mut task = task.clone();
    task.section = section.cloned();
    if let Some(allocation) = &placement.time_allocation
        && let Some((start, end)) = parse_time_allocation(allocation)
    {
        task.start_time = Some(start);
        task.end_time = Some(end);
    }
    task
}

/// Parse a "9:00am - 10:30am" allocation into start and end times
pub fn parse_time_allocation(allocation: &str) -> Option<(String, String)> {
    static ALLOCATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = ALLOCATION_RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2}:\d{2}\s*(?:am|pm))\s*-\s*(\d{1,2}:\d{2}\s*(?:am|pm))")
            .expect("time allocation regex")
    });

    let caps = re.captures(allocation)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
