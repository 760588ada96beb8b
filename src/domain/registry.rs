//! TaskRegistry - the per-invocation task collection
//!
//! Maps id to Task while preserving first-insertion order so that every
//! downstream stage (prompting, assembly, fallback) iterates tasks
//! deterministically. Owned exclusively by one pipeline invocation.

use std::collections::HashMap;

use super::task::Task;

/// Insertion-order-preserving map from task id to Task
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    order: Vec<String>,
    tasks: HashMap<String, Task>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, replacing any existing task with the same id.
    /// A replaced task keeps its original position in iteration order.
    pub fn insert(&mut self, task: Task) {
        if !self.tasks.contains_key(&task.id) {
            self.order.push(task.id.clone());
        }
        self.tasks.insert(task.id.clone(), task);
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Mutable lookup, used by the categorization stage
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// Whether a task with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Task ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Tasks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_preserves_insertion_order() {
        let mut registry = TaskRegistry::new();
        registry.insert(Task::with_id("c", "third"));
        registry.insert(Task::with_id("a", "first"));
        registry.insert(Task::with_id("b", "second"));

        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_registry_dedup_keeps_position() {
        let mut registry = TaskRegistry::new();
        registry.insert(Task::with_id("a", "original"));
        registry.insert(Task::with_id("b", "other"));
        registry.insert(Task::with_id("a", "replacement"));

        assert_eq!(registry.len(), 2);
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().text, "replacement");
    }

    #[test]
    fn test_registry_get_mut() {
        let mut registry = TaskRegistry::new();
        registry.insert(Task::with_id("a", "task"));
        registry.get_mut("a").unwrap().completed = true;
        assert!(registry.get("a").unwrap().completed);
        assert!(registry.get_mut("missing").is_none());
    }
}
