//! Aggregate numbers over a task snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub completed: usize,
    /// Completed with logged hours not exceeding the estimate.
    pub completed_within_estimate: usize,
    /// Mean logged hours over completed tasks; 0 when none are completed.
    pub average_completion_hours: f64,
    pub by_priority: BTreeMap<Priority, usize>,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();

        let completed_within_estimate = completed
            .iter()
            .filter(|t| t.actual_hours <= t.estimated_hours)
            .count();

        let average_completion_hours = if completed.is_empty() {
            0.0
        } else {
            let total: u64 = completed.iter().map(|t| t.actual_hours as u64).sum();
            total as f64 / completed.len() as f64
        };

        let mut by_priority = BTreeMap::new();
        for t in tasks {
            *by_priority.entry(t.priority).or_insert(0) += 1;
        }

        Self {
            completed: completed.len(),
            completed_within_estimate,
            average_completion_hours,
            by_priority,
        }
    }
}
