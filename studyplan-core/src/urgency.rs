//! Urgency scoring per task variant.
//!
//! Scores only order tasks within one scheduling run; there is no global
//! normalization.

use chrono::NaiveDateTime;

use crate::task::{Task, TaskKind, TaskStatus};
use crate::time::hours_until;

const ASSIGNMENT_TIME_WEIGHT: f64 = 100.0;
const EXAM_TIME_WEIGHT: f64 = 150.0;
const PROJECT_TIME_WEIGHT: f64 = 80.0;

const EXAM_BASE: f64 = 50.0;

/// Time denominator `hours_until_due + 1`, floored at 1.
///
/// Anything due within the hour or already overdue saturates at the full time
/// weight instead of dividing by zero or flipping sign.
fn time_denominator(task: &Task, now: NaiveDateTime) -> f64 {
    (hours_until(now, task.due) + 1).max(1) as f64
}

impl Task {
    /// Higher is more urgent. Pure in `(self, now)`.
    pub fn urgency_score(&self, now: NaiveDateTime) -> f64 {
        let denom = time_denominator(self, now);
        match &self.kind {
            TaskKind::Assignment { .. } => {
                let time_score = ASSIGNMENT_TIME_WEIGHT / denom;
                let priority_score = self.priority.ordinal() as f64 * 25.0;
                let effort_score = self.estimated_hours as f64 * 5.0;
                time_score + priority_score + effort_score
            }
            TaskKind::Exam { study_hours_completed, .. } => {
                let time_score = EXAM_TIME_WEIGHT / denom;
                let studied = study_ratio(*study_hours_completed, self.estimated_hours);
                let preparedness_score = (1.0 - studied) * 50.0;
                time_score + preparedness_score + EXAM_BASE
            }
            TaskKind::Project { .. } => {
                let time_score = PROJECT_TIME_WEIGHT / denom;
                let completion_score = (1.0 - self.completion_percentage() / 100.0) * 40.0;
                let priority_score = self.priority.ordinal() as f64 * 20.0;
                time_score + completion_score + priority_score
            }
        }
    }

    /// Project progress in percent.
    ///
    /// With subtasks: share of completed subtasks. Without: logged hours
    /// against the estimate, capped at 100. Non-projects report logged hours
    /// against the estimate the same way.
    pub fn completion_percentage(&self) -> f64 {
        if let TaskKind::Project { subtasks, .. } = &self.kind {
            if !subtasks.is_empty() {
                let done = subtasks
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .count();
                return done as f64 / subtasks.len() as f64 * 100.0;
            }
        }
        if self.actual_hours >= self.estimated_hours {
            return 100.0;
        }
        self.actual_hours as f64 / self.estimated_hours as f64 * 100.0
    }

    /// Exam study progress in percent, capped at 100. `None` for other kinds.
    pub fn preparedness_percentage(&self) -> Option<f64> {
        match &self.kind {
            TaskKind::Exam { study_hours_completed, .. } => {
                let ratio = study_ratio(*study_hours_completed, self.estimated_hours);
                Some((ratio * 100.0).min(100.0))
            }
            _ => None,
        }
    }
}

/// Studied / estimated; an exam with nothing to study counts as fully prepared.
fn study_ratio(studied: u32, estimated: u32) -> f64 {
    if estimated == 0 {
        return 1.0;
    }
    studied as f64 / estimated as f64
}

/// Free-function form of [`Task::urgency_score`].
pub fn urgency_score(task: &Task, now: NaiveDateTime) -> f64 {
    task.urgency_score(now)
}
