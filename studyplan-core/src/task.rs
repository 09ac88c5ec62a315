//! Task model: assignments, exams and projects.
//!
//! Timestamps are local wall-clock times. Storage is the caller's concern; the
//! engines only borrow task snapshots.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    Urgent = 3,
}

impl Priority {
    /// Weight used by the urgency formulas (Low = 0 .. Urgent = 3).
    pub fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Variant-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    Assignment {
        #[serde(default)]
        subject: String,
    },
    Exam {
        #[serde(default)]
        topics: Vec<String>,
        #[serde(default)]
        study_hours_completed: u32,
    },
    Project {
        #[serde(default)]
        subtasks: Vec<Task>,
        start: NaiveDateTime,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,

    pub due: NaiveDateTime,
    pub created: NaiveDateTime,

    pub status: TaskStatus,
    pub priority: Priority,

    /// Whole hours.
    pub estimated_hours: u32,
    #[serde(default)]
    pub actual_hours: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Ids of tasks that must be completed before this one can start.
    #[serde(default)]
    pub dependencies: Vec<String>,

    pub kind: TaskKind,
}

impl Task {
    fn base(
        id: impl Into<String>,
        title: impl Into<String>,
        due: NaiveDateTime,
        created: NaiveDateTime,
        priority: Priority,
        kind: TaskKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            due,
            created,
            status: TaskStatus::Todo,
            priority,
            estimated_hours: 1,
            actual_hours: 0,
            tags: Vec::new(),
            dependencies: Vec::new(),
            kind,
        }
    }

    pub fn assignment(
        id: impl Into<String>,
        title: impl Into<String>,
        due: NaiveDateTime,
        created: NaiveDateTime,
    ) -> Self {
        let kind = TaskKind::Assignment { subject: String::new() };
        Self::base(id, title, due, created, Priority::Medium, kind)
    }

    /// Exams always start out as high priority.
    pub fn exam(
        id: impl Into<String>,
        title: impl Into<String>,
        due: NaiveDateTime,
        created: NaiveDateTime,
    ) -> Self {
        let kind = TaskKind::Exam {
            topics: Vec::new(),
            study_hours_completed: 0,
        };
        Self::base(id, title, due, created, Priority::High, kind)
    }

    pub fn project(
        id: impl Into<String>,
        title: impl Into<String>,
        due: NaiveDateTime,
        created: NaiveDateTime,
    ) -> Self {
        let kind = TaskKind::Project {
            subtasks: Vec::new(),
            start: created,
        };
        Self::base(id, title, due, created, Priority::Medium, kind)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_estimate(mut self, hours: u32) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_actual_hours(mut self, hours: u32) -> Self {
        self.actual_hours = hours;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// No-op unless this is an assignment.
    pub fn with_subject(mut self, value: impl Into<String>) -> Self {
        if let TaskKind::Assignment { subject } = &mut self.kind {
            *subject = value.into();
        }
        self
    }

    /// No-op unless this is an exam.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        if let TaskKind::Exam { topics, .. } = &mut self.kind {
            topics.push(topic.into());
        }
        self
    }

    /// No-op unless this is an exam.
    pub fn with_study_hours(mut self, hours: u32) -> Self {
        if let TaskKind::Exam { study_hours_completed, .. } = &mut self.kind {
            *study_hours_completed = hours;
        }
        self
    }

    /// No-op unless this is a project.
    pub fn with_subtask(mut self, task: Task) -> Self {
        if let TaskKind::Project { subtasks, .. } = &mut self.kind {
            subtasks.push(task);
        }
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Hours still to be worked, never negative.
    pub fn remaining_hours(&self) -> u32 {
        self.estimated_hours.saturating_sub(self.actual_hours)
    }

    /// True iff every dependency resolves to a completed task in `snapshot`.
    ///
    /// A dependency id that is missing from the snapshot counts as unmet.
    pub fn can_start(&self, snapshot: &[Task]) -> bool {
        self.dependencies.iter().all(|dep| {
            snapshot
                .iter()
                .any(|t| &t.id == dep && t.status == TaskStatus::Completed)
        })
    }

    /// Re-derive status from the clock and logged hours. Completed is sticky.
    pub fn refresh_status(&mut self, now: NaiveDateTime) {
        if self.is_completed() {
            return;
        }
        if now > self.due {
            self.status = TaskStatus::Overdue;
        } else if self.actual_hours > 0 {
            self.status = TaskStatus::InProgress;
        }
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Explicit re-open: the only way out of Completed.
    pub fn reopen(&mut self, now: NaiveDateTime) {
        self.status = TaskStatus::Todo;
        self.refresh_status(now);
    }

    /// Record worked hours. Exam hours also count as study time.
    pub fn log_hours(&mut self, hours: u32, now: NaiveDateTime) {
        self.actual_hours = self.actual_hours.saturating_add(hours);
        if let TaskKind::Exam { study_hours_completed, .. } = &mut self.kind {
            *study_hours_completed = study_hours_completed.saturating_add(hours);
        }
        self.refresh_status(now);
    }
}
