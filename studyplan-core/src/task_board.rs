//! TaskBoard — ordered in-memory task collection.
//!
//! - Keeps tasks in insertion order; that order is the scheduler's tie-break.
//! - Keeps an id -> position index for lookups.
//! - No change listeners: callers re-query or diff what they get back.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use crate::error::{PlannerError, Result};
use crate::scheduler::{ScheduledBlock, Scheduler};
use crate::task::{Task, TaskStatus};

#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    idx: HashMap<String, usize>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates of an id replace earlier ones in place.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::new();
        for t in tasks {
            board.upsert(t);
        }
        board
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.idx.get(id).map(|&i| &self.tasks[i])
    }

    /// Insert, or replace an existing task while keeping its position.
    pub fn upsert(&mut self, task: Task) {
        match self.idx.get(&task.id) {
            Some(&i) => self.tasks[i] = task,
            None => {
                self.idx.insert(task.id.clone(), self.tasks.len());
                self.tasks.push(task);
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let i = self.idx.remove(id)?;
        let task = self.tasks.remove(i);
        self.reindex();
        Some(task)
    }

    pub fn complete(&mut self, id: &str) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.complete();
        Ok(&*task)
    }

    pub fn reopen(&mut self, id: &str, now: NaiveDateTime) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.reopen(now);
        Ok(&*task)
    }

    pub fn log_hours(&mut self, id: &str, hours: u32, now: NaiveDateTime) -> Result<&Task> {
        let task = self.get_mut(id)?;
        task.log_hours(hours, now);
        Ok(&*task)
    }

    /// Re-derive every status from the clock. Returns ids whose status changed.
    pub fn refresh_statuses(&mut self, now: NaiveDateTime) -> Vec<String> {
        let mut changed = Vec::new();
        for t in self.tasks.iter_mut() {
            let before = t.status;
            t.refresh_status(now);
            if t.status != before {
                changed.push(t.id.clone());
            }
        }
        changed
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Open tasks due before `now + days`, earliest first.
    ///
    /// A window reaching past the representable range has no upper bound.
    pub fn upcoming(&self, now: NaiveDateTime, days: i64) -> Vec<&Task> {
        let until = Duration::try_days(days).and_then(|d| now.checked_add_signed(d));
        let mut out: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.is_completed())
            .filter(|t| until.is_none_or(|u| t.due < u))
            .collect();
        out.sort_by_key(|t| t.due);
        out
    }

    /// Open tasks, most urgent first, regardless of dependencies.
    pub fn sorted_by_urgency(&self, now: NaiveDateTime) -> Vec<&Task> {
        let mut out: Vec<(&Task, f64)> = self
            .tasks
            .iter()
            .filter(|t| !t.is_completed())
            .map(|t| (t, t.urgency_score(now)))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        out.into_iter().map(|(t, _)| t).collect()
    }

    /// Sum of estimates over open tasks.
    pub fn total_estimated_hours(&self) -> u64 {
        self.tasks
            .iter()
            .filter(|t| !t.is_completed())
            .map(|t| u64::from(t.estimated_hours))
            .sum()
    }

    pub fn schedule(
        &self,
        scheduler: &Scheduler,
        now: NaiveDateTime,
        horizon_days: i64,
    ) -> Result<Vec<ScheduledBlock>> {
        scheduler.generate_schedule(&self.tasks, now, horizon_days)
    }

    pub fn recommended(&self, scheduler: &Scheduler, now: NaiveDateTime, count: usize) -> Vec<&Task> {
        scheduler.recommended_tasks(&self.tasks, now, count)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        let i = *self
            .idx
            .get(id)
            .ok_or_else(|| PlannerError::UnknownTask(id.to_string()))?;
        Ok(&mut self.tasks[i])
    }

    fn reindex(&mut self) {
        self.idx = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn board() -> TaskBoard {
        let now = at(2, 9);
        TaskBoard::from_tasks(vec![
            Task::assignment("a1", "Essay", at(6, 9), now).with_estimate(3),
            Task::exam("e1", "Midterm", at(3, 9), now).with_estimate(8),
            Task::project("p1", "Capstone", at(20, 9), now).with_estimate(30),
        ])
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut b = board();
        let now = at(2, 9);
        b.upsert(Task::assignment("e1", "Replaced", at(4, 9), now));
        assert_eq!(b.len(), 3);
        assert_eq!(b.tasks()[1].title, "Replaced");
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut b = board();
        assert!(b.remove("a1").is_some());
        assert!(b.remove("a1").is_none());
        assert_eq!(b.get("p1").map(|t| t.title.as_str()), Some("Capstone"));
        assert_eq!(b.get("e1").map(|t| t.title.as_str()), Some("Midterm"));
    }

    #[test]
    fn unknown_ids_error() {
        let mut b = board();
        let err = b.complete("zzz").unwrap_err();
        assert_eq!(err, PlannerError::UnknownTask("zzz".to_string()));
    }

    #[test]
    fn completed_tasks_drop_out_of_queries() {
        let mut b = board();
        b.complete("e1").unwrap();

        assert_eq!(b.by_status(TaskStatus::Completed).len(), 1);
        assert_eq!(b.total_estimated_hours(), 33);
        assert!(b.sorted_by_urgency(at(2, 9)).iter().all(|t| t.id != "e1"));
        assert!(b.upcoming(at(2, 9), 30).iter().all(|t| t.id != "e1"));
    }

    #[test]
    fn upcoming_sorted_by_due() {
        let b = board();
        let ids: Vec<&str> = b.upcoming(at(2, 9), 7).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "a1"]);
    }

    #[test]
    fn upcoming_with_unbounded_window() {
        let b = board();
        let ids: Vec<&str> = b
            .upcoming(at(2, 9), i64::MAX)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["e1", "a1", "p1"]);
    }

    #[test]
    fn total_estimate_does_not_wrap() {
        let now = at(2, 9);
        let b = TaskBoard::from_tasks(vec![
            Task::assignment("a1", "Big", at(6, 9), now).with_estimate(u32::MAX),
            Task::assignment("a2", "Bigger", at(7, 9), now).with_estimate(u32::MAX),
        ]);
        assert_eq!(b.total_estimated_hours(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn refresh_reports_changes() {
        let mut b = board();
        b.log_hours("a1", 1, at(2, 10)).unwrap();
        assert_eq!(b.get("a1").unwrap().status, TaskStatus::InProgress);

        let changed = b.refresh_statuses(at(4, 9));
        assert_eq!(changed, vec!["e1".to_string()]);
        assert_eq!(b.get("e1").unwrap().status, TaskStatus::Overdue);
    }

    #[test]
    fn reopen_restores_open_status() {
        let mut b = board();
        b.complete("a1").unwrap();
        let t = b.reopen("a1", at(2, 9)).unwrap();
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn schedules_through_the_board() {
        let b = board();
        let s = Scheduler::default();
        let blocks = b.schedule(&s, at(2, 9), 7).unwrap();
        assert_eq!(blocks.first().map(|blk| blk.task_id.as_str()), Some("e1"));
        assert_eq!(b.recommended(&s, at(2, 9), 1)[0].id, "e1");
    }
}
