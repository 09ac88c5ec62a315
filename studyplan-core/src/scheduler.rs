//! Greedy time-block scheduler.
//!
//! One shared cursor walks forward from `now`. Tasks are taken in urgency
//! order and their remaining hours are packed into blocks during productive
//! hours. The cursor is never rewound, so the produced blocks form a single
//! non-overlapping timeline.

use chrono::{Duration, NaiveDateTime, Timelike};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// First hour of day a block may start in.
    pub productive_start_hour: u32,
    /// Blocks must start strictly before this hour.
    pub productive_end_hour: u32,
    pub max_block_hours: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            productive_start_hour: 9,
            productive_end_hour: 21,
            max_block_hours: 2,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.productive_end_hour > 24 {
            return Err(PlannerError::InvalidConfig(format!(
                "productive_end_hour must be <= 24, got {}",
                self.productive_end_hour
            )));
        }
        if self.productive_start_hour >= self.productive_end_hour {
            return Err(PlannerError::InvalidConfig(format!(
                "productive hours are empty: {}..{}",
                self.productive_start_hour, self.productive_end_hour
            )));
        }
        if self.max_block_hours == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_block_hours must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_productive(&self, at: NaiveDateTime) -> bool {
        (self.productive_start_hour..self.productive_end_hour).contains(&at.hour())
    }
}

/// A stretch of time reserved for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    pub task_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduledBlock {
    pub fn duration_hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Pack the pending work in `tasks` into blocks between `now` and
    /// `now + horizon_days`.
    ///
    /// Blocks come out grouped by task in urgency order, chronological within
    /// each task. A horizon that lands past chrono's last representable date
    /// is rejected with [`PlannerError::DateOutOfRange`].
    pub fn generate_schedule(
        &self,
        tasks: &[Task],
        now: NaiveDateTime,
        horizon_days: i64,
    ) -> Result<Vec<ScheduledBlock>> {
        if horizon_days < 0 {
            return Err(PlannerError::NegativeHorizon(horizon_days));
        }

        let horizon_end = Duration::try_days(horizon_days)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(PlannerError::DateOutOfRange(horizon_days))?;
        let mut cursor = now;
        let mut blocks = Vec::new();

        for task in ranked_candidates(tasks, now) {
            let mut hours_needed = task.remaining_hours();
            trace!("scheduling {} ({} h needed) from {}", task.id, hours_needed, cursor);

            while hours_needed > 0 && cursor < horizon_end {
                if !self.config.is_productive(cursor) {
                    match cursor.checked_add_signed(Duration::hours(1)) {
                        Some(next) => cursor = next,
                        None => break,
                    }
                    continue;
                }

                let block_hours = hours_needed.min(self.config.max_block_hours);
                let Some(end) = cursor.checked_add_signed(Duration::hours(block_hours as i64))
                else {
                    break;
                };
                blocks.push(ScheduledBlock {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    start: cursor,
                    end,
                });
                hours_needed -= block_hours;
                cursor = end;
            }

            if hours_needed > 0 {
                trace!("{} left with {} h unscheduled at horizon", task.id, hours_needed);
            }
        }

        debug!(
            "generated {} blocks for {} tasks over {} days",
            blocks.len(),
            tasks.len(),
            horizon_days
        );
        Ok(blocks)
    }

    /// Top `count` startable, non-completed tasks by urgency.
    pub fn recommended_tasks<'a>(
        &self,
        tasks: &'a [Task],
        now: NaiveDateTime,
        count: usize,
    ) -> Vec<&'a Task> {
        ranked_candidates(tasks, now).into_iter().take(count).collect()
    }
}

/// Non-completed tasks whose dependencies are all completed, most urgent
/// first. Ties keep input order.
fn ranked_candidates(tasks: &[Task], now: NaiveDateTime) -> Vec<&Task> {
    let mut scored: Vec<(&Task, f64)> = tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.can_start(tasks))
        .map(|t| (t, t.urgency_score(now)))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(t, _)| t).collect()
}

/// [`Scheduler::generate_schedule`] with the default config.
pub fn generate_schedule(
    tasks: &[Task],
    now: NaiveDateTime,
    horizon_days: i64,
) -> Result<Vec<ScheduledBlock>> {
    Scheduler::default().generate_schedule(tasks, now, horizon_days)
}

/// [`Scheduler::recommended_tasks`] with the default config.
pub fn recommended_tasks(tasks: &[Task], now: NaiveDateTime, count: usize) -> Vec<&Task> {
    Scheduler::default().recommended_tasks(tasks, now, count)
}
