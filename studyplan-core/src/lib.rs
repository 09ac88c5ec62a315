//! studyplan-core: urgency scoring, greedy study scheduling and spaced
//! repetition for a task/study planner.
//!
//! Everything here is a pure computation over caller-owned records. Nothing
//! reads or writes storage.

pub mod deck;
pub mod error;
pub mod flashcard;
pub mod scheduler;
pub mod stats;
pub mod task;
pub mod task_board;
pub mod time;
pub mod urgency;

pub use deck::{Deck, DeckLibrary};
pub use error::{PlannerError, Result};
pub use flashcard::{
    record_review, DifficultyLevel, Flashcard, DEFAULT_EASE_FACTOR, MAX_INTERVAL_DAYS,
    MIN_EASE_FACTOR,
};
pub use scheduler::{generate_schedule, recommended_tasks, ScheduledBlock, Scheduler, SchedulerConfig};
pub use stats::TaskStats;
pub use task::{Priority, Task, TaskKind, TaskStatus};
pub use task_board::TaskBoard;
pub use urgency::urgency_score;
