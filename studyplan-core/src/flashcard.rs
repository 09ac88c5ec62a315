//! SM-2 style spaced repetition for flashcards.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! The ease factor is stored scaled by 1000 (2500 means 2.5).

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const DEFAULT_EASE_FACTOR: u32 = 2500;
pub const MIN_EASE_FACTOR: u32 = 1300;
/// Intervals are capped at roughly one hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Lowest quality that counts as a correct recall.
const PASSING_QUALITY: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyLevel {
    New,
    Familiar,
    Learning,
    Mastered,
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DifficultyLevel::New => "New",
            DifficultyLevel::Familiar => "Familiar",
            DifficultyLevel::Learning => "Learning",
            DifficultyLevel::Mastered => "Mastered",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,

    pub ease_factor: u32,
    /// Consecutive successful reviews.
    pub repetitions: u32,
    pub interval_days: u32,

    pub next_review: NaiveDateTime,
    pub created: NaiveDateTime,
    #[serde(default)]
    pub last_reviewed: Option<NaiveDateTime>,

    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub correct_count: u32,
}

impl Flashcard {
    /// A fresh card is due immediately.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            interval_days: 0,
            next_review: now,
            created: now,
            last_reviewed: None,
            total_reviews: 0,
            correct_count: 0,
        }
    }

    /// Apply one review outcome in place.
    ///
    /// Out-of-range quality, or a next review date chrono cannot represent,
    /// is rejected and the card is left untouched.
    pub fn apply_review(&mut self, quality: i32, now: NaiveDateTime) -> Result<()> {
        if !(0..=5).contains(&quality) {
            return Err(PlannerError::InvalidQuality(quality));
        }

        let passed = quality >= PASSING_QUALITY;
        let (interval_days, repetitions) = if passed {
            let interval = match self.repetitions {
                0 => 1,
                1 => 6,
                _ => {
                    let ease = self.ease_factor as f64 / 1000.0;
                    (self.interval_days as f64 * ease).round() as u32
                }
            };
            (interval.min(MAX_INTERVAL_DAYS), self.repetitions.saturating_add(1))
        } else {
            (1, 0)
        };

        let next_review = Duration::try_days(interval_days as i64)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(PlannerError::DateOutOfRange(interval_days as i64))?;

        // 850 - (350 - q*75), i.e. 500 + q*75
        let gain = 500 + quality as u32 * 75;

        self.total_reviews = self.total_reviews.saturating_add(1);
        if passed {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.interval_days = interval_days;
        self.repetitions = repetitions;
        self.ease_factor = self.ease_factor.saturating_add(gain).max(MIN_EASE_FACTOR);
        self.next_review = next_review;
        self.last_reviewed = Some(now);

        debug!(
            "card {} reviewed q={} -> interval={}d reps={} ease={}",
            self.id, quality, self.interval_days, self.repetitions, self.ease_factor
        );
        Ok(())
    }

    pub fn is_due_for_review(&self, now: NaiveDateTime) -> bool {
        now > self.next_review
    }

    /// Share of correct reviews in percent; 0 before the first review.
    pub fn mastery_percentage(&self) -> f64 {
        if self.total_reviews == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.total_reviews as f64 * 100.0
    }

    pub fn difficulty_level(&self) -> DifficultyLevel {
        match self.repetitions {
            r if r >= 5 => DifficultyLevel::Mastered,
            r if r >= 3 => DifficultyLevel::Learning,
            r if r >= 1 => DifficultyLevel::Familiar,
            _ => DifficultyLevel::New,
        }
    }
}

/// Review a copy of `card`, leaving the original untouched.
pub fn record_review(card: &Flashcard, quality: i32, now: NaiveDateTime) -> Result<Flashcard> {
    let mut updated = card.clone();
    updated.apply_review(quality, now)?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn new_card() -> Flashcard {
        Flashcard::new("c1", "What is 2+2?", "4", now())
    }

    #[test]
    fn test_first_review_correct() {
        let card = record_review(&new_card(), 4, now()).unwrap();

        assert_eq!(card.interval_days, 1);
        assert_eq!(card.repetitions, 1);
        assert_eq!(card.ease_factor, 3300);
        assert_eq!(card.next_review, now() + Duration::days(1));
        assert_eq!(card.last_reviewed, Some(now()));
        assert_eq!(card.correct_count, 1);
        assert_eq!(card.total_reviews, 1);
    }

    #[test]
    fn test_second_review_correct() {
        let mut card = new_card();
        card.repetitions = 1;
        card.interval_days = 1;

        let card = record_review(&card, 3, now()).unwrap();
        assert_eq!(card.interval_days, 6);
        assert_eq!(card.repetitions, 2);
    }

    #[test]
    fn test_subsequent_review_multiplies_by_ease() {
        let mut card = new_card();
        card.repetitions = 2;
        card.interval_days = 6;
        card.ease_factor = 2500;

        let card = record_review(&card, 5, now()).unwrap();
        // 6 * 2.5 = 15
        assert_eq!(card.interval_days, 15);
        assert_eq!(card.repetitions, 3);
        assert_eq!(card.ease_factor, 2500 + 500 + 375);
    }

    #[test]
    fn test_interval_rounds_half_up() {
        let mut card = new_card();
        card.repetitions = 4;
        card.interval_days = 3;
        card.ease_factor = 1500;

        // 3 * 1.5 = 4.5
        let card = record_review(&card, 4, now()).unwrap();
        assert_eq!(card.interval_days, 5);
    }

    #[test]
    fn test_failure_resets_progress() {
        let mut card = new_card();
        card.repetitions = 6;
        card.interval_days = 40;
        card.correct_count = 6;
        card.total_reviews = 6;

        let card = record_review(&card, 2, now()).unwrap();
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.interval_days, 1);
        assert_eq!(card.correct_count, 6);
        assert_eq!(card.total_reviews, 7);
        assert_eq!(card.ease_factor, 2500 + 500 + 150);
    }

    #[test]
    fn test_ease_factor_floor() {
        let mut card = new_card();
        card.ease_factor = 100;

        let card = record_review(&card, 0, now()).unwrap();
        assert_eq!(card.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_invalid_quality_leaves_card_untouched() {
        let mut card = new_card();
        assert_eq!(card.apply_review(6, now()), Err(PlannerError::InvalidQuality(6)));
        assert_eq!(card.apply_review(-1, now()), Err(PlannerError::InvalidQuality(-1)));
        assert_eq!(card, new_card());
    }

    #[test]
    fn test_long_perfect_streak_caps_interval() {
        let mut card = new_card();
        let mut now = now();
        for _ in 0..25 {
            card = record_review(&card, 5, now).unwrap();
            assert!(card.interval_days <= MAX_INTERVAL_DAYS);
            now = card.next_review;
        }
        assert_eq!(card.repetitions, 25);
        assert_eq!(card.total_reviews, 25);
        assert_eq!(card.interval_days, MAX_INTERVAL_DAYS);
        assert_eq!(card.difficulty_level(), DifficultyLevel::Mastered);
    }

    #[test]
    fn test_ease_factor_saturates() {
        let mut card = new_card();
        card.ease_factor = u32::MAX - 10;
        let card = record_review(&card, 5, now()).unwrap();
        assert_eq!(card.ease_factor, u32::MAX);
    }

    #[test]
    fn test_unrepresentable_next_review_leaves_card_untouched() {
        let end_of_time = NaiveDateTime::MAX - Duration::hours(1);
        let mut card = Flashcard::new("c1", "q", "a", end_of_time);
        let before = card.clone();

        let err = card.apply_review(4, end_of_time).unwrap_err();
        assert_eq!(err, PlannerError::DateOutOfRange(1));
        assert_eq!(card, before);
    }

    #[test]
    fn test_due_is_strictly_after_next_review() {
        let card = new_card();
        assert!(!card.is_due_for_review(now()));
        assert!(card.is_due_for_review(now() + Duration::seconds(1)));
    }

    #[test]
    fn test_mastery_percentage() {
        let mut card = new_card();
        assert_eq!(card.mastery_percentage(), 0.0);

        card.apply_review(5, now()).unwrap();
        card.apply_review(1, now()).unwrap();
        card.apply_review(4, now()).unwrap();
        card.apply_review(4, now()).unwrap();
        assert!((card.mastery_percentage() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_difficulty_levels() {
        let mut card = new_card();
        let mut seen = vec![card.difficulty_level()];
        for _ in 0..5 {
            card.apply_review(5, now()).unwrap();
            seen.push(card.difficulty_level());
        }
        assert_eq!(
            seen,
            vec![
                DifficultyLevel::New,
                DifficultyLevel::Familiar,
                DifficultyLevel::Familiar,
                DifficultyLevel::Learning,
                DifficultyLevel::Learning,
                DifficultyLevel::Mastered,
            ]
        );
        assert_eq!(DifficultyLevel::Mastered.to_string(), "Mastered");
    }
}
