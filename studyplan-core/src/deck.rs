//! Decks of flashcards and library-wide totals.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::flashcard::{DifficultyLevel, Flashcard};

fn default_category() -> String {
    "General".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub created: NaiveDateTime,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: default_category(),
            created: now,
            cards: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn add_card(&mut self, card: Flashcard) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, id: &str) -> Option<Flashcard> {
        let idx = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(idx))
    }

    pub fn card(&self, id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Flashcard> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Due cards in deck order.
    pub fn cards_due_for_review(&self, now: NaiveDateTime) -> Vec<&Flashcard> {
        self.cards
            .iter()
            .filter(|c| c.is_due_for_review(now))
            .collect()
    }

    pub fn due_count(&self, now: NaiveDateTime) -> usize {
        self.cards.iter().filter(|c| c.is_due_for_review(now)).count()
    }

    pub fn mastered_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.difficulty_level() == DifficultyLevel::Mastered)
            .count()
    }

    /// Mean per-card mastery; 0 for an empty deck.
    pub fn average_mastery(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.cards.iter().map(Flashcard::mastery_percentage).sum();
        sum / self.cards.len() as f64
    }

    /// Review the card with `card_id` in place and return its new state.
    pub fn record_review(
        &mut self,
        card_id: &str,
        quality: i32,
        now: NaiveDateTime,
    ) -> Result<&Flashcard> {
        let card = self
            .card_mut(card_id)
            .ok_or_else(|| PlannerError::UnknownCard(card_id.to_string()))?;
        card.apply_review(quality, now)?;
        Ok(&*card)
    }
}

/// Ordered collection of decks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckLibrary {
    pub decks: Vec<Deck>,
}

impl DeckLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_deck(&mut self, deck: Deck) {
        self.decks.push(deck);
    }

    pub fn remove_deck(&mut self, id: &str) -> Option<Deck> {
        let idx = self.decks.iter().position(|d| d.id == id)?;
        Some(self.decks.remove(idx))
    }

    pub fn deck(&self, id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn deck_mut(&mut self, id: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == id)
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(Deck::total_cards).sum()
    }

    pub fn total_due(&self, now: NaiveDateTime) -> usize {
        self.decks.iter().map(|d| d.due_count(now)).sum()
    }

    pub fn total_mastered(&self) -> usize {
        self.decks.iter().map(Deck::mastered_count).sum()
    }
}
