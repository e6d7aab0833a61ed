//! In-memory card state store

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::error::{ApiError, Result};
use crate::models::{CardMemoryState, CardRecord};

#[derive(Debug, Default)]
struct Cards {
    records: HashMap<i64, CardRecord>,
    /// UTC days with at least one review, per deck.
    study_days: HashMap<i64, BTreeSet<NaiveDate>>,
}

/// Card records keyed by card ID.
///
/// A single lock guards every card, so a read-modify-write against one card
/// can never interleave with another.
#[derive(Debug, Default)]
pub struct CardStore {
    cards: Mutex<Cards>,
}

/// Working copy of the states touched by one batch.
pub struct StagedCards<'a> {
    committed: &'a HashMap<i64, CardRecord>,
    staged: HashMap<i64, CardMemoryState>,
}

impl StagedCards<'_> {
    /// Latest state of a card, including changes staged earlier in the batch.
    pub fn get(&self, card_id: i64) -> Option<&CardMemoryState> {
        self.staged
            .get(&card_id)
            .or_else(|| self.committed.get(&card_id).map(|record| &record.state))
    }

    /// Stage the state a review produced.
    pub fn record_review(&mut self, card_id: i64, state: CardMemoryState) {
        self.staged.insert(card_id, state);
    }
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new card, refusing to overwrite an existing one.
    pub async fn insert_card(&self, card_id: i64, record: CardRecord) -> Result<()> {
        let mut cards = self.cards.lock().await;
        if cards.records.contains_key(&card_id) {
            return Err(ApiError::Conflict(format!("Card {} already exists", card_id)));
        }
        cards.records.insert(card_id, record);
        Ok(())
    }

    pub async fn get_card(&self, card_id: i64) -> Option<CardRecord> {
        self.cards.lock().await.records.get(&card_id).cloned()
    }

    /// Whether any card has been registered in `deck_id`.
    pub async fn has_deck(&self, deck_id: i64) -> bool {
        self.cards
            .lock()
            .await
            .records
            .values()
            .any(|record| record.deck_id == Some(deck_id))
    }

    /// Cards due at `now`, earliest first, ties broken by card ID.
    ///
    /// With a `deck_id`, only cards registered in that deck are considered.
    pub async fn get_due_cards(&self, now: DateTime<Utc>, deck_id: Option<i64>) -> Vec<(i64, CardRecord)> {
        let cards = self.cards.lock().await;
        let mut due: Vec<_> = cards
            .records
            .iter()
            .filter(|(_, record)| deck_id.is_none() || record.deck_id == deck_id)
            .filter(|(_, record)| record.state.is_due(now))
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        due.sort_by(|a, b| a.1.state.due_at.cmp(&b.1.state.due_at).then(a.0.cmp(&b.0)));
        due
    }

    pub async fn study_days(&self, deck_id: i64) -> BTreeSet<NaiveDate> {
        self.cards
            .lock()
            .await
            .study_days
            .get(&deck_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Run `apply` against a working copy and commit only if it succeeds.
    ///
    /// Committed reviews mark their day as studied in the card's deck.
    pub async fn update_batch<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut StagedCards<'_>) -> Result<T>,
    {
        let mut guard = self.cards.lock().await;
        let Cards { records, study_days } = &mut *guard;

        let mut working = StagedCards {
            committed: &*records,
            staged: HashMap::new(),
        };
        let output = apply(&mut working)?;
        let staged = working.staged;

        for (card_id, state) in staged {
            let Some(record) = records.get_mut(&card_id) else {
                continue;
            };
            if let (Some(deck_id), Some(reviewed_at)) = (record.deck_id, state.last_reviewed_at) {
                study_days
                    .entry(deck_id)
                    .or_default()
                    .insert(reviewed_at.date_naive());
            }
            record.state = state;
        }
        Ok(output)
    }
}
