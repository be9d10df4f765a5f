use chrono::{DateTime, Utc};
use parla_srs::{CardSchedule, CardState, MasteryState};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored scheduling state of one flashcard (`card_schedules`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CardScheduleRow {
    pub flashcard_id: Uuid,
    pub deck_id: Uuid,
    pub streak: i32,
    pub e_factor: f64,
    /// Days until due, fractional below one day
    pub interval_days: f64,
    /// NULL until the first review
    pub due_date: Option<DateTime<Utc>>,
    pub mastery: f64,
    pub total_reviews: i32,
    pub last_review_at: Option<DateTime<Utc>>,
}

impl CardScheduleRow {
    /// Whether a card has never been reviewed.
    pub const fn is_new(&self) -> bool {
        self.total_reviews == 0
    }
}

impl From<&CardScheduleRow> for CardState {
    fn from(row: &CardScheduleRow) -> Self {
        Self {
            schedule: CardSchedule {
                streak: u32::try_from(row.streak).unwrap_or_default(),
                e_factor: row.e_factor,
                interval: row.interval_days,
            },
            mastery: MasteryState {
                mastery: row.mastery,
                total_reviews: u32::try_from(row.total_reviews).unwrap_or_default(),
            },
            due_date: row.due_date,
        }
    }
}

/// One evaluation appended to `review_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReviewEvent {
    pub flashcard_id: Uuid,
    pub deck_id: Uuid,
    pub rating: String,
    pub score: i16,
    pub elapsed_seconds: f64,
    pub lateness: f64,
    pub streak: i32,
    pub e_factor: f64,
    pub interval_days: f64,
    pub mastery: f64,
}

/// Aggregate mastery of a deck, shown to users as the deck's grade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeckMastery {
    pub deck_id: Uuid,
    pub card_count: i64,
    pub reviewed_count: i64,
    pub due_count: i64,
    /// Average over all scheduled cards, never-reviewed cards counting as 0
    pub average_mastery: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_card_state() {
        let row = CardScheduleRow {
            flashcard_id: Uuid::new_v4(),
            deck_id: Uuid::new_v4(),
            streak: 4,
            e_factor: 2.2,
            interval_days: 9.0,
            due_date: None,
            mastery: 61.5,
            total_reviews: 12,
            last_review_at: None,
        };

        let state = CardState::from(&row);
        assert_eq!(state.schedule.streak, 4);
        assert_eq!(state.schedule.e_factor, 2.2);
        assert_eq!(state.schedule.interval, 9.0);
        assert_eq!(state.mastery.mastery, 61.5);
        assert_eq!(state.mastery.total_reviews, 12);
        assert!(!row.is_new());
    }
}
