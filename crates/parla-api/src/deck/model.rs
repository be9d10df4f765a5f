use chrono::{DateTime, Utc};
use parla_db::models::CardScheduleRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DueCardsQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

/// A card waiting for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueCard {
    pub flashcard_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub streak: i32,
    pub mastery: f64,
    pub is_new: bool,
}

impl From<CardScheduleRow> for DueCard {
    fn from(row: CardScheduleRow) -> Self {
        Self {
            is_new: row.is_new(),
            flashcard_id: row.flashcard_id,
            due_date: row.due_date,
            streak: row.streak,
            mastery: row.mastery,
        }
    }
}
