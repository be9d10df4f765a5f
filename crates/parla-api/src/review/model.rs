use chrono::{DateTime, Utc};
use parla_db::models::CardScheduleRow;
use parla_srs::{CardSchedule, CardState, DEFAULT_E_FACTOR, MasteryState, Rating, ReviewOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Longest answer time accepted for a review, in seconds.
pub const MAX_ELAPSED_SECONDS: f64 = 86_400.0;

/// Body of `POST /v1/cards/{flashcard_id}/review`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewSubmission {
    pub deck_id: Uuid,
    pub rating: Rating,
    /// Seconds the learner took to answer
    #[validate(range(min = 0.0, max = 86400.0))]
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub flashcard_id: Uuid,
    pub deck_id: Uuid,
    pub score: u8,
    pub lateness: f64,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
}

/// Body of `POST /v1/schedule/preview`.
///
/// Card fields left out fall back to new-card defaults. With none of them
/// present the card is treated as never reviewed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SchedulePreviewRequest {
    pub streak: Option<u32>,
    pub e_factor: Option<f64>,
    pub interval: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub mastery: Option<f64>,
    pub total_reviews: Option<u32>,
    pub due_date: Option<DateTime<Utc>>,
    pub score: u8,
    #[serde(default)]
    pub lateness: f64,
}

impl SchedulePreviewRequest {
    pub fn card(&self) -> Option<CardState> {
        let untouched = self.streak.is_none()
            && self.e_factor.is_none()
            && self.interval.is_none()
            && self.mastery.is_none()
            && self.total_reviews.is_none()
            && self.due_date.is_none();
        if untouched {
            return None;
        }

        Some(CardState {
            schedule: CardSchedule {
                streak: self.streak.unwrap_or(0),
                e_factor: self.e_factor.unwrap_or(DEFAULT_E_FACTOR),
                interval: self.interval.unwrap_or(0.0),
            },
            mastery: MasteryState {
                mastery: self.mastery.unwrap_or(0.0),
                total_reviews: self.total_reviews.unwrap_or(0),
            },
            due_date: self.due_date,
        })
    }
}

/// Stored schedule of one card as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardScheduleResponse {
    pub flashcard_id: Uuid,
    pub deck_id: Uuid,
    pub streak: i32,
    pub e_factor: f64,
    pub interval: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub mastery: f64,
    pub total_reviews: i32,
    pub last_review_at: Option<DateTime<Utc>>,
}

impl From<CardScheduleRow> for CardScheduleResponse {
    fn from(row: CardScheduleRow) -> Self {
        Self {
            flashcard_id: row.flashcard_id,
            deck_id: row.deck_id,
            streak: row.streak,
            e_factor: row.e_factor,
            interval: row.interval_days,
            due_date: row.due_date,
            mastery: row.mastery,
            total_reviews: row.total_reviews,
            last_review_at: row.last_review_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_preview_is_new_card() {
        let request = SchedulePreviewRequest {
            score: 4,
            ..Default::default()
        };
        assert!(request.card().is_none());
    }

    #[test]
    fn test_partial_preview_uses_defaults() {
        let request = SchedulePreviewRequest {
            streak: Some(4),
            interval: Some(6.0),
            score: 5,
            ..Default::default()
        };
        let card = request.card().unwrap();
        assert_eq!(card.schedule.streak, 4);
        assert_eq!(card.schedule.e_factor, DEFAULT_E_FACTOR);
        assert_eq!(card.mastery.total_reviews, 0);
    }

    #[test]
    fn test_submission_validation() {
        let submission = ReviewSubmission {
            deck_id: Uuid::new_v4(),
            rating: Rating::Good,
            elapsed_seconds: 4.2,
        };
        assert!(submission.validate().is_ok());

        let too_slow = ReviewSubmission {
            elapsed_seconds: MAX_ELAPSED_SECONDS + 1.0,
            ..submission.clone()
        };
        assert!(too_slow.validate().is_err());

        let negative = ReviewSubmission {
            elapsed_seconds: -1.0,
            ..submission
        };
        assert!(negative.validate().is_err());
    }
}
