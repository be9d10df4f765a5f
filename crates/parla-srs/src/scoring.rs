//! Translation of a self-rating plus answer time into a numeric [`Score`].

use serde::{Deserialize, Serialize};

use crate::{Score, SrsError};

/// Qualitative self-rating submitted after a card is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Fail,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Score for this rating given how long the answer took, in seconds.
    ///
    /// | Rating | Condition   | Score |
    /// |--------|-------------|-------|
    /// | easy   | ≤ 5s        | 5     |
    /// | easy   | > 5s        | 4     |
    /// | good   | ≤ 10s       | 4     |
    /// | good   | > 10s       | 3     |
    /// | hard   | any         | 3     |
    /// | fail   | ≤ 20s       | 2     |
    /// | fail   | > 20s       | 1     |
    pub fn score(self, elapsed_secs: f64) -> Result<Score, SrsError> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(SrsError::InvalidElapsed(elapsed_secs));
        }

        let value = match self {
            Self::Easy if elapsed_secs <= 5.0 => 5,
            Self::Easy => 4,
            Self::Good if elapsed_secs <= 10.0 => 4,
            Self::Good | Self::Hard => 3,
            Self::Fail if elapsed_secs <= 20.0 => 2,
            Self::Fail => 1,
        };

        Score::new(value)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(rating: Rating, elapsed: f64) -> u8 {
        rating.score(elapsed).unwrap().get()
    }

    #[test]
    fn test_scoring_table() {
        assert_eq!(score(Rating::Easy, 0.0), 5);
        assert_eq!(score(Rating::Easy, 5.0), 5);
        assert_eq!(score(Rating::Easy, 5.1), 4);
        assert_eq!(score(Rating::Good, 10.0), 4);
        assert_eq!(score(Rating::Good, 10.5), 3);
        assert_eq!(score(Rating::Hard, 1.0), 3);
        assert_eq!(score(Rating::Hard, 120.0), 3);
        assert_eq!(score(Rating::Fail, 20.0), 2);
        assert_eq!(score(Rating::Fail, 21.0), 1);
    }

    #[test]
    fn test_invalid_elapsed() {
        assert_eq!(
            Rating::Good.score(-1.0),
            Err(SrsError::InvalidElapsed(-1.0))
        );
        assert!(Rating::Good.score(f64::NAN).is_err());
    }

    #[test]
    fn test_rating_serde() {
        let rating: Rating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(rating, Rating::Easy);
        assert_eq!(serde_json::to_string(&Rating::Fail).unwrap(), "\"fail\"");
    }
}
