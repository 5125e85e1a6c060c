//! Decision outcomes and the score ladder that produces them

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final categorical result of a scenario evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approve,
    Review,
    BlockAndReview,
    Decline,
    /// The trigger condition evaluated to false; no rule ran and no
    /// decision is produced. Never returned by [`ScoreThresholds::outcome_for`].
    TriggerConditionNotMet,
}

impl Outcome {
    /// Whether this outcome is an actual decision
    pub fn is_decision(&self) -> bool {
        !matches!(self, Outcome::TriggerConditionNotMet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Approve => "approve",
            Outcome::Review => "review",
            Outcome::BlockAndReview => "block_and_review",
            Outcome::Decline => "decline",
            Outcome::TriggerConditionNotMet => "trigger_condition_not_met",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ascending score thresholds of an iteration.
///
/// Every threshold is an inclusive lower bound: a score equal to a
/// threshold lands in that threshold's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub review: i32,
    /// Optional rung between review and decline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_and_review: Option<i32>,
    pub decline: i32,
}

impl ScoreThresholds {
    pub fn new(review: i32, decline: i32) -> Self {
        Self {
            review,
            block_and_review: None,
            decline,
        }
    }

    pub fn with_block_and_review(mut self, threshold: i32) -> Self {
        self.block_and_review = Some(threshold);
        self
    }

    /// Thresholds must be ascending: review <= block_and_review <= decline
    pub fn validate(&self) -> Result<()> {
        let upper_review = self.block_and_review.unwrap_or(self.decline);
        if self.review > upper_review || upper_review > self.decline {
            return Err(CoreError::InvalidConfiguration(format!(
                "score thresholds must be ascending (review={}, block_and_review={:?}, decline={})",
                self.review, self.block_and_review, self.decline
            )));
        }
        Ok(())
    }

    /// Map a total score to an outcome
    pub fn outcome_for(&self, score: i32) -> Outcome {
        if score >= self.decline {
            Outcome::Decline
        } else if self.block_and_review.is_some_and(|t| score >= t) {
            Outcome::BlockAndReview
        } else if score >= self.review {
            Outcome::Review
        } else {
            Outcome::Approve
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_boundaries_without_block_and_review() {
        let thresholds = ScoreThresholds::new(10, 50);
        assert_eq!(thresholds.outcome_for(i32::MIN), Outcome::Approve);
        assert_eq!(thresholds.outcome_for(9), Outcome::Approve);
        assert_eq!(thresholds.outcome_for(10), Outcome::Review);
        assert_eq!(thresholds.outcome_for(49), Outcome::Review);
        assert_eq!(thresholds.outcome_for(50), Outcome::Decline);
        assert_eq!(thresholds.outcome_for(51), Outcome::Decline);
    }

    #[test]
    fn test_outcome_boundaries_with_block_and_review() {
        let thresholds = ScoreThresholds::new(10, 50).with_block_and_review(30);
        assert_eq!(thresholds.outcome_for(29), Outcome::Review);
        assert_eq!(thresholds.outcome_for(30), Outcome::BlockAndReview);
        assert_eq!(thresholds.outcome_for(49), Outcome::BlockAndReview);
        assert_eq!(thresholds.outcome_for(50), Outcome::Decline);
    }

    #[test]
    fn test_negative_scores_approve() {
        let thresholds = ScoreThresholds::new(0, 10);
        assert_eq!(thresholds.outcome_for(-5), Outcome::Approve);
        assert_eq!(thresholds.outcome_for(0), Outcome::Review);
    }

    #[test]
    fn test_equal_thresholds_prefer_highest_rung() {
        let thresholds = ScoreThresholds::new(20, 20);
        assert!(thresholds.validate().is_ok());
        assert_eq!(thresholds.outcome_for(20), Outcome::Decline);
    }

    #[test]
    fn test_validate_rejects_descending() {
        assert!(ScoreThresholds::new(50, 10).validate().is_err());
        assert!(ScoreThresholds::new(10, 50)
            .with_block_and_review(60)
            .validate()
            .is_err());
        assert!(ScoreThresholds::new(10, 50)
            .with_block_and_review(5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_outcome_serde() {
        assert_eq!(
            serde_json::to_string(&Outcome::BlockAndReview).unwrap(),
            "\"block_and_review\""
        );
        assert!(!Outcome::TriggerConditionNotMet.is_decision());
        assert!(Outcome::Approve.is_decision());
    }
}
