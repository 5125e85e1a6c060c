//! Evaluation state machine

use std::fmt;

/// State of one scenario evaluation.
///
/// `NotStarted → TriggerEvaluated → RulesEvaluated → ScoredAndOutcomeAssigned`,
/// with `AbortedWithError` reachable from any non-terminal state. An
/// evaluation whose trigger condition is not met stops at `TriggerEvaluated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationState {
    NotStarted,
    TriggerEvaluated,
    RulesEvaluated,
    ScoredAndOutcomeAssigned,
    AbortedWithError,
}

impl EvaluationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EvaluationState::ScoredAndOutcomeAssigned | EvaluationState::AbortedWithError
        )
    }

    pub fn can_transition_to(&self, next: EvaluationState) -> bool {
        use EvaluationState::*;
        match (self, next) {
            (NotStarted, TriggerEvaluated) => true,
            (TriggerEvaluated, RulesEvaluated) => true,
            (RulesEvaluated, ScoredAndOutcomeAssigned) => true,
            (current, AbortedWithError) => !current.is_terminal(),
            _ => false,
        }
    }

    /// Move to `next`, logging the transition
    pub(crate) fn advance(&mut self, next: EvaluationState, scenario_id: &str) {
        debug_assert!(
            self.can_transition_to(next),
            "invalid transition {} -> {}",
            self,
            next
        );
        tracing::debug!(scenario_id, from = %self, to = %next, "scenario evaluation state");
        *self = next;
    }

    /// Move to `AbortedWithError` unless the evaluation already finished
    pub(crate) fn abort(&mut self, scenario_id: &str) {
        if !self.is_terminal() {
            self.advance(EvaluationState::AbortedWithError, scenario_id);
        }
    }
}

impl fmt::Display for EvaluationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvaluationState::NotStarted => "not_started",
            EvaluationState::TriggerEvaluated => "trigger_evaluated",
            EvaluationState::RulesEvaluated => "rules_evaluated",
            EvaluationState::ScoredAndOutcomeAssigned => "scored_and_outcome_assigned",
            EvaluationState::AbortedWithError => "aborted_with_error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut state = EvaluationState::NotStarted;
        state.advance(EvaluationState::TriggerEvaluated, "sc-1");
        state.advance(EvaluationState::RulesEvaluated, "sc-1");
        state.advance(EvaluationState::ScoredAndOutcomeAssigned, "sc-1");
        assert!(state.is_terminal());
    }

    #[test]
    fn test_abort_from_any_open_state() {
        assert!(EvaluationState::NotStarted.can_transition_to(EvaluationState::AbortedWithError));
        assert!(EvaluationState::RulesEvaluated.can_transition_to(EvaluationState::AbortedWithError));
        assert!(!EvaluationState::ScoredAndOutcomeAssigned
            .can_transition_to(EvaluationState::AbortedWithError));
    }

    #[test]
    fn test_abort_is_idempotent() {
        for open in [
            EvaluationState::NotStarted,
            EvaluationState::TriggerEvaluated,
            EvaluationState::RulesEvaluated,
        ] {
            let mut state = open;
            state.abort("sc-1");
            assert_eq!(state, EvaluationState::AbortedWithError);
            state.abort("sc-1");
            assert_eq!(state, EvaluationState::AbortedWithError);
        }

        let mut finished = EvaluationState::ScoredAndOutcomeAssigned;
        finished.abort("sc-1");
        assert_eq!(finished, EvaluationState::ScoredAndOutcomeAssigned);
    }

    #[test]
    fn test_no_skipping() {
        assert!(!EvaluationState::NotStarted.can_transition_to(EvaluationState::RulesEvaluated));
        assert!(!EvaluationState::TriggerEvaluated
            .can_transition_to(EvaluationState::ScoredAndOutcomeAssigned));
    }
}
