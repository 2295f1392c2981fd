// Provisioning workflow transitions
//
// Pure functions only: the controller owns the current state and feeds
// events through `transition`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{StepStatus, WorkflowState};

/// Steps shown to the user, in the order they run
pub const ORDERED_STEPS: [WorkflowState; 4] = [
    WorkflowState::CreatingAssistant,
    WorkflowState::PurchasingNumber,
    WorkflowState::Associating,
    WorkflowState::Complete,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// Validated input was submitted
    Begin,
    AssistantCreated,
    NumberPurchased,
    NumberAssociated,
    /// The pending remote call failed
    Fail,
    /// Start over from a finished attempt
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid transition from {from} on {event:?}")]
pub struct TransitionError {
    pub from: WorkflowState,
    pub event: WorkflowEvent,
}

/// Next state for `event`, or an error when the pair is not in the table
pub fn transition(
    from: WorkflowState,
    event: WorkflowEvent,
) -> Result<WorkflowState, TransitionError> {
    use self::WorkflowEvent as E;
    use super::types::WorkflowState as S;

    let next = match (from, event) {
        (S::Idle | S::Error, E::Begin) => S::CreatingAssistant,
        (S::CreatingAssistant, E::AssistantCreated) => S::PurchasingNumber,
        (S::PurchasingNumber, E::NumberPurchased) => S::Associating,
        (S::Associating, E::NumberAssociated) => S::Complete,
        (S::CreatingAssistant | S::PurchasingNumber | S::Associating, E::Fail) => S::Error,
        (S::Idle | S::Complete | S::Error, E::Reset) => S::Idle,
        _ => return Err(TransitionError { from, event }),
    };
    Ok(next)
}

/// Status of `step` in the step list while the workflow is in `current`.
///
/// `idle` and `error` are not in the list, so every step reads as pending.
pub fn step_status(current: WorkflowState, step: WorkflowState) -> StepStatus {
    let position = |state: WorkflowState| ORDERED_STEPS.iter().position(|s| *s == state);

    match (position(current), position(step)) {
        (Some(current_index), Some(step_index)) if step_index < current_index => {
            StepStatus::Completed
        }
        (Some(current_index), Some(step_index)) if step_index == current_index => {
            StepStatus::Active
        }
        _ => StepStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_walks_forward() {
        let mut state = WorkflowState::Idle;
        for event in [
            WorkflowEvent::Begin,
            WorkflowEvent::AssistantCreated,
            WorkflowEvent::NumberPurchased,
            WorkflowEvent::NumberAssociated,
        ] {
            state = transition(state, event).unwrap();
        }
        assert_eq!(state, WorkflowState::Complete);
    }

    #[test]
    fn test_fail_only_from_in_progress_states() {
        for state in ORDERED_STEPS.iter().take(3) {
            assert_eq!(
                transition(*state, WorkflowEvent::Fail),
                Ok(WorkflowState::Error)
            );
        }
        assert!(transition(WorkflowState::Idle, WorkflowEvent::Fail).is_err());
        assert!(transition(WorkflowState::Complete, WorkflowEvent::Fail).is_err());
        assert!(transition(WorkflowState::Error, WorkflowEvent::Fail).is_err());
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(transition(WorkflowState::Idle, WorkflowEvent::AssistantCreated).is_err());
        assert!(transition(WorkflowState::CreatingAssistant, WorkflowEvent::NumberPurchased).is_err());
        assert!(transition(WorkflowState::Associating, WorkflowEvent::Begin).is_err());
        assert!(transition(WorkflowState::Complete, WorkflowEvent::Begin).is_err());
    }

    #[test]
    fn test_error_allows_full_rerun_only() {
        assert_eq!(
            transition(WorkflowState::Error, WorkflowEvent::Begin),
            Ok(WorkflowState::CreatingAssistant)
        );
        assert!(transition(WorkflowState::Error, WorkflowEvent::NumberPurchased).is_err());
    }

    #[test]
    fn test_reset_refused_mid_flight() {
        assert_eq!(
            transition(WorkflowState::Complete, WorkflowEvent::Reset),
            Ok(WorkflowState::Idle)
        );
        let err = transition(WorkflowState::PurchasingNumber, WorkflowEvent::Reset).unwrap_err();
        assert_eq!(err.from, WorkflowState::PurchasingNumber);
    }

    #[test]
    fn test_step_status_while_purchasing() {
        let current = WorkflowState::PurchasingNumber;
        assert_eq!(step_status(current, WorkflowState::CreatingAssistant), StepStatus::Completed);
        assert_eq!(step_status(current, WorkflowState::PurchasingNumber), StepStatus::Active);
        assert_eq!(step_status(current, WorkflowState::Associating), StepStatus::Pending);
        assert_eq!(step_status(current, WorkflowState::Complete), StepStatus::Pending);
    }

    #[test]
    fn test_step_status_complete_marks_last_step_active() {
        let current = WorkflowState::Complete;
        assert_eq!(step_status(current, WorkflowState::Associating), StepStatus::Completed);
        assert_eq!(step_status(current, WorkflowState::Complete), StepStatus::Active);
    }

    #[test]
    fn test_step_status_outside_list_is_pending() {
        for step in ORDERED_STEPS {
            assert_eq!(step_status(WorkflowState::Idle, step), StepStatus::Pending);
            assert_eq!(step_status(WorkflowState::Error, step), StepStatus::Pending);
        }
        assert_eq!(
            step_status(WorkflowState::Associating, WorkflowState::Idle),
            StepStatus::Pending
        );
    }
}
