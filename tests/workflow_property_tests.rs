//! Property-based tests for the workflow transition table, the step list
//! and platform error message extraction

use proptest::prelude::*;
use voice_provisioner::provisioning::{
    step_status, transition, ProvisioningRequest, StepStatus, ValidationError, WorkflowEvent,
    WorkflowState, ORDERED_STEPS,
};
use voice_provisioner::remote::{Credential, RemoteError};

fn state_strategy() -> impl Strategy<Value = WorkflowState> {
    prop_oneof![
        Just(WorkflowState::Idle),
        Just(WorkflowState::CreatingAssistant),
        Just(WorkflowState::PurchasingNumber),
        Just(WorkflowState::Associating),
        Just(WorkflowState::Complete),
        Just(WorkflowState::Error),
    ]
}

fn event_strategy() -> impl Strategy<Value = WorkflowEvent> {
    prop_oneof![
        Just(WorkflowEvent::Begin),
        Just(WorkflowEvent::AssistantCreated),
        Just(WorkflowEvent::NumberPurchased),
        Just(WorkflowEvent::NumberAssociated),
        Just(WorkflowEvent::Fail),
        Just(WorkflowEvent::Reset),
    ]
}

proptest! {
    #[test]
    fn prop_complete_requires_every_step_in_order(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let mut state = WorkflowState::Idle;
        let mut forward_steps_since_begin = 0;

        for event in events {
            let Ok(next) = transition(state, event) else {
                continue;
            };
            match event {
                WorkflowEvent::Begin => forward_steps_since_begin = 0,
                WorkflowEvent::AssistantCreated
                | WorkflowEvent::NumberPurchased
                | WorkflowEvent::NumberAssociated => forward_steps_since_begin += 1,
                WorkflowEvent::Fail | WorkflowEvent::Reset => {}
            }
            if next == WorkflowState::Complete {
                prop_assert_eq!(forward_steps_since_begin, 3);
            }
            state = next;
        }
    }

    #[test]
    fn prop_only_idle_and_error_start_an_attempt(state in state_strategy()) {
        let started = transition(state, WorkflowEvent::Begin);
        prop_assert_eq!(started.is_ok(), state.accepts_submission());
        if let Ok(next) = started {
            prop_assert_eq!(next, WorkflowState::CreatingAssistant);
        }
    }

    #[test]
    fn prop_in_progress_states_cannot_reset(state in state_strategy()) {
        prop_assert_eq!(
            transition(state, WorkflowEvent::Reset).is_err(),
            state.is_in_progress()
        );
    }

    #[test]
    fn prop_step_list_is_completed_prefix_then_pending(current in state_strategy()) {
        let statuses: Vec<StepStatus> = ORDERED_STEPS
            .iter()
            .map(|step| step_status(current, *step))
            .collect();

        let active = statuses.iter().filter(|s| **s == StepStatus::Active).count();
        if ORDERED_STEPS.contains(&current) {
            prop_assert_eq!(active, 1);
        } else {
            prop_assert!(statuses.iter().all(|s| *s == StepStatus::Pending));
        }

        // No completed step may follow an active or pending one
        let first_not_completed = statuses
            .iter()
            .position(|s| *s != StepStatus::Completed)
            .unwrap_or(statuses.len());
        prop_assert!(statuses[first_not_completed..]
            .iter()
            .all(|s| *s != StepStatus::Completed));
    }

    #[test]
    fn prop_error_message_is_never_blank(status in 400u16..600, body in ".*") {
        let err = RemoteError::from_response(status, &body);
        prop_assert!(!err.user_message().trim().is_empty());
        prop_assert_eq!(err.status(), Some(status));
    }

    #[test]
    fn prop_server_message_is_used_when_present(
        status in 400u16..600,
        message in "[A-Za-z][A-Za-z0-9 ]{0,40}[A-Za-z0-9]"
    ) {
        let body = serde_json::json!({ "message": message }).to_string();
        let err = RemoteError::from_response(status, &body);
        prop_assert_eq!(err.user_message(), message);
    }

    #[test]
    fn prop_blank_description_is_rejected_first(
        description in "[ \t\n]{0,8}",
        credential in "[ \t]{0,4}|sk_[a-z0-9]{4,16}"
    ) {
        let request = ProvisioningRequest::new(description, None, Credential::new(credential));
        prop_assert_eq!(request.validate(), Err(ValidationError::MissingDescription));
    }

    #[test]
    fn prop_blank_credential_is_rejected(
        description in "[A-Za-z][A-Za-z ]{0,30}",
        credential in "[ \t\n]{0,8}"
    ) {
        let request = ProvisioningRequest::new(description, None, Credential::new(credential));
        prop_assert_eq!(request.validate(), Err(ValidationError::MissingCredential));
    }
}
