use thiserror::Error;

use super::state_machine::TransitionError;
use super::types::{ProvisioningStep, WorkflowState};
use crate::remote::{RemoteError, UNEXPECTED_ERROR_MESSAGE};

/// Rejected input, caught before any remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please describe what the agent should do")]
    MissingDescription,
    #[error("Please provide an API key")]
    MissingCredential,
}

/// Remote resources that exist because earlier steps succeeded.
/// They are reported, never cleaned up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedResources {
    pub assistant_id: Option<String>,
    pub phone_number_id: Option<String>,
}

impl CreatedResources {
    pub fn is_empty(&self) -> bool {
        self.assistant_id.is_none() && self.phone_number_id.is_none()
    }
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to {step}: {source}")]
    Remote {
        step: ProvisioningStep,
        #[source]
        source: RemoteError,
        created: CreatedResources,
    },

    #[error("A provisioning attempt is already {state}; wait for it to finish")]
    Busy { state: WorkflowState },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ProvisioningError {
    /// The message stored in the workflow snapshot
    pub fn user_message(&self) -> String {
        match self {
            ProvisioningError::Validation(err) => err.to_string(),
            ProvisioningError::Remote { source, .. } => source.user_message(),
            ProvisioningError::Busy { .. } => self.to_string(),
            ProvisioningError::Transition(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// Resources left behind by a mid-sequence failure
    pub fn orphaned_resources(&self) -> Option<&CreatedResources> {
        match self {
            ProvisioningError::Remote { created, .. } if !created.is_empty() => Some(created),
            _ => None,
        }
    }
}
