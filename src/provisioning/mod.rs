// Provisioning workflow: assistant → phone number → association
//
// Strictly sequential, no retries, no rollback of partially created resources.

pub mod controller;
pub mod errors;
pub mod prompt;
pub mod state_machine;
pub mod types;

pub use controller::ProvisioningController;
pub use errors::{CreatedResources, ProvisioningError, ValidationError};
pub use prompt::{AgentDefaults, FALLBACK_AGENT_NAME};
pub use state_machine::{step_status, transition, TransitionError, WorkflowEvent, ORDERED_STEPS};
pub use types::{
    ProvisioningRequest, ProvisioningResult, ProvisioningStep, StepStatus, WorkflowSnapshot,
    WorkflowState,
};
