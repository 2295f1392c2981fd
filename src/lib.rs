// voice-provisioner library
// Exposes the provisioning workflow for the CLI and for integration tests

pub mod cli;
pub mod config;
pub mod contact_card;
pub mod observability;
pub mod provisioning;
pub mod remote;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{ApiConfig, ProvisionerConfig, RateLimitConfig};
pub use contact_card::ContactCard;
pub use observability::{remote_metrics, RemoteApiMetrics, RemoteOperation};
pub use provisioning::{
    AgentDefaults, ProvisioningController, ProvisioningError, ProvisioningRequest,
    ProvisioningResult, ValidationError, WorkflowSnapshot, WorkflowState,
};
pub use remote::{Credential, HttpResourceClient, RemoteError, RemoteResourceClient};
pub use telemetry::{create_attempt_span, generate_correlation_id, init_telemetry};
