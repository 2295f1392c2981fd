use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use crate::remote::Credential;

/// Progress of a provisioning attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    CreatingAssistant,
    PurchasingNumber,
    Associating,
    Complete,
    Error,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::CreatingAssistant => "creating_assistant",
            WorkflowState::PurchasingNumber => "purchasing_number",
            WorkflowState::Associating => "associating",
            WorkflowState::Complete => "complete",
            WorkflowState::Error => "error",
        }
    }

    /// A remote call is pending in this state
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            WorkflowState::CreatingAssistant
                | WorkflowState::PurchasingNumber
                | WorkflowState::Associating
        )
    }

    /// Input is enabled only while idle or after a failure
    pub fn accepts_submission(&self) -> bool {
        matches!(self, WorkflowState::Idle | WorkflowState::Error)
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display status of one entry in the step list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// The remote call a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStep {
    CreateAssistant,
    PurchaseNumber,
    AssociateNumber,
}

impl std::fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProvisioningStep::CreateAssistant => "create assistant",
            ProvisioningStep::PurchaseNumber => "purchase phone number",
            ProvisioningStep::AssociateNumber => "link phone number",
        };
        f.write_str(label)
    }
}

/// Immutable snapshot of what the user submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    description: String,
    display_name: Option<String>,
    credential: Credential,
}

impl ProvisioningRequest {
    pub fn new(
        description: impl Into<String>,
        display_name: Option<String>,
        credential: Credential,
    ) -> Self {
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        Self {
            description: description.into().trim().to_string(),
            display_name,
            credential,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.credential.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Display name, or the fallback when none was given
    pub fn agent_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name().unwrap_or(fallback)
    }
}

/// Outcome of a fully successful attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub assistant_id: String,
    pub phone_number_id: String,
    pub phone_number: String,
    pub agent_name: String,
}

/// Everything an observer needs to render progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub error_message: Option<String>,
    pub result: Option<ProvisioningResult>,
    pub attempt_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self {
            state: WorkflowState::Idle,
            error_message: None,
            result: None,
            attempt_id: None,
            updated_at: Utc::now(),
        }
    }
}
