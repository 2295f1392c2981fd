//! Remote voice-agent platform abstractions
//!
//! The provisioning controller only sees the `RemoteResourceClient` trait, so
//! the HTTP transport can be swapped for a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod errors;

pub use client::HttpResourceClient;
pub use errors::{RemoteError, UNEXPECTED_ERROR_MESSAGE};

/// Bearer token for the platform API. Never printed in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSpec {
    pub name: String,
    pub model: ModelSpec,
    pub voice: VoiceSpec,
    pub first_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub provider: String,
    pub model: String,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSpec {
    pub provider: String,
    pub voice_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberSpec {
    pub provider: String,
    pub number_desired_area_code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedAssistant {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchasedNumber {
    pub id: String,
    pub number: String,
}

/// Operations the provisioning workflow needs from the platform
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RemoteResourceClient: Send + Sync {
    /// Create an assistant and return its identifier
    async fn create_assistant(
        &self,
        credential: &Credential,
        spec: &AssistantSpec,
    ) -> Result<CreatedAssistant, RemoteError>;

    /// Buy a phone number
    async fn purchase_number(
        &self,
        credential: &Credential,
        spec: &PhoneNumberSpec,
    ) -> Result<PurchasedNumber, RemoteError>;

    /// Route inbound calls on `phone_number_id` to `assistant_id`
    async fn associate_number(
        &self,
        credential: &Credential,
        phone_number_id: &str,
        assistant_id: &str,
    ) -> Result<(), RemoteError>;
}
