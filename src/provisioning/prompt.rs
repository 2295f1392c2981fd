//! Assistant and phone number synthesis
//!
//! Turns a `ProvisioningRequest` into the request bodies for the first two
//! platform calls. Model, voice and area code come from `AgentDefaults`.

use serde::{Deserialize, Serialize};

use super::types::ProvisioningRequest;
use crate::remote::{AssistantSpec, ModelSpec, PhoneNumberSpec, PromptMessage, VoiceSpec};

pub const FALLBACK_AGENT_NAME: &str = "AI Assistant";

const GUIDELINES: &str = "\
Guidelines:
- Keep answers short and conversational; the caller is listening, not reading.
- Ask one question at a time and confirm important details back to the caller.
- If you do not know something, say so instead of guessing.
- Stay polite and on topic, and end the call gracefully once the caller is done.";

/// Fixed model, voice and number settings for every new agent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentDefaults {
    /// Name used when the user gives none
    pub fallback_name: String,
    pub model_provider: String,
    pub model: String,
    pub voice_provider: String,
    pub voice_id: String,
    pub number_provider: String,
    /// Area code requested for every purchased number
    pub area_code: String,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            fallback_name: FALLBACK_AGENT_NAME.to_string(),
            model_provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            voice_provider: "vapi".to_string(),
            voice_id: "Elliot".to_string(),
            number_provider: "vapi".to_string(),
            area_code: "415".to_string(),
        }
    }
}

pub fn system_prompt(agent_name: &str, description: &str) -> String {
    format!(
        "You are {agent_name}, a voice assistant answering phone calls.\n\n\
         {description}\n\n\
         {GUIDELINES}"
    )
}

pub fn greeting(agent_name: &str) -> String {
    format!("Hello! This is {agent_name}. How can I help you today?")
}

pub fn phone_number_name(agent_name: &str) -> String {
    format!("{agent_name} phone line")
}

impl AgentDefaults {
    /// The effective agent name for `request`
    pub fn agent_name<'a>(&'a self, request: &'a ProvisioningRequest) -> &'a str {
        request.agent_name(&self.fallback_name)
    }

    pub fn assistant_spec(&self, request: &ProvisioningRequest) -> AssistantSpec {
        let agent_name = self.agent_name(request);
        AssistantSpec {
            name: agent_name.to_string(),
            model: ModelSpec {
                provider: self.model_provider.clone(),
                model: self.model.clone(),
                messages: vec![PromptMessage {
                    role: "system".to_string(),
                    content: system_prompt(agent_name, request.description()),
                }],
            },
            voice: VoiceSpec {
                provider: self.voice_provider.clone(),
                voice_id: self.voice_id.clone(),
            },
            first_message: greeting(agent_name),
        }
    }

    pub fn phone_number_spec(&self, request: &ProvisioningRequest) -> PhoneNumberSpec {
        PhoneNumberSpec {
            provider: self.number_provider.clone(),
            number_desired_area_code: self.area_code.clone(),
            name: phone_number_name(self.agent_name(request)),
        }
    }
}
