use anyhow::Result;

use crate::config::ProvisionerConfig;
use crate::provisioning::{ProvisioningRequest, ValidationError};
use crate::remote::Credential;

pub struct PreviewCommand {
    pub description: String,
    pub name: Option<String>,
}

impl PreviewCommand {
    pub fn new(description: String, name: Option<String>) -> Self {
        Self { description, name }
    }

    pub async fn execute(&self, config: &ProvisionerConfig) -> Result<()> {
        // No platform call is made, so no credential is needed
        let request = ProvisioningRequest::new(
            self.description.clone(),
            self.name.clone(),
            Credential::new(""),
        );
        if request.description().is_empty() {
            return Err(ValidationError::MissingDescription.into());
        }

        let assistant = config.agent.assistant_spec(&request);
        let number = config.agent.phone_number_spec(&request);

        println!("👁️  Preview for \"{}\" (nothing is created)", assistant.name);
        println!();
        println!("1. Create assistant → POST {}/assistant", config.api.base_url);
        println!("{}", serde_json::to_string_pretty(&assistant)?);
        println!();
        println!("2. Purchase number → POST {}/phone-number", config.api.base_url);
        println!("{}", serde_json::to_string_pretty(&number)?);
        println!();
        println!("3. Link number → PATCH {}/phone-number/<new number id>", config.api.base_url);
        println!("{}", serde_json::json!({ "assistantId": "<new assistant id>" }));
        Ok(())
    }
}
