use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;

use super::format_step_board;
use crate::config::ProvisionerConfig;
use crate::contact_card::ContactCard;
use crate::observability::remote_metrics;
use crate::provisioning::{
    ProvisioningController, ProvisioningError, ProvisioningRequest, ProvisioningResult,
    WorkflowState,
};
use crate::remote::{Credential, HttpResourceClient};

pub struct ProvisionCommand {
    pub description: String,
    pub name: Option<String>,
    pub credential: Option<String>,
    pub vcard: Option<PathBuf>,
}

impl ProvisionCommand {
    pub fn new(description: String, name: Option<String>) -> Self {
        Self {
            description,
            name,
            credential: None,
            vcard: None,
        }
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_vcard(mut self, vcard: Option<PathBuf>) -> Self {
        self.vcard = vcard;
        self
    }

    pub async fn execute(&self, config: &ProvisionerConfig) -> Result<()> {
        let credential = self
            .credential
            .clone()
            .or_else(|| config.credential())
            .unwrap_or_default();
        let request = ProvisioningRequest::new(
            self.description.clone(),
            self.name.clone(),
            Credential::new(credential),
        );

        let client = HttpResourceClient::new(&config.api)?;
        let mut controller = ProvisioningController::new(Arc::new(client), config.agent.clone());

        println!(
            "🎙️  Provisioning voice agent \"{}\"",
            config.agent.agent_name(&request)
        );
        println!();

        let progress = spawn_progress_printer(controller.subscribe_transitions());
        let outcome = controller.submit(request).await;
        let snapshot = controller.snapshot();
        // Dropping the controller closes the channel and ends the printer
        drop(controller);
        let _ = progress.await;
        remote_metrics().log_stats();

        match outcome {
            Ok(result) => {
                print_result(&result);
                // Export failure is non-fatal once the agent is live
                if let Err(err) = self.export_contact_card(config, &result).await {
                    warn!(error = %err, "Contact card export failed");
                    println!("⚠️  Could not save the contact card: {err:#}");
                }
                Ok(())
            }
            Err(ProvisioningError::Validation(err)) => Err(anyhow!(err)),
            Err(err) => {
                let message = snapshot
                    .error_message
                    .unwrap_or_else(|| err.user_message());
                println!();
                println!("❌ {message}");
                if let Some(orphaned) = err.orphaned_resources() {
                    println!();
                    println!("⚠️  These resources were created but are not linked:");
                    if let Some(id) = &orphaned.assistant_id {
                        println!("   → Assistant: {id}");
                    }
                    if let Some(id) = &orphaned.phone_number_id {
                        println!("   → Phone number: {id}");
                    }
                    println!("   Remove them in the platform dashboard if you do not need them.");
                }
                Err(anyhow!(err))
            }
        }
    }

    async fn export_contact_card(
        &self,
        config: &ProvisionerConfig,
        result: &ProvisioningResult,
    ) -> Result<()> {
        let target = match (&self.vcard, config.export.auto_vcard) {
            (Some(path), _) => path.clone(),
            (None, true) => config.export.directory.clone(),
            (None, false) => return Ok(()),
        };

        let written = ContactCard::from_result(result).export(&target).await?;
        println!("📇 Contact card saved to {}", written.display());
        Ok(())
    }
}

fn spawn_progress_printer(mut transitions: broadcast::Receiver<WorkflowState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match transitions.recv().await {
                // Failures are reported once the attempt returns
                Ok(WorkflowState::Error) => {}
                Ok(state) => println!("   {}", format_step_board(state)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Progress printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn print_result(result: &ProvisioningResult) {
    println!();
    println!("✅ {} is live!", result.agent_name);
    println!("  📞 Phone number: {}", result.phone_number);
    println!("  🤖 Assistant ID: {}", result.assistant_id);
    println!("  🔗 Phone number ID: {}", result.phone_number_id);
    println!();
    println!("🚀 Call {} to talk to your agent.", result.phone_number);
}
