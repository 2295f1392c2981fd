use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn, Instrument};

use super::errors::{CreatedResources, ProvisioningError};
use super::prompt::AgentDefaults;
use super::state_machine::{transition, WorkflowEvent};
use super::types::{
    ProvisioningRequest, ProvisioningResult, ProvisioningStep, WorkflowSnapshot, WorkflowState,
};
use crate::remote::RemoteResourceClient;
use crate::telemetry::{create_attempt_span, generate_correlation_id};

// Transitions per attempt never exceed a handful
const TRANSITION_BUFFER: usize = 16;

/// Drives create-assistant, purchase-number and associate-number in order.
///
/// The controller is the only writer of the workflow snapshot. Observers get
/// a `watch` receiver from [`subscribe`](Self::subscribe) for the latest
/// snapshot, or every individual state change from
/// [`subscribe_transitions`](Self::subscribe_transitions). Both are updated
/// before the matching remote call is issued.
pub struct ProvisioningController {
    client: Arc<dyn RemoteResourceClient>,
    defaults: AgentDefaults,
    snapshot: watch::Sender<WorkflowSnapshot>,
    transitions: broadcast::Sender<WorkflowState>,
}

impl std::fmt::Debug for ProvisioningController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningController")
            .field("defaults", &self.defaults)
            .field("snapshot", &*self.snapshot.borrow())
            .finish_non_exhaustive()
    }
}

impl ProvisioningController {
    pub fn new(client: Arc<dyn RemoteResourceClient>, defaults: AgentDefaults) -> Self {
        let (snapshot, _) = watch::channel(WorkflowSnapshot::default());
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);
        Self {
            client,
            defaults,
            snapshot,
            transitions,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshot.subscribe()
    }

    /// Every state entered from now on, in order. The stream ends when the
    /// controller is dropped.
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<WorkflowState> {
        self.transitions.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> WorkflowState {
        self.snapshot.borrow().state
    }

    pub fn defaults(&self) -> &AgentDefaults {
        &self.defaults
    }

    /// Run one full provisioning attempt.
    ///
    /// Invalid input is rejected before any state change. Once the attempt
    /// starts, every failure moves the workflow to `error` with a message
    /// for the user; nothing already created on the platform is removed.
    pub async fn submit(
        &mut self,
        request: ProvisioningRequest,
    ) -> Result<ProvisioningResult, ProvisioningError> {
        let current = self.state();
        if !current.accepts_submission() {
            return Err(ProvisioningError::Busy { state: current });
        }
        request.validate()?;

        let attempt_id = generate_correlation_id();
        let agent_name = self.defaults.agent_name(&request).to_string();
        let span = create_attempt_span(&attempt_id, &agent_name);

        let outcome: Result<ProvisioningResult, ProvisioningError> = async move {
            self.begin_attempt(&attempt_id)?;

            match self.run_steps(&request, &agent_name).await {
                Ok(result) => {
                    self.apply(WorkflowEvent::NumberAssociated, |snapshot| {
                        snapshot.result = Some(result.clone());
                    })?;
                    info!(
                        assistant_id = %result.assistant_id,
                        phone_number_id = %result.phone_number_id,
                        phone_number = %result.phone_number,
                        "Provisioning complete"
                    );
                    Ok(result)
                }
                Err(err) => {
                    self.fail(&err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await;
        outcome
    }

    /// Return to `idle` after a finished attempt, clearing error and result
    pub fn reset(&mut self) -> Result<(), ProvisioningError> {
        let current = self.state();
        if current.is_in_progress() {
            return Err(ProvisioningError::Busy { state: current });
        }
        self.apply(WorkflowEvent::Reset, |snapshot| {
            snapshot.error_message = None;
            snapshot.result = None;
            snapshot.attempt_id = None;
        })
    }

    fn begin_attempt(&mut self, attempt_id: &str) -> Result<(), ProvisioningError> {
        self.apply(WorkflowEvent::Begin, |snapshot| {
            snapshot.error_message = None;
            snapshot.result = None;
            snapshot.attempt_id = Some(attempt_id.to_string());
        })
    }

    async fn run_steps(
        &mut self,
        request: &ProvisioningRequest,
        agent_name: &str,
    ) -> Result<ProvisioningResult, ProvisioningError> {
        let credential = request.credential();
        let mut created = CreatedResources::default();

        let assistant = self
            .client
            .create_assistant(credential, &self.defaults.assistant_spec(request))
            .await
            .map_err(|source| ProvisioningError::Remote {
                step: ProvisioningStep::CreateAssistant,
                source,
                created: created.clone(),
            })?;
        info!(assistant_id = %assistant.id, "Assistant created");
        created.assistant_id = Some(assistant.id.clone());
        self.apply(WorkflowEvent::AssistantCreated, |_| {})?;

        let number = self
            .client
            .purchase_number(credential, &self.defaults.phone_number_spec(request))
            .await
            .map_err(|source| ProvisioningError::Remote {
                step: ProvisioningStep::PurchaseNumber,
                source,
                created: created.clone(),
            })?;
        info!(phone_number_id = %number.id, phone_number = %number.number, "Phone number purchased");
        created.phone_number_id = Some(number.id.clone());
        self.apply(WorkflowEvent::NumberPurchased, |_| {})?;

        self.client
            .associate_number(credential, &number.id, &assistant.id)
            .await
            .map_err(|source| ProvisioningError::Remote {
                step: ProvisioningStep::AssociateNumber,
                source,
                created: created.clone(),
            })?;

        Ok(ProvisioningResult {
            assistant_id: assistant.id,
            phone_number_id: number.id,
            phone_number: number.number,
            agent_name: agent_name.to_string(),
        })
    }

    fn fail(&mut self, err: &ProvisioningError) {
        let message = err.user_message();
        error!(error = %err, "Provisioning attempt failed");

        if let Some(orphaned) = err.orphaned_resources() {
            warn!(
                assistant_id = ?orphaned.assistant_id,
                phone_number_id = ?orphaned.phone_number_id,
                "Attempt left resources on the platform that are not linked"
            );
        }

        let applied = self.apply(WorkflowEvent::Fail, |snapshot| {
            snapshot.error_message = Some(message.clone());
            snapshot.result = None;
        });
        if let Err(transition_err) = applied {
            // Only reachable if the failure happened outside a step
            warn!(error = %transition_err, "Forcing workflow into error state");
            self.snapshot.send_modify(|snapshot| {
                snapshot.state = WorkflowState::Error;
                snapshot.error_message = Some(message);
                snapshot.result = None;
                snapshot.updated_at = Utc::now();
            });
            self.publish_transition(WorkflowState::Error);
        }
    }

    /// Apply `event` and `update` to the snapshot in one step
    fn apply(
        &mut self,
        event: WorkflowEvent,
        update: impl FnOnce(&mut WorkflowSnapshot),
    ) -> Result<(), ProvisioningError> {
        let from = self.state();
        let to = transition(from, event)?;

        self.snapshot.send_modify(|snapshot| {
            snapshot.state = to;
            snapshot.updated_at = Utc::now();
            update(snapshot);
        });
        self.publish_transition(to);
        info!(from = %from, to = %to, event = ?event, "Workflow state transition");
        Ok(())
    }

    fn publish_transition(&self, state: WorkflowState) {
        // Nobody listening is fine
        let _ = self.transitions.send(state);
    }
}
