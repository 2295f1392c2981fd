use crate::provisioning::{step_status, StepStatus, WorkflowState, ORDERED_STEPS};

pub mod init;
pub mod preview;
pub mod provision;

pub use init::InitCommand;
pub use preview::PreviewCommand;
pub use provision::ProvisionCommand;

pub async fn show_how_to_get_started() -> anyhow::Result<()> {
    println!("🎙️  voice-provisioner - AI voice agents with a real phone number");
    println!();
    println!("To get started:");
    println!("  ⚙️  voice-provisioner init                          # Write a config file");
    println!("  👁️  voice-provisioner preview -d \"...\"              # See what would be created");
    println!("  🚀 voice-provisioner provision -d \"...\" -n \"Name\"  # Create the agent");
    println!();
    println!("💡 Set VOICE_API_KEY or pass --credential with your platform API key.");
    Ok(())
}

fn step_label(step: WorkflowState) -> &'static str {
    match step {
        WorkflowState::CreatingAssistant => "Create assistant",
        WorkflowState::PurchasingNumber => "Purchase number",
        WorkflowState::Associating => "Link number",
        WorkflowState::Complete => "Ready",
        WorkflowState::Idle | WorkflowState::Error => "",
    }
}

/// One-line progress indicator, e.g. `✅ Create assistant · 🔄 Purchase number · ⏳ Link number · ⏳ Ready`
pub fn format_step_board(current: WorkflowState) -> String {
    ORDERED_STEPS
        .iter()
        .map(|step| {
            let icon = match step_status(current, *step) {
                StepStatus::Completed => "✅",
                StepStatus::Active if *step == WorkflowState::Complete => "✅",
                StepStatus::Active => "🔄",
                StepStatus::Pending => "⏳",
            };
            format!("{icon} {}", step_label(*step))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}
