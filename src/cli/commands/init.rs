use anyhow::Result;
use std::path::PathBuf;

use crate::config::{ProvisionerConfig, DEFAULT_CONFIG_FILE};

/// Writes the default configuration; never overwrites without `--force`
pub struct InitCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitCommand {
    pub fn new(path: Option<PathBuf>, force: bool) -> Self {
        Self {
            path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            force,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite it.",
                self.path.display()
            );
        }

        ProvisionerConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote default configuration to {}", self.path.display());
        println!();
        println!("🔧 NEXT STEPS:");
        println!("   → Adjust [agent] to change model, voice or area code");
        println!("   → Export VOICE_API_KEY=<your key> (keep keys out of the file)");
        println!("   → Run: voice-provisioner provision -d \"What your agent does\"");
        Ok(())
    }
}
