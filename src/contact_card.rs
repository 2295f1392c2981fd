//! vCard export for a provisioned agent
//!
//! Lets the user save the new phone number straight into their contacts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::provisioning::ProvisioningResult;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("slug pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub name: String,
    pub phone_number: String,
    pub assistant_id: String,
    pub revision: DateTime<Utc>,
}

impl ContactCard {
    pub fn from_result(result: &ProvisioningResult) -> Self {
        Self {
            name: result.agent_name.clone(),
            phone_number: result.phone_number.clone(),
            assistant_id: result.assistant_id.clone(),
            revision: Utc::now(),
        }
    }

    pub fn with_revision(mut self, revision: DateTime<Utc>) -> Self {
        self.revision = revision;
        self
    }

    /// vCard 3.0 text with CRLF line endings
    pub fn render(&self) -> String {
        let name = escape_text(&self.name);
        let lines = [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{name}"),
            format!("N:;{name};;;"),
            "ORG:AI Voice Agent".to_string(),
            format!("TEL;TYPE=VOICE:{}", self.phone_number),
            format!("NOTE:{}", escape_text(&format!("Assistant ID: {}", self.assistant_id))),
            format!("REV:{}", self.revision.format("%Y%m%dT%H%M%SZ")),
            "END:VCARD".to_string(),
        ];

        let mut card = lines.join("\r\n");
        card.push_str("\r\n");
        card
    }

    /// `coffee-bot.vcf` for "Coffee Bot"
    pub fn file_name(&self) -> String {
        let slug = NON_SLUG_CHARS
            .replace_all(&self.name.to_lowercase(), "-")
            .trim_matches('-')
            .to_string();
        if slug.is_empty() {
            "agent.vcf".to_string()
        } else {
            format!("{slug}.vcf")
        }
    }

    /// Write the card to `path`, or to an auto-named file when `path` is a directory
    pub async fn export(&self, path: &Path) -> Result<PathBuf> {
        let target = if tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            path.join(self.file_name())
        } else {
            path.to_path_buf()
        };

        tokio::fs::write(&target, self.render())
            .await
            .with_context(|| format!("Failed to write contact card to {}", target.display()))?;
        tracing::info!(path = %target.display(), "Contact card exported");
        Ok(target)
    }
}

// RFC 2426 text escaping
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}
