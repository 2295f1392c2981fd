use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "voice-provisioner")]
#[command(about = "Create a phone-reachable AI voice agent in one command")]
#[command(long_about = "voice-provisioner creates an assistant on the voice-agent platform, buys a phone \
                       number for it and links the two, so the agent answers calls right away. \
                       Get started with 'voice-provisioner provision --description \"...\"'.")]
pub struct Cli {
    /// Extra configuration file layered over voice-provisioner.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the assistant, buy a phone number and link them
    Provision {
        /// What the agent should do on calls
        #[arg(long, short = 'd', help = "Describe what the agent should do on calls")]
        description: String,
        /// Display name for the agent
        #[arg(long, short = 'n', help = "Agent name (defaults to the configured fallback name)")]
        name: Option<String>,
        /// Platform API key
        #[arg(long, help = "API key (falls back to api.credential, then VOICE_API_KEY)")]
        credential: Option<String>,
        /// Write a contact card for the new number
        #[arg(long, value_name = "PATH", help = "Write a vCard to this file or directory on success")]
        vcard: Option<PathBuf>,
    },
    /// Show the request bodies a provision run would send, without calling the platform
    Preview {
        #[arg(long, short = 'd', help = "Describe what the agent should do on calls")]
        description: String,
        #[arg(long, short = 'n', help = "Agent name (defaults to the configured fallback name)")]
        name: Option<String>,
    },
    /// Write a configuration file with the default settings
    Init {
        #[arg(long, value_name = "PATH", help = "Where to write the file (default: voice-provisioner.toml)")]
        path: Option<PathBuf>,
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },
}
