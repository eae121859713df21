use std::path::PathBuf;

use aicc_config::Feature;
use clap::{Parser, Subcommand, ValueEnum};

/// aicc: terminal client for the AI Command Center agent backend.
#[derive(Parser, Debug)]
#[command(name = "aicc", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Backend base URL for this run only.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session.
    Chat {
        /// Route every message to this agent instead of letting the backend decide.
        #[arg(short, long)]
        agent: Option<String>,
    },
    /// Send a single message and print the reply.
    Send {
        message: String,
        #[arg(short, long)]
        agent: Option<String>,
        /// Continue an existing conversation.
        #[arg(short, long)]
        conversation: Option<String>,
    },
    /// List deployed agents.
    Agents,
    /// List conversations, newest first.
    Conversations {
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        channel: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        skip: u64,
    },
    /// Show one conversation with its messages.
    Conversation { id: String },
    /// Print the execution graph of an agent.
    Graph {
        agent: String,
        /// Highlight the node this step name maps to.
        #[arg(long)]
        step: Option<String>,
    },
    /// Inspect or change persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    SetUrl {
        url: String,
    },
    SetModel {
        model: String,
    },
    /// Toggle a feature (streaming, token-costs, debug).
    Feature {
        #[arg(value_parser = parse_feature)]
        name: Feature,
        state: Toggle,
    },
    /// Restore defaults and delete the settings file.
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

fn parse_feature(raw: &str) -> Result<Feature, String> {
    raw.parse()
}

pub fn parse() -> Args {
    Args::parse()
}
