//! Interactive chat loop over a [`ChatSession`].

use std::io::Write;
use std::sync::Arc;

use aicc_chat::{graph_for_agent, ChatSession, Role, SessionPhase, SkipReason, SubmitOutcome};
use aicc_common::CommandCenterError;
use aicc_config::{CommandCenterConfig, Feature, SettingsStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::render;

const HELP: &str = "\
commands:
  /clear          start a new conversation
  /agent ID|auto  route to an agent, or let the backend decide
  /steps          show the step trace of the last exchange
  /graph          show the agent graph with the last step highlighted
  /usage          token and latency totals
  /debug on|off   print step traces after every reply
  /quit           exit";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Message(String),
    Clear,
    /// `None` switches back to backend routing.
    Agent(Option<String>),
    Steps,
    Graph,
    Usage,
    Debug(bool),
    Help,
    Quit,
    Invalid(String),
    Empty,
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Message(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (cmd, arg) {
        ("clear", None) => ReplCommand::Clear,
        ("agent", Some("auto")) => ReplCommand::Agent(None),
        ("agent", Some(id)) => ReplCommand::Agent(Some(id.to_string())),
        ("steps", None) => ReplCommand::Steps,
        ("graph", None) => ReplCommand::Graph,
        ("usage", None) => ReplCommand::Usage,
        ("debug", Some("on")) => ReplCommand::Debug(true),
        ("debug", Some("off")) => ReplCommand::Debug(false),
        ("help", None) => ReplCommand::Help,
        ("quit" | "exit", None) => ReplCommand::Quit,
        _ => ReplCommand::Invalid(line.to_string()),
    }
}

fn prompt(agent: Option<&str>) {
    print!("[{}] > ", agent.unwrap_or("auto"));
    let _ = std::io::stdout().flush();
}

/// Agent for `/graph`: the pinned one, else whoever answered last.
fn graph_agent(session: &ChatSession, pinned: Option<&str>) -> String {
    if let Some(agent) = pinned {
        return agent.to_string();
    }
    session
        .snapshot()
        .turns
        .iter()
        .rev()
        .filter(|t| t.role == Role::Assistant)
        .find_map(|t| t.agent_id.clone())
        .unwrap_or_else(|| "doc".to_string())
}

pub async fn run(
    session: ChatSession,
    store: &SettingsStore,
    mut agent: Option<String>,
) -> Result<(), CommandCenterError> {
    let mut settings: watch::Receiver<Arc<CommandCenterConfig>> = store.subscribe();

    session.subscribe(|snap| {
        if snap.phase() == SessionPhase::AwaitingResponse {
            eprintln!("  ... waiting for agent");
        }
    });

    println!("AI Command Center chat. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(agent.as_deref());

    while let Some(line) = lines.next_line().await? {
        if settings.has_changed().unwrap_or(false) {
            let features = settings.borrow_and_update().features.clone();
            debug!(?features, "settings changed");
        }

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Invalid(raw) => println!("unknown command: {raw} (try /help)"),
            ReplCommand::Message(text) => {
                let outcome = session.submit(text, agent.as_deref()).await;
                let config = settings.borrow().clone();
                print_outcome(&session, &outcome, &config);
            }
            ReplCommand::Clear => {
                if session.clear() {
                    println!("conversation cleared");
                } else {
                    println!("cannot clear while a request is in flight");
                }
            }
            ReplCommand::Agent(next) => {
                match &next {
                    Some(id) => println!("routing to {id}"),
                    None => println!("routing: auto"),
                }
                agent = next;
            }
            ReplCommand::Steps => println!("{}", render::steps(&session.snapshot().current_steps)),
            ReplCommand::Graph => {
                let graph = graph_for_agent(&graph_agent(&session, agent.as_deref()));
                let snap = session.snapshot();
                let active = graph.active_for_trace(&snap.current_steps).map(|n| n.id);
                println!("{}", graph.render(active));
            }
            ReplCommand::Usage => println!("{}", render::usage(&session.snapshot().usage)),
            ReplCommand::Debug(on) => match store.set_feature(Feature::Debug, on) {
                Ok(_) => println!("debug mode {}", if on { "on" } else { "off" }),
                Err(e) => {
                    warn!("failed to save settings: {e}");
                    println!("could not save setting: {e}");
                }
            },
        }
        prompt(agent.as_deref());
    }

    println!();
    println!("{}", render::usage(&session.snapshot().usage));
    Ok(())
}

fn print_outcome(session: &ChatSession, outcome: &SubmitOutcome, config: &CommandCenterConfig) {
    match outcome {
        SubmitOutcome::Skipped(SkipReason::Blank) => {}
        SubmitOutcome::Skipped(SkipReason::Busy) => println!("a request is already in flight"),
        SubmitOutcome::Answered { .. } | SubmitOutcome::Failed { .. } => {
            let snap = session.snapshot();
            if let Some(turn) = snap.last_turn() {
                println!("{}", render::turn(turn, config.features.show_token_costs));
            }
            if config.features.debug_mode && !snap.current_steps.is_empty() {
                println!("{}", render::steps(&snap.current_steps));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_line("  how do I reset my VPN?  "),
            ReplCommand::Message("how do I reset my VPN?".into())
        );
        assert_eq!(parse_line("   "), ReplCommand::Empty);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_line("/clear"), ReplCommand::Clear);
        assert_eq!(parse_line("/steps"), ReplCommand::Steps);
        assert_eq!(parse_line("/graph"), ReplCommand::Graph);
        assert_eq!(parse_line("/usage"), ReplCommand::Usage);
        assert_eq!(parse_line("/quit"), ReplCommand::Quit);
        assert_eq!(parse_line("/exit"), ReplCommand::Quit);
        assert_eq!(parse_line("/help"), ReplCommand::Help);
    }

    #[test]
    fn agent_selection() {
        assert_eq!(
            parse_line("/agent incident-agent"),
            ReplCommand::Agent(Some("incident-agent".into()))
        );
        assert_eq!(parse_line("/agent auto"), ReplCommand::Agent(None));
        assert_eq!(
            parse_line("/agent"),
            ReplCommand::Invalid("/agent".into())
        );
    }

    #[test]
    fn debug_toggle() {
        assert_eq!(parse_line("/debug on"), ReplCommand::Debug(true));
        assert_eq!(parse_line("/debug off"), ReplCommand::Debug(false));
        assert_eq!(
            parse_line("/debug maybe"),
            ReplCommand::Invalid("/debug maybe".into())
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse_line("/deploy"), ReplCommand::Invalid("/deploy".into()));
        assert_eq!(parse_line("/"), ReplCommand::Invalid("/".into()));
    }
}
