//! Subcommand dispatch.

use std::sync::Arc;

use aicc_chat::{
    graph_for_agent, ApiClient, ChatBackend, ChatSession, ConversationFilter, ConversationId,
    SubmitOutcome,
};
use aicc_common::{CommandCenterError, Result};
use aicc_config::{config_to_json, ApiConfig, SettingsStore};
use tracing::info;

use crate::cli::{Args, Command, SettingsAction};
use crate::render;
use crate::repl;

/// Environment override for the backend URL, below `--api-url`.
pub const API_URL_ENV: &str = "AICC_API_URL";

/// API settings for this run: `--api-url`, then `AICC_API_URL`, then the config file.
pub fn effective_api(
    configured: &ApiConfig,
    flag: Option<&str>,
    env: Option<String>,
) -> ApiConfig {
    let mut api = configured.clone();
    if let Some(url) = flag.map(str::to_string).or(env).filter(|u| !u.trim().is_empty()) {
        api.base_url = url;
    }
    api
}

fn client(store: &SettingsStore, args_api_url: Option<&str>) -> Result<ApiClient> {
    let api = effective_api(
        &store.snapshot().api,
        args_api_url,
        std::env::var(API_URL_ENV).ok(),
    );
    info!("backend: {}", api.trimmed_base_url());
    Ok(ApiClient::new(&api)?)
}

pub async fn run(args: Args, store: SettingsStore) -> Result<()> {
    let api_url = args.api_url.as_deref();
    match args.command {
        Command::Chat { agent } => {
            let backend: Arc<dyn ChatBackend> = Arc::new(client(&store, api_url)?);
            repl::run(ChatSession::new(backend), &store, agent).await
        }
        Command::Send {
            message,
            agent,
            conversation,
        } => {
            let backend: Arc<dyn ChatBackend> = Arc::new(client(&store, api_url)?);
            let session = match conversation {
                Some(id) => ChatSession::resume(backend, ConversationId::from(id)),
                None => ChatSession::new(backend),
            };
            send(&session, &store, message, agent.as_deref()).await
        }
        Command::Agents => {
            let agents = client(&store, api_url)?.list_agents().await?;
            println!("{}", render::agents(&agents));
            Ok(())
        }
        Command::Conversations {
            agent,
            status,
            channel,
            limit,
            skip,
        } => {
            let filter = ConversationFilter {
                agent_id: agent,
                status,
                channel,
                skip,
                limit,
            };
            let page = client(&store, api_url)?.list_conversations(&filter).await?;
            println!("{}", render::conversations(&page));
            Ok(())
        }
        Command::Conversation { id } => {
            let detail = client(&store, api_url)?
                .get_conversation(&ConversationId::from(id))
                .await?;
            println!("{}", render::conversation(&detail));
            Ok(())
        }
        Command::Graph { agent, step } => {
            println!("{}", graph_for_agent(&agent).render(step.as_deref()));
            Ok(())
        }
        Command::Settings { action } => settings(&store, action),
    }
}

async fn send(
    session: &ChatSession,
    store: &SettingsStore,
    message: String,
    agent: Option<&str>,
) -> Result<()> {
    let outcome = session.submit(message, agent).await;
    let config = store.snapshot();
    let snap = session.snapshot();

    match outcome {
        SubmitOutcome::Skipped(_) => Err(CommandCenterError::InvalidArgument(
            "message is empty".into(),
        )),
        SubmitOutcome::Failed { error } => Err(CommandCenterError::Chat(error)),
        SubmitOutcome::Answered { .. } => {
            if let Some(turn) = snap.last_turn() {
                println!("{}", render::turn(turn, config.features.show_token_costs));
            }
            if config.features.debug_mode {
                println!("{}", render::steps(&snap.current_steps));
            }
            if let Some(id) = &snap.conversation_id {
                println!("(conversation {id})");
            }
            Ok(())
        }
    }
}

fn settings(store: &SettingsStore, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            if let Some(path) = store.path() {
                println!("# {}", path.display());
            }
            println!("{}", config_to_json(&store.snapshot()));
        }
        SettingsAction::SetUrl { url } => {
            store.update(|c| c.api.base_url = url)?;
            println!("api url updated");
        }
        SettingsAction::SetModel { model } => {
            store.update(|c| c.model.model = model)?;
            println!("model updated");
        }
        SettingsAction::Feature { name, state } => {
            store.set_feature(name, state.enabled())?;
            println!("{name} {}", if state.enabled() { "on" } else { "off" });
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
