mod cli;
mod commands;
mod render;
mod repl;

use std::path::{Path, PathBuf};

use aicc_config::SettingsStore;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `KEY=VALUE` pairs from .env contents. Blank lines and `#` comments are
/// skipped; surrounding quotes are stripped from values.
fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim(),
                value.trim().trim_matches('"').trim_matches('\''),
            )
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Load environment variables from a .env file. Must run before the
/// tokio runtime starts any worker threads.
fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/aicc-cli/
        manifest_dir.join("..").join("..").join(".env"),
        PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

/// Settings backed by `--config`, or the platform default file (created on first run).
fn open_store(config: Option<&Path>) -> aicc_common::Result<SettingsStore> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => {
            let path = aicc_config::default_config_path()?;
            if !path.exists() {
                aicc_config::toml_loader::create_default_config(&path)?;
            }
            path
        }
    };
    Ok(SettingsStore::open(path)?)
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> aicc_common::Result<()> {
    // Environment edits happen while the process is still single-threaded.
    load_dotenv();

    let args = cli::parse();
    let store = open_store(args.config.as_deref())?;

    let level = match &args.log_level {
        Some(level) => level.clone(),
        None => store.snapshot().logging.level.as_directive().to_string(),
    };
    init_logging(&level);
    tracing::debug!("aicc v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(commands::run(args, store))
        .inspect_err(|e| tracing::error!("{e}"))
}
