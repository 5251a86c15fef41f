use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use remote_fragment::{
    ElementLifecycle, ElementRegistry, HttpFragmentSource, LoadState, LoaderConfig, RegistryError, SetupError,
    SOURCE_ATTRIBUTE,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("snapshot encode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Load(String),
}

#[derive(Parser, Debug)]
#[command(name = "fragment-cli", about = "Load server-rendered HTML fragments the way the page element does")]
struct Cli {
    #[arg(long, env = "FRAGMENT_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "FRAGMENT_SESSION_COOKIE", hide_env_values = true)]
    session_cookie: Option<String>,

    #[arg(long, env = "FRAGMENT_TAG_NAME")]
    tag: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Attach with the first source, apply the rest as `data-url` changes,
    /// and print what the element ends up showing.
    Load {
        #[arg(required = true)]
        sources: Vec<String>,
        /// Print the element snapshot as JSON instead of its markup.
        #[arg(long)]
        json: bool,
    },
    /// Print the absolute URL a source would be fetched from.
    Resolve { source: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = build_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, tag = %config.tag_name, "configuration loaded");

    let source = Arc::new(HttpFragmentSource::new(&config)?);

    match cli.command {
        Command::Resolve { source: raw } => match source.resolve(&raw) {
            Ok(url) => {
                println!("{url}");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Err(CliError::Load(e.to_string())),
        },
        Command::Load { sources, json } => {
            let mut registry = ElementRegistry::new();
            registry.define(&config.tag_name, source)?;
            let element = registry.create(&config.tag_name)?;

            let mut sources = sources.into_iter();
            element.set_source_url(sources.next());
            let mut handle = element.on_attach();
            let mut previous = element.source_url();
            for next in sources {
                let changed =
                    element.attribute_changed(SOURCE_ATTRIBUTE, previous.as_deref(), Some(next.as_str()));
                handle = changed.or(handle);
                previous = Some(next);
            }
            if let Some(handle) = handle {
                handle.finished().await;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&element.snapshot())?);
            } else {
                println!("{}", element.inner_html());
            }

            element.on_detach();
            Ok(match element.state() {
                LoadState::Errored { .. } => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
    }
}

/// clap has already merged `FRAGMENT_*` variables under their flags, so the
/// environment is not read a second time here. A flag therefore wins before
/// the environment value is ever parsed.
fn build_config(cli: &Cli) -> Result<LoaderConfig, SetupError> {
    LoaderConfig::from_vars(|key| match key {
        "FRAGMENT_BASE_URL" => cli.base_url.clone(),
        "FRAGMENT_SESSION_COOKIE" => cli.session_cookie.clone(),
        "FRAGMENT_TAG_NAME" => cli.tag.clone(),
        _ => None,
    })
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
