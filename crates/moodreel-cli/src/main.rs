//! moodreel - describe a mood, get movie recommendations.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use moodreel_api::openai::OpenAiClient;
use moodreel_search::{
    DisplayMovie, MIN_QUERY_CHARS, Mood, SearchOrchestrator, SearchState, SearchStatus,
    UnknownMood, build_prompt, format_meta_line,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;

/// Environment variable holding the provider credential.
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the moods a search can be narrowed with.
    Moods,
    /// Print the prompt a query would send, without sending it.
    Prompt(PromptArgs),
    /// Run one search and print the recommendations.
    Search(SearchArgs),
    /// Read queries from stdin and search as you type.
    Interactive(InteractiveArgs),
}

/// Arguments for the `prompt` subcommand.
#[derive(clap::Args)]
struct PromptArgs {
    /// What you feel like watching (e.g. "cozy evening").
    query: String,
    /// Mood label or slug (e.g. "feel-good").
    #[arg(long)]
    mood: Option<Mood>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// What you feel like watching (e.g. "heist thriller").
    query: String,
    /// Mood label or slug (e.g. "edge-of-your-seat").
    #[arg(long)]
    mood: Option<Mood>,
    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `interactive` subcommand.
#[derive(clap::Args)]
struct InteractiveArgs {
    /// Mood selected at start.
    #[arg(long)]
    mood: Option<Mood>,
}

/// A line read in interactive mode.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// Replace the query.
    Query(String),
    /// Toggle a mood.
    Mood(Result<Mood, UnknownMood>),
    /// Clear query and results.
    Clear,
    /// Leave interactive mode.
    Quit,
}

/// Parses an interactive line. Lines starting with `:` are commands.
fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((":mood", rest)) => Input::Mood(rest.parse()),
        _ => match trimmed {
            ":mood" => Input::Mood("".parse()),
            ":clear" => Input::Clear,
            ":quit" | ":q" => Input::Quit,
            _ => Input::Query(String::from(line)),
        },
    }
}

/// Runs the `moods` subcommand.
fn run_moods() {
    for mood in Mood::ALL {
        tracing::info!("{:<18}  {:<18}  {}", mood.slug(), mood.label(), mood.hint());
    }
}

/// Runs the `prompt` subcommand.
///
/// # Errors
///
/// Returns an error if the query is shorter than the search threshold.
fn run_prompt(args: &PromptArgs) -> Result<()> {
    let prompt = build_prompt(&args.query, args.mood);
    if prompt.is_empty() {
        bail!("query must be at least {MIN_QUERY_CHARS} characters");
    }
    tracing::info!("{prompt}");
    Ok(())
}

/// Builds an `OpenAiClient` from the provider section of `config`.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_client(config: &AppConfig) -> Result<OpenAiClient> {
    let mut builder = OpenAiClient::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = config.base_url()? {
        builder = builder.base_url(base_url);
    }
    if let Some(model) = &config.provider.model {
        builder = builder.model(model.clone());
    }
    if let Some(temperature) = config.provider.temperature {
        builder = builder.temperature(temperature);
    }
    builder.build().context("failed to build suggestion client")
}

/// Loads config and wires a search session.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
#[instrument(skip_all)]
fn build_orchestrator(dir: Option<&PathBuf>) -> Result<SearchOrchestrator<OpenAiClient>> {
    let (config_path, config) = AppConfig::load_from(dir.map(PathBuf::as_path))?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    let client = build_client(&config)?;
    let mut builder = SearchOrchestrator::builder(client).debounce(config.debounce());
    if let Some(credential) = config.credential(std::env::var(API_KEY_ENV).ok()) {
        builder = builder.credential(credential);
    }
    Ok(builder.build())
}

/// Logs one movie card.
fn log_card(heading: &str, movie: &DisplayMovie) {
    tracing::info!("{heading}: {}", movie.title);
    let meta = format_meta_line(movie);
    if !meta.is_empty() {
        tracing::info!("  {meta}");
    }
    tracing::info!("  {}", movie.overview);
    if !movie.watch_reasons.is_empty() {
        tracing::info!("  Why watch: {}", movie.watch_reasons.join("; "));
    }
    if !movie.where_to_watch.is_empty() {
        tracing::info!("  Where to watch: {}", movie.where_to_watch.join(", "));
    }
}

/// Logs a settled state: cards when ready, the message otherwise.
fn log_state(state: &SearchState) {
    match state.status {
        SearchStatus::Ready => {
            if let Some(highlight) = state.highlight() {
                log_card("Top pick", highlight);
            }
            for movie in state.supporting() {
                log_card("Also consider", movie);
            }
        }
        SearchStatus::Error => {
            if let Some(message) = &state.error {
                tracing::warn!("{message}");
            }
        }
        SearchStatus::Idle => {
            if let Some(message) = &state.error {
                tracing::info!("{message}");
            }
        }
        SearchStatus::Loading => {}
    }
}

/// Whether `next` carries a different outcome than `prev`.
fn outcome_changed(prev: &SearchState, next: &SearchState) -> bool {
    prev.status != next.status || prev.error != next.error || prev.movies != next.movies
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is too short, setup fails, or the search
/// ends in the error state.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    if build_prompt(&args.query, args.mood).is_empty() {
        bail!("query must be at least {MIN_QUERY_CHARS} characters");
    }

    let search = build_orchestrator(dir)?;
    let mut rx = search.subscribe();
    if let Some(mood) = args.mood {
        search.toggle_mood(mood).await;
    }
    search.set_query(args.query.as_str()).await;

    let state = rx
        .wait_for(SearchState::is_settled)
        .await
        .context("search session closed before settling")?
        .clone();

    if args.json {
        let json = serde_json::to_string_pretty(&state).context("failed to serialize state")?;
        tracing::info!("{json}");
    } else if state.status != SearchStatus::Error {
        log_state(&state);
    }

    if state.status == SearchStatus::Error {
        bail!("{}", state.error.unwrap_or_default());
    }
    Ok(())
}

/// Runs the `interactive` subcommand until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if setup fails or stdin cannot be read.
#[instrument(skip_all)]
async fn run_interactive(args: &InteractiveArgs, dir: Option<&PathBuf>) -> Result<()> {
    let search = build_orchestrator(dir)?;
    if let Some(mood) = args.mood {
        search.toggle_mood(mood).await;
    }

    let mut rx = search.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last = rx.borrow_and_update().clone();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.status == SearchStatus::Loading && last.status != SearchStatus::Loading {
                tracing::info!("Searching...");
            }
            if state.is_settled() && outcome_changed(&last, &state) {
                log_state(&state);
            }
            last = state;
        }
    });

    tracing::info!("Describe what you feel like watching. Commands: :mood <MOOD>, :clear, :quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Clear => search.clear().await,
            Input::Mood(Ok(mood)) => {
                search.toggle_mood(mood).await;
                let selected = search.state().mood.map_or("none", Mood::label);
                tracing::info!("Mood: {selected}");
            }
            Input::Mood(Err(error)) => tracing::warn!("{error}"),
            Input::Query(text) => search.set_query(text).await,
        }
    }

    watcher.abort();
    Ok(())
}

/// Installs the global tracing subscriber.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Moods => {
            run_moods();
            Ok(())
        }
        Commands::Prompt(args) => run_prompt(&args),
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Interactive(args) => run_interactive(&args, cli.dir.as_ref()).await,
    }
}
