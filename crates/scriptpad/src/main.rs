use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scriptpad_config::ServiceConfig;
use scriptpad_core::{DocumentOptions, HistoryConfig};
use scriptpad_protocol::{Client, Command, Request, Specifier};
use scriptpad_service::{Registry, Server, Service};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

/// A text editor driven by scripts over a local socket.
#[derive(Parser, Debug)]
#[command(name = "scriptpad", version, about)]
struct Cli {
    /// Config file (default: scriptpad.json next to the executable).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Socket path, overriding the config.
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Run the editor service.
    Serve(ServeArgs),
    /// Send one request and print the reply as JSON.
    Call(CallArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Files to open on startup; the last one is selected.
    files: Vec<PathBuf>,

    /// Lines shown by each editor's viewport.
    #[arg(long)]
    viewport_lines: Option<usize>,

    /// Maximum undo depth per editor.
    #[arg(long)]
    history_depth: Option<usize>,
}

#[derive(Args, Debug)]
struct CallArgs {
    /// get, set, execute, count or create.
    command: Command,

    /// Specifier chain, property first (`Selection SelectedEditor`, `Line Editor:0`).
    #[arg(required = true)]
    specifiers: Vec<String>,

    /// Index of the property specifier.
    #[arg(long, allow_hyphen_values = true)]
    index: Option<i64>,

    /// Range (length) of the property specifier.
    #[arg(long, allow_hyphen_values = true)]
    range: Option<i64>,

    /// Name of the property specifier (a file path for `create Editor`).
    #[arg(long)]
    name: Option<String>,

    /// Request data: JSON if it parses, otherwise a plain string.
    #[arg(long, allow_hyphen_values = true)]
    data: Option<String>,

    /// Seconds to wait for the reply.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before the config is read so its warnings are kept.
    let from_env = EnvFilter::try_from_default_env().ok();
    let has_env_filter = from_env.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(ServiceConfig::config_path);
    let mut config = ServiceConfig::load_or_create(&config_path);
    if let Some(socket) = &cli.socket {
        config.socket_path = socket.to_string_lossy().into_owned();
    }

    if !has_env_filter {
        if let Err(e) = apply_log_filter(&filter_handle, &config.log_filter) {
            tracing::warn!("{e:#}");
        }
    }

    match cli.action {
        Action::Serve(args) => serve(config, args),
        Action::Call(args) => call(&config, args),
    }
}

/// Swaps the active log filter for the configured one.
fn apply_log_filter<S>(handle: &reload::Handle<EnvFilter, S>, log_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_filter)
        .with_context(|| format!("invalid log filter {log_filter:?}"))?;
    handle
        .reload(filter)
        .with_context(|| format!("failed to apply log filter {log_filter:?}"))
}

fn serve(mut config: ServiceConfig, args: ServeArgs) -> Result<()> {
    if let Some(lines) = args.viewport_lines {
        config.viewport_lines = lines;
    }
    if let Some(depth) = args.history_depth {
        config.max_history_depth = depth;
    }
    config.sanitize();

    tracing::info!("Starting scriptpad");

    let options = DocumentOptions {
        history: HistoryConfig::with_depth(config.max_history_depth),
        viewport_lines: config.viewport_lines,
    };
    let registry = Arc::new(Registry::new(options));
    for file in &args.files {
        registry
            .open(file)
            .with_context(|| format!("failed to open {}", file.display()))?;
    }

    let server = Server::bind(
        &config.resolved_socket_path(),
        Service::new(registry),
        config.max_frame_bytes,
    )?;
    server.run()
}

fn call(config: &ServiceConfig, args: CallArgs) -> Result<()> {
    let mut names = args.specifiers.into_iter();
    let mut property = Specifier::property(names.next().context("missing property specifier")?);
    property.index = args.index;
    property.range = args.range;
    property.name = args.name;

    let mut specifiers = vec![property];
    specifiers.extend(names.map(|name| match name.strip_prefix("Editor:") {
        Some(index) => index
            .parse()
            .map(Specifier::editor)
            .unwrap_or_else(|_| Specifier::property(name.as_str())),
        None => Specifier::property(name),
    }));

    let mut request = Request::new(args.command, specifiers);
    if let Some(data) = args.data {
        request = request.with_data(
            serde_json::from_str::<serde_json::Value>(&data)
                .unwrap_or(serde_json::Value::String(data)),
        );
    }

    let socket = config.resolved_socket_path();
    let mut client = Client::connect(&socket)?
        .with_timeout(Duration::from_secs(args.timeout))?
        .with_max_frame_bytes(config.max_frame_bytes);
    let reply = client.send(&request)?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
