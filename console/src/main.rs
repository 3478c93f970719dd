use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use url::Url;

use common::config::Settings;
use common::models::{AlertKind, RouteState, ScheduleForm, ServerInfo};
use common::telemetry;
use console::client::{ApiClient, EmbeddedTool, ScheduleApi};
use console::form::ScheduleFormController;
use console::routes::TransitionHub;
use console::session::SessionStore;
use console::state::AppStateService;
use console::title::{TerminalTitle, TitleSyncBinding};

const LAST_CONFIGURATION_KEY: &str = "scheduler.last-configuration";
const LAST_GROUP_KEY: &str = "scheduler.last-group";

#[derive(Parser)]
#[command(name = "console", about = "Admin console for the integration platform", version)]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the server identity and deployment stage
    Info,
    /// Schedule management
    #[command(subcommand)]
    Schedule(ScheduleCommand),
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Create a cron or interval schedule
    Add(AddScheduleArgs),
}

#[derive(Args)]
struct AddScheduleArgs {
    #[arg(long)]
    name: String,
    /// Schedule group; defaults to the last submitted one
    #[arg(long, default_value = "")]
    group: String,
    /// Configuration the adapter belongs to; defaults to the last submitted one
    #[arg(long, default_value = "")]
    configuration: String,
    #[arg(long, default_value = "")]
    adapter: String,
    #[arg(long, default_value = "")]
    listener: String,
    /// Cron expression; the server rejects combining it with --interval
    #[arg(long, default_value = "")]
    cron: String,
    /// Fixed trigger interval in milliseconds
    #[arg(long, default_value = "")]
    interval: String,
    /// Message passed to the adapter on every trigger
    #[arg(long, default_value = "")]
    message: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Attach a mutual-exclusion lock, enforced server-side
    #[arg(long)]
    locker: bool,
    #[arg(long, default_value = "")]
    lock_key: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings =
        Settings::load_from_path(&cli.config_dir).context("Failed to load configuration")?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.json_logs,
    )?;

    let state = Arc::new(AppStateService::new());
    let hub = TransitionHub::new();
    let binding = TitleSyncBinding::spawn(Arc::clone(&state), &hub, Arc::new(TerminalTitle));

    let base = Url::parse(&settings.server.base_url).context("Invalid server base URL")?;
    let api = ApiClient::new(base, Duration::from_secs(settings.server.timeout_seconds))?;

    let info = bootstrap(&api, &state).await;

    let exit = match cli.command {
        Command::Info => run_info(&api, &hub, &state, info),
        Command::Schedule(ScheduleCommand::Add(args)) => {
            run_add_schedule(args, &api, &hub, &settings).await?
        }
    };

    // Let the deferred title write land before the process goes away.
    tokio::time::sleep(Duration::from_millis(20)).await;
    binding.abort();

    Ok(exit)
}

/// Fetch the server identity once and publish it into the shared state; a
/// failed fetch becomes the startup error instead.
async fn bootstrap(api: &ApiClient, state: &AppStateService) -> Option<ServerInfo> {
    match api.server_info().await {
        Ok(info) => {
            state.set_dtap_stage(info.dtap_stage.clone());
            state.set_instance_name(info.instance_name.clone());
            Some(info)
        }
        Err(error) => {
            tracing::error!(%error, "server bootstrap failed");
            state.set_startup_error(error.user_message());
            None
        }
    }
}

fn run_info(
    api: &ApiClient,
    hub: &TransitionHub,
    state: &AppStateService,
    info: Option<ServerInfo>,
) -> ExitCode {
    hub.announce(RouteState::new("status", Some("Information")));

    match info {
        Some(info) => {
            println!("Instance:  {}", info.instance_name);
            println!("Stage:     {}", info.dtap_stage);
            if let Some(version) = info.version {
                println!("Version:   {}", version);
            }
            if let Ok(url) = api.frame_url(EmbeddedTool::Larva) {
                println!("Testtool:  {}", url);
            }
            ExitCode::SUCCESS
        }
        None => {
            let error = state
                .startup_error()
                .unwrap_or_else(|| "server unavailable".to_string());
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run_add_schedule(
    args: AddScheduleArgs,
    api: &ApiClient,
    hub: &TransitionHub,
    settings: &Settings,
) -> Result<ExitCode> {
    hub.announce(RouteState::new("scheduler.add", Some("Add Schedule")));

    let session = SessionStore::open(&settings.console.session_dir)
        .await
        .context("Failed to open session store")?;

    let mut controller = ScheduleFormController::new();
    controller.selected_configuration = if args.configuration.is_empty() {
        session
            .get::<String>(LAST_CONFIGURATION_KEY)
            .await?
            .unwrap_or_default()
    } else {
        args.configuration
    };
    let group = if args.group.is_empty() {
        session.get::<String>(LAST_GROUP_KEY).await?.unwrap_or_default()
    } else {
        args.group
    };
    controller.form = ScheduleForm {
        name: args.name,
        group,
        adapter: args.adapter,
        listener: args.listener,
        cron: args.cron,
        interval: args.interval,
        message: args.message,
        description: args.description,
        locker: args.locker,
        lock_key: args.lock_key,
    };

    let submitted_configuration = controller.selected_configuration.clone();
    let submitted_group = controller.form.group.clone();
    controller.submit(api).await;

    let mut failed = false;
    for alert in controller.alerts() {
        match alert.kind {
            AlertKind::Success => println!("{}", alert.message),
            AlertKind::Warning => {
                failed = true;
                eprintln!("warning: {}", alert.message);
            }
        }
    }

    if !failed {
        session.set(LAST_CONFIGURATION_KEY, &submitted_configuration).await?;
        session.set(LAST_GROUP_KEY, &submitted_group).await?;
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
