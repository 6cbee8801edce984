//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use parley_application::{
    CompareOutcome, CompositeProgressNotifier, ConversationOrchestrator, DiscussOutcome,
    OrchestratorConfig, SendOutcome, StopOutcome,
};
use parley_domain::{DiscussionStatus, OutputFormat, ThreadKind};
use parley_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, ProviderRouter};
use parley_presentation::{
    ChatRepl, Cli, Command, ProgressReporter, TranscriptPrinter, formatter_for,
    output::set_color_enabled,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.log_dir().as_deref())?;
    info!("Starting parley");

    report_config_issues(&config)?;

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    set_color_enabled(config.output.color && format == OutputFormat::Text);

    let command = cli.command.clone().unwrap_or(Command::Chat { model: None });
    let catalog = Arc::new(config.models.build_catalog());

    if command == Command::Models {
        println!("{}", formatter_for(format).format_models(&catalog));
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let router = ProviderRouter::from_config(&config.providers)
        .context("Failed to set up model providers")?;

    let mut orchestrator_config = config.orchestrator.to_orchestrator_config();
    if let Command::Discuss {
        rounds, delay_ms, ..
    } = &command
    {
        orchestrator_config = apply_discuss_overrides(orchestrator_config, *rounds, *delay_ms);
    }

    let in_repl = matches!(command, Command::Chat { .. });
    let mut progress = CompositeProgressNotifier::default()
        .with(Arc::new(TranscriptPrinter::new(format).with_echo_user(!in_repl)));
    if !cli.quiet && format == OutputFormat::Text {
        progress = progress.with(Arc::new(ProgressReporter::new()));
    }

    let mut orchestrator = ConversationOrchestrator::new(Arc::new(router), catalog)
        .with_config(orchestrator_config)
        .with_progress(Arc::new(progress));
    if let Some(path) = config.logging.conversation_log_path()
        && let Some(logger) = JsonlConversationLogger::open(&path)
    {
        info!(path = %path.display(), "Writing conversation log");
        orchestrator = orchestrator.with_conversation_logger(Arc::new(logger));
    }
    let orchestrator = Arc::new(orchestrator);
    let default_model = config.models.default_model().to_string();

    match command {
        Command::Send { model, message } => {
            let model = model.unwrap_or(default_model);
            let thread = orchestrator.create_thread(ThreadKind::Chat, "send");
            match orchestrator.send_single(&thread, &message, &model).await? {
                SendOutcome::Failed { .. } => Ok(ExitCode::FAILURE),
                _ => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Compare {
            model1,
            model2,
            message,
        } => {
            let thread = orchestrator.create_thread(ThreadKind::Chat, "compare");
            match orchestrator
                .compare(&thread, &message, &model1, &model2)
                .await?
            {
                CompareOutcome::Failed { .. } => Ok(ExitCode::FAILURE),
                _ => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Discuss {
            model1,
            model2,
            message,
            ..
        } => {
            let outcome = run_discussion(&orchestrator, &message, &model1, &model2).await?;
            Ok(match outcome.status {
                DiscussionStatus::Stopped => ExitCode::from(130),
                _ => ExitCode::SUCCESS,
            })
        }
        Command::Chat { model } => {
            let model = model.unwrap_or(default_model);
            orchestrator
                .catalog()
                .resolve(&model)
                .map_err(|e| anyhow!("{}", e))?;
            let repl = ChatRepl::new(Arc::clone(&orchestrator), formatter_for(format), model);
            repl.run().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Models => Ok(ExitCode::SUCCESS),
    }
}

/// Install the tracing subscriber: stderr always, plus a daily rolling file
/// when a log directory is configured. The returned guard flushes the file
/// writer on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "parley.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
        eprintln!("config: {}", issue);
    }
    if issues.iter().any(|issue| issue.is_error()) {
        return Err(anyhow!("Invalid configuration"));
    }
    Ok(())
}

fn apply_discuss_overrides(
    config: OrchestratorConfig,
    rounds: Option<u32>,
    delay_ms: Option<u64>,
) -> OrchestratorConfig {
    let config = match rounds {
        Some(rounds) => config.with_max_rounds(rounds.max(1)),
        None => config,
    };
    match delay_ms {
        Some(ms) => config.with_turn_delay_ms(ms),
        None => config,
    }
}

/// Run a one-shot discussion; Ctrl-C stops it after the current turn.
async fn run_discussion(
    orchestrator: &ConversationOrchestrator,
    message: &str,
    model1: &str,
    model2: &str,
) -> Result<DiscussOutcome> {
    let thread = orchestrator.create_thread(ThreadKind::Chat, "discussion");
    let discussion = orchestrator.discuss(&thread, message, model1, model2);
    tokio::pin!(discussion);

    loop {
        tokio::select! {
            outcome = &mut discussion => return Ok(outcome?),
            _ = tokio::signal::ctrl_c() => {
                if orchestrator.stop(&thread)? == StopOutcome::Requested {
                    eprintln!("Stopping discussion...");
                }
            }
        }
    }
}
