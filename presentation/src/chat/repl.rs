//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::formatter::OutputFormatter;
use parley_application::{
    CompareOutcome, ConversationOrchestrator, PauseOutcome, SendOutcome, StopOutcome,
};
use parley_domain::{ThreadId, ThreadKind};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Where the line editor keeps its history between sessions.
fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("parley").join("history.txt"))
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Send(String),
    Model(Option<String>),
    Compare {
        model1: String,
        model2: String,
        text: String,
    },
    Discuss {
        model1: String,
        model2: String,
        text: String,
    },
    Stop,
    Pause,
    Clear,
    History,
    Models,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

/// Split `/cmd m1 m2 rest of the text` into its three arguments.
fn two_models_and_text(args: &str) -> Option<(String, String, String)> {
    let mut parts = args.splitn(3, char::is_whitespace);
    let model1 = parts.next().filter(|s| !s.is_empty())?;
    let model2 = parts.next().filter(|s| !s.is_empty())?;
    let text = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
    Some((model1.to_string(), model2.to_string(), text.to_string()))
}

fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if !line.starts_with('/') {
        return ReplCommand::Send(line.to_string());
    }

    let (cmd, args) = match line.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (line, ""),
    };

    match cmd {
        "/quit" | "/exit" | "/q" => ReplCommand::Quit,
        "/help" | "/h" | "/?" => ReplCommand::Help,
        "/models" => ReplCommand::Models,
        "/model" | "/m" => {
            ReplCommand::Model(Some(args.to_string()).filter(|a| !a.is_empty()))
        }
        "/compare" => match two_models_and_text(args) {
            Some((model1, model2, text)) => ReplCommand::Compare {
                model1,
                model2,
                text,
            },
            None => ReplCommand::Usage("/compare <model1> <model2> <message>"),
        },
        "/discuss" => match two_models_and_text(args) {
            Some((model1, model2, text)) => ReplCommand::Discuss {
                model1,
                model2,
                text,
            },
            None => ReplCommand::Usage("/discuss <model1> <model2> <message>"),
        },
        "/stop" => ReplCommand::Stop,
        "/pause" => ReplCommand::Pause,
        "/clear" => ReplCommand::Clear,
        "/history" => ReplCommand::History,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

/// Interactive chat REPL over one chat thread.
///
/// Messages are printed by whatever [`ProgressNotifier`](parley_application::ProgressNotifier)
/// the orchestrator was built with; the REPL itself only prints command
/// feedback.
pub struct ChatRepl {
    orchestrator: Arc<ConversationOrchestrator>,
    formatter: Box<dyn OutputFormatter>,
    thread_id: ThreadId,
    model: String,
    discussion: Option<JoinHandle<()>>,
}

impl ChatRepl {
    /// Create a new ChatRepl with a fresh chat thread
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        formatter: Box<dyn OutputFormatter>,
        model: impl Into<String>,
    ) -> Self {
        let thread_id = orchestrator.create_thread(ThreadKind::Chat, "Chat");
        Self {
            orchestrator,
            formatter,
            thread_id,
            model: model.into(),
            discussion: None,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the interactive REPL until `/quit` or end of input.
    ///
    /// `readline` blocks, so each prompt runs on the blocking pool while a
    /// spawned discussion keeps going. Ctrl-C stops a running discussion.
    pub async fn run(mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let (editor, readline) = match tokio::task::spawn_blocking(move || {
                let line = rl.readline(">>> ");
                (rl, line)
            })
            .await
            {
                Ok(result) => result,
                Err(e) => {
                    // The editor went down with the task, so history is not saved.
                    warn!("Line editor task failed: {}", e);
                    self.shutdown().await;
                    return Ok(());
                }
            };
            rl = editor;

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if !self.handle_line(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    if self.discussion_running() {
                        self.stop();
                    }
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path
            && let Err(e) = rl.save_history(path)
        {
            warn!(path = %path.display(), "Failed to save history: {}", e);
        }

        self.shutdown().await;
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│               Parley - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.model);
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /model [id]                    - Show or switch the current model");
        println!("  /models                        - List available models");
        println!("  /compare <m1> <m2> <message>   - Ask two models side by side");
        println!("  /discuss <m1> <m2> <message>   - Let two models discuss");
        println!("  /pause                         - Pause the running discussion");
        println!("  /stop                          - Stop the discussion");
        println!("  /history                       - Show this thread's messages");
        println!("  /clear                         - Clear this thread");
        println!("  /help, /h, /?                  - Show this help");
        println!("  /quit, /exit, /q               - Exit chat");
        println!();
    }

    fn discussion_running(&self) -> bool {
        self.discussion
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Handle one input line. Returns `false` when the REPL should exit.
    async fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            ReplCommand::Quit => {
                println!("Bye!");
                return false;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Models => {
                println!("{}", self.formatter.format_models(self.orchestrator.catalog()));
            }
            ReplCommand::Model(None) => println!("Current model: {}", self.model),
            ReplCommand::Model(Some(id)) => match self.orchestrator.catalog().resolve(&id) {
                Ok(model) => {
                    self.model = model.id.clone();
                    println!("Switched to {}", model);
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Send(text) => self.send(&text).await,
            ReplCommand::Compare {
                model1,
                model2,
                text,
            } => self.compare(&text, &model1, &model2).await,
            ReplCommand::Discuss {
                model1,
                model2,
                text,
            } => self.start_discussion(text, model1, model2),
            ReplCommand::Stop => self.stop(),
            ReplCommand::Pause => match self.orchestrator.pause(&self.thread_id) {
                Ok(PauseOutcome::Requested) => println!("Pausing after the current turn..."),
                Ok(PauseOutcome::NotRunning) => println!("No discussion is running"),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Clear => match self.orchestrator.clear_thread(&self.thread_id) {
                Ok(()) => println!("Thread cleared"),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::History => match self.orchestrator.messages(&self.thread_id) {
                Ok(messages) if messages.is_empty() => println!("No messages yet"),
                Ok(messages) => println!("{}", self.formatter.format_transcript(&messages)),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        true
    }

    async fn send(&self, text: &str) {
        match self
            .orchestrator
            .send_single(&self.thread_id, text, &self.model)
            .await
        {
            Ok(SendOutcome::Replied(_)) | Ok(SendOutcome::Discarded) => {}
            Ok(SendOutcome::Failed { error, .. }) => {
                debug!(kind = %error.kind, "Send failed");
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn compare(&self, text: &str, model1: &str, model2: &str) {
        match self
            .orchestrator
            .compare(&self.thread_id, text, model1, model2)
            .await
        {
            Ok(CompareOutcome::Failed { model_id, .. }) => {
                debug!(model = %model_id, "Comparison failed");
            }
            Ok(_) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    /// Run the discussion on its own task so `/stop` and `/pause` stay
    /// responsive.
    fn start_discussion(&mut self, text: String, model1: String, model2: String) {
        if self.discussion_running() {
            eprintln!("Error: a discussion is already running (use /stop or /pause)");
            return;
        }

        let orchestrator = Arc::clone(&self.orchestrator);
        let thread_id = self.thread_id.clone();
        self.discussion = Some(tokio::spawn(async move {
            match orchestrator
                .discuss(&thread_id, &text, &model1, &model2)
                .await
            {
                Ok(outcome) => debug!(
                    status = %outcome.status,
                    round = outcome.round,
                    calls = outcome.calls,
                    "Discussion task finished"
                ),
                Err(e) => eprintln!("Error: {}", e),
            }
        }));
    }

    fn stop(&self) {
        match self.orchestrator.stop(&self.thread_id) {
            Ok(StopOutcome::Requested) => println!("Stopping..."),
            Ok(StopOutcome::AlreadyStopping) => println!("Already stopping"),
            Ok(StopOutcome::Stopped) => {}
            Ok(StopOutcome::NoDiscussion) => println!("No discussion to stop"),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    /// Stop a running discussion and wait for its task.
    async fn shutdown(&mut self) {
        if let Some(handle) = self.discussion.take() {
            if !handle.is_finished() {
                let _ = self.orchestrator.stop(&self.thread_id);
            }
            if let Err(e) = handle.await {
                warn!("Discussion task failed: {}", e);
            }
        }
    }
}
