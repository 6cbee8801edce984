//! Live transcript printing
//!
//! [`TranscriptPrinter`] observes the orchestrator and prints every message
//! as soon as it lands in a thread, so a long discussion shows up turn by
//! turn instead of all at once.

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use parley_application::ProgressNotifier;
use parley_domain::{DiscussionStatus, Message, OutputFormat, Role, ThreadId};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

pub struct TranscriptPrinter {
    formatter: Box<dyn OutputFormatter>,
    format: OutputFormat,
    echo_user: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TranscriptPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, Box::new(std::io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, out: Box<dyn Write + Send>) -> Self {
        Self {
            formatter: super::formatter::formatter_for(format),
            format,
            echo_user: true,
            out: Mutex::new(out),
        }
    }

    /// Whether to print the user's own messages (off in the REPL, where the
    /// prompt is already on screen).
    pub fn with_echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    fn write_line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

impl ProgressNotifier for TranscriptPrinter {
    fn on_message_appended(&self, _thread_id: &ThreadId, message: &Message) {
        if message.role() == Role::User && !self.echo_user {
            return;
        }
        self.write_line(&self.formatter.format_message(message));
    }

    fn on_discussion_finished(&self, _thread_id: &ThreadId, status: DiscussionStatus, round: u32) {
        if self.format == OutputFormat::Json {
            return;
        }
        let line = match status {
            DiscussionStatus::Completed => format!("Discussion finished after {} round(s)", round),
            DiscussionStatus::Paused => {
                format!("Discussion paused after {} round(s); /discuss again to resume", round)
            }
            DiscussionStatus::Stopped => format!("Discussion stopped after {} round(s)", round),
            DiscussionStatus::Running => return,
        };
        self.write_line(&line.dimmed().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{MessageBody, Timestamp};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn message(body: MessageBody) -> Message {
        Message::new(Timestamp::from_millis(1), body)
    }

    #[test]
    fn test_prints_json_lines() {
        let buf = SharedBuf::default();
        let printer = TranscriptPrinter::with_writer(OutputFormat::Json, Box::new(buf.clone()));
        let thread = ThreadId::from("t1");

        printer.on_message_appended(&thread, &message(MessageBody::user("Hi", None)));
        printer.on_message_appended(&thread, &message(MessageBody::assistant("Hello", "gpt-4")));
        printer.on_discussion_finished(&thread, DiscussionStatus::Completed, 5);

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["role"], "assistant");
    }

    #[test]
    fn test_skips_user_messages_without_echo() {
        colored::control::set_override(false);
        let buf = SharedBuf::default();
        let printer = TranscriptPrinter::with_writer(OutputFormat::Text, Box::new(buf.clone()))
            .with_echo_user(false);
        let thread = ThreadId::from("t1");

        printer.on_message_appended(&thread, &message(MessageBody::user("Hi", None)));
        printer.on_message_appended(&thread, &message(MessageBody::system("Discussion stopped by user")));
        printer.on_discussion_finished(&thread, DiscussionStatus::Stopped, 2);

        let contents = buf.contents();
        assert!(!contents.contains("Hi"));
        assert!(contents.contains("* Discussion stopped by user"));
        assert!(contents.contains("Discussion stopped after 2 round(s)"));
    }
}
