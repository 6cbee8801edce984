//! Progress reporting for model calls

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parley_application::ProgressNotifier;
use parley_domain::{DiscussionStatus, Message, ThreadId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Reports progress with spinners, one per in-flight model call
pub struct ProgressReporter {
    multi: MultiProgress,
    calls: Mutex<HashMap<String, ProgressBar>>,
    delay_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            calls: Mutex::new(HashMap::new()),
            delay_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn key(thread_id: &ThreadId, model_id: &str) -> String {
        format!("{}/{}", thread_id, model_id)
    }

    fn spinner(&self, prefix: &str, message: String) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn clear_delay(&self) {
        if let Some(pb) = self
            .delay_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_message_appended(&self, _thread_id: &ThreadId, _message: &Message) {
        self.clear_delay();
    }

    fn on_model_call_start(&self, thread_id: &ThreadId, model_id: &str) {
        self.clear_delay();
        let pb = self.spinner(model_id, "thinking...".to_string());
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Self::key(thread_id, model_id), pb);
    }

    fn on_model_call_complete(&self, thread_id: &ThreadId, model_id: &str, _success: bool) {
        if let Some(pb) = self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&Self::key(thread_id, model_id))
        {
            pb.finish_and_clear();
        }
    }

    fn on_pacing_delay(&self, _thread_id: &ThreadId, delay: Duration) {
        self.clear_delay();
        let pb = self.spinner(
            "waiting",
            format!("next turn in {:.1}s", delay.as_secs_f64()),
        );
        *self
            .delay_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_discussion_finished(&self, _thread_id: &ThreadId, _status: DiscussionStatus, _round: u32) {
        self.clear_delay();
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_message_appended(&self, _thread_id: &ThreadId, _message: &Message) {}

    fn on_model_call_start(&self, _thread_id: &ThreadId, model_id: &str) {
        eprintln!("{} {}", "->".cyan(), model_id.bold());
    }

    fn on_model_call_complete(&self, _thread_id: &ThreadId, model_id: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), model_id);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), model_id);
        }
    }

    fn on_pacing_delay(&self, _thread_id: &ThreadId, delay: Duration) {
        eprintln!("  {} waiting {}ms", "..".dimmed(), delay.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinners_are_tracked_per_call() {
        let reporter = ProgressReporter::new();
        let thread = ThreadId::from("t1");

        reporter.on_model_call_start(&thread, "m1");
        reporter.on_model_call_start(&thread, "m2");
        assert_eq!(reporter.calls.lock().unwrap().len(), 2);

        reporter.on_model_call_complete(&thread, "m1", true);
        assert_eq!(reporter.calls.lock().unwrap().len(), 1);
        reporter.on_model_call_complete(&thread, "m2", false);
        assert!(reporter.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delay_spinner_cleared_by_next_call() {
        let reporter = ProgressReporter::new();
        let thread = ThreadId::from("t1");

        reporter.on_pacing_delay(&thread, Duration::from_secs(5));
        assert!(reporter.delay_bar.lock().unwrap().is_some());
        reporter.on_model_call_start(&thread, "m1");
        assert!(reporter.delay_bar.lock().unwrap().is_none());
    }
}
