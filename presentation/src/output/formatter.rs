//! Output formatter trait

use parley_domain::{Message, ModelCatalog, OutputFormat};

/// Trait for rendering thread messages
pub trait OutputFormatter: Send + Sync {
    /// Render one message
    fn format_message(&self, message: &Message) -> String;

    /// Render a whole transcript
    fn format_transcript(&self, messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| self.format_message(m))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the model list
    fn format_models(&self, catalog: &ModelCatalog) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(super::console::ConsoleFormatter),
        OutputFormat::Json => Box::new(super::console::JsonFormatter),
    }
}
