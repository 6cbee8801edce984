//! Console output formatters for thread messages

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use parley_domain::{Message, MessageBody, ModelCatalog};

/// Formats messages for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one message with a colored role header
    pub fn format_message(message: &Message) -> String {
        match &message.body {
            MessageBody::User { content, model_id } => {
                let header = match model_id {
                    Some(model) => format!("You → {}", model),
                    None => "You".to_string(),
                };
                format!("{}\n{}\n", header.cyan().bold(), content)
            }
            MessageBody::Assistant { content, model_id } => {
                format!("{}\n{}\n", format!("── {} ──", model_id).yellow().bold(), content)
            }
            MessageBody::Error { content, model_id } => {
                let header = match model_id {
                    Some(model) => format!("── {} failed ──", model),
                    None => "── Error ──".to_string(),
                };
                format!("{}\n{}\n", header.red().bold(), content)
            }
            MessageBody::System { content } => {
                format!("{}\n", format!("* {}", content).dimmed())
            }
            MessageBody::Comparison(comparison) => {
                let mut output = String::new();
                output.push_str(&Self::section_header("Comparison"));
                for entry in [&comparison.model1, &comparison.model2] {
                    output.push_str(&format!(
                        "\n{}\n{}\n",
                        format!("── {} ──", entry.id).yellow().bold(),
                        entry.response
                    ));
                }
                output
            }
        }
    }

    /// Format the catalog, marking disabled models
    pub fn format_models(catalog: &ModelCatalog) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Available models:".cyan().bold()));

        for provider in catalog.providers() {
            output.push_str(&format!("\n  {}\n", provider.bold()));
            for model in catalog.all().iter().filter(|m| m.provider_id == provider) {
                let line = format!("    {:<36} {}", model.id, model.display_name);
                if model.enabled {
                    output.push_str(&format!("{}\n", line));
                } else {
                    output.push_str(&format!("{} {}\n", line.dimmed(), "(disabled)".dimmed()));
                }
            }
        }

        output
    }

    fn section_header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_message(&self, message: &Message) -> String {
        Self::format_message(message)
    }

    fn format_models(&self, catalog: &ModelCatalog) -> String {
        Self::format_models(catalog)
    }
}

/// Formats messages as single-line JSON documents
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_message(&self, message: &Message) -> String {
        serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_models(&self, catalog: &ModelCatalog) -> String {
        serde_json::to_string_pretty(catalog.all()).unwrap_or_else(|_| "[]".to_string())
    }
}
