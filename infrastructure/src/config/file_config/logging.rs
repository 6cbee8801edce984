//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// dir = "~/.local/state/parley"            # daily rolling tracing log
/// conversation_log = "transcript.jsonl"    # JSONL conversation transcript
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling diagnostic log. Unset logs to stderr only.
    pub dir: Option<PathBuf>,
    /// File for the conversation transcript. Unset disables it.
    pub conversation_log: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Expand a leading `~/` against the home directory.
    pub fn expand(path: &std::path::Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| path.to_path_buf()),
            Err(_) => path.to_path_buf(),
        }
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(Self::expand)
    }

    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().map(Self::expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_file_logging() {
        let config = FileLoggingConfig::default();
        assert!(config.log_dir().is_none());
        assert!(config.conversation_log_path().is_none());
    }

    #[test]
    fn test_plain_paths_are_kept() {
        let config = FileLoggingConfig {
            dir: Some(PathBuf::from("/var/log/parley")),
            conversation_log: Some(PathBuf::from("transcript.jsonl")),
        };
        assert_eq!(config.log_dir(), Some(PathBuf::from("/var/log/parley")));
        assert_eq!(
            config.conversation_log_path(),
            Some(PathBuf::from("transcript.jsonl"))
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let expanded = FileLoggingConfig::expand(std::path::Path::new("~/logs"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs"));
        }
    }
}
