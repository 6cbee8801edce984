//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["parley.toml", ".parley.toml"];

/// Prefix of environment overrides, e.g. `PARLEY_ORCHESTRATOR__MAX_ROUNDS=3`
pub const ENV_PREFIX: &str = "PARLEY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PARLEY_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./parley.toml` or `./.parley.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/parley/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/parley/config.toml` (or the platform
    /// equivalent), whether or not it exists.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("parley").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        // Project config
        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./parley.toml or ./.parley.toml");
        }

        // Global config
        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.orchestrator.max_rounds, 5);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("parley"));
    }

    #[test]
    fn test_sources_merge_in_priority_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "global.toml",
                r#"
[orchestrator]
max_rounds = 2
turn_delay_ms = 10

[output]
color = false
"#,
            )?;
            jail.create_file(
                "parley.toml",
                r#"
[orchestrator]
max_rounds = 3
"#,
            )?;
            jail.create_file(
                "explicit.toml",
                r#"
[orchestrator]
turn_delay_ms = 20
"#,
            )?;
            jail.set_env("PARLEY_MODELS__DEFAULT", "claude-3-opus-20240229");

            let config: FileConfig = ConfigLoader::figment(
                Some(Path::new("global.toml")),
                Some(Path::new("parley.toml")),
                Some(Path::new("explicit.toml")),
            )
            .extract()?;

            assert_eq!(config.orchestrator.max_rounds, 3);
            assert_eq!(config.orchestrator.turn_delay_ms, 20);
            assert!(!config.output.color);
            assert_eq!(config.models.default_model(), "claude-3-opus-20240229");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "parley.toml",
                r#"
[orchestrator]
delete_policy = "force-stop"
"#,
            )?;
            jail.set_env("PARLEY_ORCHESTRATOR__DELETE_POLICY", "reject");

            let config: FileConfig =
                ConfigLoader::figment(None, Some(Path::new("parley.toml")), None).extract()?;
            assert_eq!(config.orchestrator.delete_policy, "reject");
            Ok(())
        });
    }
}
