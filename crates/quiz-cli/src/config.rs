//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Question file used when `quiz run` is given none.
    pub questions_path: Option<PathBuf>,
    /// Show the elapsed time on each question screen.
    pub show_timer: bool,
    /// Show explanations of missed questions on the results screen.
    pub show_explanations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: None,
            show_timer: true,
            show_explanations: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/quiz/config.toml`, the given
    /// file, then `QUIZ_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (QUIZ_*)
        figment = figment.merge(Env::prefixed("QUIZ_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for quiz.
///
/// On Linux: `~/.config/quiz`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("quiz"))
}
