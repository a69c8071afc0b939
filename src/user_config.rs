use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::extract::Mode;

const APP_NAME: &str = "findme";
const FILE_NAME: Option<&str> = None;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct UserConfig {
  pub timeout_secs: Option<u64>,
  pub user_agent: Option<String>,
  #[serde(default)]
  pub strict: bool,
}

impl UserConfig {
  /// Command-line flags win over values from the file.
  #[must_use]
  pub fn with_cli(mut self, cli: &Cli) -> Self {
    if cli.timeout.is_some() {
      self.timeout_secs = cli.timeout;
    }
    self.strict |= cli.strict;
    self
  }

  /// A stored zero falls back to the default.
  #[must_use]
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(
      self
        .timeout_secs
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS),
    )
  }

  #[must_use]
  pub fn user_agent(&self) -> String {
    self
      .user_agent
      .clone()
      .unwrap_or_else(|| format!("findme_cli/{}", env!("CARGO_PKG_VERSION")))
  }

  #[must_use]
  pub const fn mode(&self) -> Mode {
    if self.strict {
      Mode::Structured
    } else {
      Mode::Literal
    }
  }
}

/// Read ~/.config/findme/default-config.toml (or OS equivalent).
pub fn load() -> UserConfig {
  confy::load(APP_NAME, FILE_NAME).unwrap_or_default()
}

pub fn store(cfg: &UserConfig) -> anyhow::Result<()> {
  confy::store(APP_NAME, FILE_NAME, cfg).map_err(Into::into)
}
