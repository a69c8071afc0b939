use crate::cli::Cli;
use crate::fetch::HttpFetcher;
use crate::locate::{Locator, Report};
use crate::results;
use crate::user_config::{self, UserConfig};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub struct App {
  cli: Cli,
  config: UserConfig,
}

impl App {
  pub fn new() -> Result<Self> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = user_config::load().with_cli(&cli);
    debug!(?config, "settings loaded");

    Ok(Self { cli, config })
  }

  pub async fn run(&mut self) -> Result<()> {
    if self.cli.config_show {
      let shown = serde_json::to_string_pretty(&self.config)
        .context("Failed to serialize configuration")?;
      println!("{shown}");
      return Ok(());
    }

    if self.cli.save_config {
      user_config::store(&self.config)
        .context("Failed to save user configuration")?;
    }

    let report = self.locate().await?;
    self.print_results(&report)
  }

  async fn locate(&self) -> Result<Report> {
    let fetcher =
      HttpFetcher::new(&self.config.user_agent(), self.config.timeout())
        .context("Failed to build HTTP client")?;
    let locator = Locator::new(fetcher, self.config.mode());

    let spinner = (!self.cli.json).then(|| {
      let pb = ProgressBar::new_spinner();
      pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
          .unwrap_or_else(|_| ProgressStyle::default_spinner()),
      );
      pb.set_message("Querying geolocation providers...");
      pb.enable_steady_tick(Duration::from_millis(100));
      pb
    });

    let outcome = locator.locate().await;
    if let Some(pb) = spinner {
      pb.finish_and_clear();
    }
    outcome.context("Location lookup failed")
  }

  fn print_results(&self, report: &Report) -> Result<()> {
    if self.cli.json {
      results::print_json(report)
    } else {
      results::print_human_readable(report);
      Ok(())
    }
  }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
  let default = if verbose { "findme=debug" } else { "findme=warn" };
  let _ = tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
    )
    .with_writer(std::io::stderr)
    .try_init();
}
