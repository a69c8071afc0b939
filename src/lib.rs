#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::cast_precision_loss)]

use anyhow::Result;

mod app;
mod cli;
mod results;
mod user_config;

pub mod aggregate;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod providers;

/// Runs the main application logic.
///
/// This function parses command-line arguments, loads the user
/// configuration, queries the three geolocation providers in order, and
/// prints the combined estimate.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, if any request or
/// fatal response parse fails, or if printing the JSON report fails. Nothing
/// is printed for a failed run.
pub async fn run() -> Result<()> {
  let mut app = app::App::new()?;
  app.run().await
}

/// Formats a fatal error as one line, causes joined with `: `.
#[must_use]
pub fn diagnostic(err: &anyhow::Error) -> String {
  format!("Error: {err:#}")
}
