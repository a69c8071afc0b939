#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::process::ExitCode;

use findme::{diagnostic, run};

#[tokio::main]
async fn main() -> ExitCode {
  // Install the default crypto provider for rustls
  let _ = rustls::crypto::ring::default_provider().install_default();

  match run().await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{}", diagnostic(&err));
      ExitCode::FAILURE
    }
  }
}
