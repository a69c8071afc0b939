use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "findme", version)]
#[command(
  about = "Estimate this host's location from three IP-geolocation services.",
  long_about = "Queries ip-api.com, tools.keycdn.com and ipinfo.io for this host's public IP address, averages the three reported positions and prints an accuracy radius in kilometers."
)]
pub struct Cli {
  /// Output results in JSON format instead of human-readable text.
  #[arg(long)]
  pub json: bool,

  /// Parse the JSON provider responses with a full JSON parser instead of
  /// scanning for the first matching key.
  #[arg(long)]
  pub strict: bool,

  /// Per-request timeout in seconds.
  #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
  pub timeout: Option<u64>,

  /// Log requests and extracted values to stderr.
  #[arg(short, long)]
  pub verbose: bool,

  /// Persist the merged settings into the user config file.
  #[arg(long)]
  pub save_config: bool,

  /// Print the current merged configuration and exit.
  #[arg(long)]
  pub config_show: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_args(args: &[&str]) -> Vec<String> {
    std::iter::once("findme".to_string())
      .chain(args.iter().map(std::string::ToString::to_string))
      .collect()
  }

  #[test]
  fn test_no_arguments() {
    let cli = Cli::try_parse_from(make_args(&[])).expect("Should parse no args");
    assert!(!cli.json);
    assert!(!cli.strict);
    assert!(cli.timeout.is_none());
    assert!(!cli.verbose);
    assert!(!cli.save_config);
    assert!(!cli.config_show);
  }

  #[test]
  fn test_json_and_strict_flags() {
    let cli = Cli::try_parse_from(make_args(&["--json", "--strict"]))
      .expect("Should parse --json --strict");
    assert!(cli.json);
    assert!(cli.strict);
  }

  #[test]
  fn test_timeout_value() {
    let cli = Cli::try_parse_from(make_args(&["--timeout", "5"]))
      .expect("Should parse --timeout");
    assert_eq!(cli.timeout, Some(5));
  }

  #[test]
  fn test_timeout_rejects_non_number() {
    let result = Cli::try_parse_from(make_args(&["--timeout", "soon"]));
    assert!(result.is_err(), "Non-numeric timeout should fail");
  }

  #[test]
  fn test_timeout_rejects_zero() {
    let result = Cli::try_parse_from(make_args(&["--timeout", "0"]));
    assert!(result.is_err(), "A zero timeout should be rejected");
  }

  #[test]
  fn test_short_verbose() {
    let cli =
      Cli::try_parse_from(make_args(&["-v"])).expect("Should parse -v");
    assert!(cli.verbose);
  }

  #[test]
  fn test_positional_argument_rejected() {
    let result = Cli::try_parse_from(make_args(&["8.8.8.8"]));
    assert!(result.is_err(), "No positional target is accepted");
  }
}
