use crate::locate::Report;
use anyhow::{Context, Result};
use console::{style, Style};

/// Helper: coloured keys so the summary is easy to scan.
fn key(s: &str) -> console::StyledObject<&str> {
  style(s).bold().cyan()
}

/// Helper: print a section header ("🌐 Providers") once.
fn header(title: &str, emoji: &str) {
  println!(
    "\n{} {}",
    style(emoji).bold(),
    Style::new().bold().underlined().apply_to(title)
  );
}

/// One table row: site number, then latitude and longitude to six places.
fn site_row(site: usize, latitude: f64, longitude: f64) -> String {
  format!("{site:3}\t{latitude:.6}\t{longitude:.6}")
}

fn accuracy_line(radius_km: f64) -> String {
  format!("Accuracy is within a radius of {radius_km:.6} kilometers")
}

fn print_sites(report: &Report) {
  header("Providers", "🌐");
  println!("  {} {}", key("Public IP:"), report.public_ip);
  println!("\nData for IP address {}:", report.public_ip);
  println!("Site\tLatitude\tLongitude");
  for s in &report.sites {
    let row = site_row(s.site, s.latitude, s.longitude);
    if s.available {
      println!("{row}");
    } else {
      println!("{}", style(row).dim());
    }
  }
}

fn print_estimate(report: &Report) {
  header("Estimate", "📍");
  let e = &report.estimate;
  println!(
    "  {} {:.6}, {:.6}",
    key("Centroid:"),
    e.centroid_latitude,
    e.centroid_longitude
  );
  println!("{}", accuracy_line(e.radius_km));
}

pub fn print_human_readable(report: &Report) {
  println!(
    "{} {}",
    style("•").magenta(),
    Style::new()
      .bold()
      .magenta()
      .apply_to("Location estimate for this host")
  );

  print_sites(report);
  print_estimate(report);

  if !report.notices.is_empty() {
    header("Notices", "⚠");
    for n in &report.notices {
      println!("  {}", style(n).yellow());
    }
  }
}

pub fn print_json(report: &Report) -> Result<()> {
  serde_json::to_string_pretty(report)
    .map(|s| println!("{s}"))
    .context("Failed to serialize results to JSON")
}
