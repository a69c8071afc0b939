//! Runs the three providers in order and combines their samples.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregate::{aggregate, Estimate};
use crate::extract::Mode;
use crate::fetch::{self, Fetch};
use crate::providers::{self, GeoSample, Provider, Reading};

#[derive(Debug, Error)]
pub enum Error {
  #[error("request #{} to {provider} ({url}) failed", .provider.site())]
  Transport {
    provider: Provider,
    url: String,
    #[source]
    source: fetch::Error,
  },
  #[error(transparent)]
  Provider(#[from] providers::Error),
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
  pub site: usize,
  pub provider: Provider,
  pub url: String,
  pub latitude: f64,
  pub longitude: f64,
  pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub public_ip: String,
  pub sites: Vec<Site>,
  pub estimate: Estimate,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub notices: Vec<String>,
  /// RFC 3339 time the estimate was produced.
  pub generated_at: String,
}

pub struct Locator<F> {
  fetcher: F,
  mode: Mode,
}

impl<F: Fetch> Locator<F> {
  pub const fn new(fetcher: F, mode: Mode) -> Self {
    Self { fetcher, mode }
  }

  /// Queries every provider in [`Provider::ALL`] order.
  ///
  /// The first provider reports the public IP that the later URLs are built
  /// from, so the requests run one after another.
  ///
  /// # Errors
  /// The first transport or fatal parse failure ends the run. A degraded
  /// reading from a provider with [`providers::StatusPolicy::Degrade`] does
  /// not.
  pub async fn locate(&self) -> Result<Report, Error> {
    let mut public_ip = String::new();
    let mut sites = Vec::with_capacity(Provider::ALL.len());
    let mut samples = [GeoSample::default(); 3];
    let mut notices = Vec::new();

    for (slot, provider) in samples.iter_mut().zip(Provider::ALL) {
      let url = provider.url(&public_ip);
      let body = self.fetcher.fetch(&url).await.map_err(|source| {
        Error::Transport {
          provider,
          url: url.clone(),
          source,
        }
      })?;

      let observation = provider.parse(&body, self.mode)?;
      if let Some(ip) = observation.public_ip {
        debug!(%provider, %ip, "public IP discovered");
        public_ip = ip;
      }
      if let Reading::Unavailable { status } = &observation.reading {
        notices.push(format!("Read from site {url} unsuccessful ({status})"));
      }

      *slot = observation.reading.sample();
      debug!(%provider, latitude = slot.latitude, longitude = slot.longitude, "sample");
      sites.push(Site {
        site: provider.site(),
        provider,
        url,
        latitude: slot.latitude,
        longitude: slot.longitude,
        available: observation.reading.is_available(),
      });
    }

    let estimate = aggregate(&samples);
    info!(
      latitude = estimate.centroid_latitude,
      longitude = estimate.centroid_longitude,
      radius_km = estimate.radius_km,
      "location estimated"
    );

    Ok(Report {
      public_ip,
      sites,
      estimate,
      notices,
      generated_at: Utc::now().to_rfc3339(),
    })
  }
}
