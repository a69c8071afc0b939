//! The three geolocation services and the adapters that read their bodies.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::extract::{self, Mode};

pub mod ip_api;
pub mod ipinfo;
pub mod keycdn;

/// One provider's reported position, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeoSample {
  pub latitude: f64,
  pub longitude: f64,
}

impl GeoSample {
  #[must_use]
  pub const fn new(latitude: f64, longitude: f64) -> Self {
    Self {
      latitude,
      longitude,
    }
  }
}

/// What a provider contributed to a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
  Located(GeoSample),
  /// The provider answered but reported a non-success status.
  Unavailable { status: String },
}

impl Reading {
  /// The sample fed to the aggregate. Unavailable readings count as (0, 0).
  #[must_use]
  pub fn sample(&self) -> GeoSample {
    match self {
      Self::Located(sample) => *sample,
      Self::Unavailable { .. } => GeoSample::default(),
    }
  }

  #[must_use]
  pub const fn is_available(&self) -> bool {
    matches!(self, Self::Located(_))
  }
}

/// A parsed provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
  pub reading: Reading,
  /// The caller's public address, reported only by [`Provider::IpApi`].
  pub public_ip: Option<String>,
}

/// What happens when a provider's status field is not `"success"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
  /// The whole run fails.
  Fatal,
  /// The provider's sample becomes (0, 0) and the run continues.
  Degrade,
  /// The provider has no status field.
  None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
  /// CSV endpoint of ip-api.com. Also reports the public IP.
  IpApi,
  /// JSON endpoint of tools.keycdn.com, bare-number coordinates.
  KeyCdn,
  /// JSON endpoint of ipinfo.io, coordinates packed into `loc`.
  IpInfo,
}

impl Provider {
  /// Query order. The first entry discovers the public IP the others need.
  pub const ALL: [Self; 3] = [Self::IpApi, Self::KeyCdn, Self::IpInfo];

  /// Request URL. `public_ip` is ignored by [`Provider::IpApi`].
  #[must_use]
  pub fn url(self, public_ip: &str) -> String {
    match self {
      Self::IpApi => ip_api::URL.to_string(),
      Self::KeyCdn => format!("{}?host={public_ip}", keycdn::URL),
      Self::IpInfo => format!("{}/{public_ip}/json", ipinfo::URL),
    }
  }

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::IpApi => "ip-api.com",
      Self::KeyCdn => "tools.keycdn.com",
      Self::IpInfo => "ipinfo.io",
    }
  }

  /// 1-based position in [`Provider::ALL`].
  #[must_use]
  pub const fn site(self) -> usize {
    match self {
      Self::IpApi => 1,
      Self::KeyCdn => 2,
      Self::IpInfo => 3,
    }
  }

  #[must_use]
  pub const fn status_policy(self) -> StatusPolicy {
    match self {
      Self::IpApi => StatusPolicy::Fatal,
      Self::KeyCdn => StatusPolicy::Degrade,
      Self::IpInfo => StatusPolicy::None,
    }
  }

  /// Applies [`Provider::status_policy`] to a status read from a body.
  ///
  /// `Ok(None)` means the status was `success` and parsing continues.
  /// `Ok(Some(_))` is the degraded reading to report instead.
  pub(crate) fn check_status(
    self,
    status: Result<String, extract::Error>,
  ) -> Result<Option<Reading>, Error> {
    match (self.status_policy(), status) {
      (StatusPolicy::None, _) => Ok(None),
      (_, Ok(status)) if status == "success" => Ok(None),
      (StatusPolicy::Degrade, outcome) => {
        let status = outcome.unwrap_or_else(|e| e.to_string());
        debug!(provider = %self, %status, "provider reported failure, using (0, 0)");
        Ok(Some(Reading::Unavailable { status }))
      }
      (_, Ok(status)) => Err(Error::Status {
        provider: self,
        status,
      }),
      (_, Err(source)) => Err(Error::Extract {
        provider: self,
        source,
      }),
    }
  }

  /// Reads one response body into an [`Observation`].
  ///
  /// `mode` only affects the JSON providers. The ip-api.com record is CSV
  /// and is always scanned positionally.
  ///
  /// # Errors
  /// Any [`Error`] the provider's adapter treats as fatal.
  pub fn parse(self, body: &str, mode: Mode) -> Result<Observation, Error> {
    match self {
      Self::IpApi => ip_api::parse(body),
      Self::KeyCdn => keycdn::parse(body, mode),
      Self::IpInfo => ipinfo::parse(body, mode),
    }
  }
}

impl fmt::Display for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
  #[error("failed request from {provider}, returned status '{status}'")]
  Status { provider: Provider, status: String },
  #[error("unable to read {provider} response")]
  Extract {
    provider: Provider,
    #[source]
    source: extract::Error,
  },
  #[error("unable to parse 'loc' data from {provider}: '{value}'")]
  MalformedLoc { provider: Provider, value: String },
  #[error("{provider} returned a non-numeric {field}: '{value}'")]
  InvalidCoordinate {
    provider: Provider,
    field: &'static str,
    value: String,
  },
}

impl Error {
  pub(crate) fn extract(provider: Provider) -> impl Fn(extract::Error) -> Self {
    move |source| Self::Extract { provider, source }
  }
}

/// Parses coordinate text into degrees.
pub(crate) fn coordinate(
  provider: Provider,
  field: &'static str,
  value: &str,
) -> Result<f64, Error> {
  value
    .trim()
    .parse::<f64>()
    .map_err(|_| Error::InvalidCoordinate {
      provider,
      field,
      value: value.to_owned(),
    })
}
