//! tools.keycdn.com geo lookup, JSON with bare-number coordinates.

use tracing::debug;

use super::{coordinate, Error, GeoSample, Observation, Provider, Reading};
use crate::extract::Mode;

pub const URL: &str = "https://tools.keycdn.com/geo.json";

/// Reads the sample.
///
/// A status other than `success`, or a status that cannot be read at all,
/// is not an error: the reading comes back [`Reading::Unavailable`].
///
/// # Errors
/// [`Error::Extract`] or [`Error::InvalidCoordinate`] when the status is
/// `success` but a coordinate cannot be read.
pub fn parse(body: &str, mode: Mode) -> Result<Observation, Error> {
  let status = mode.string_value(body, "status");
  if let Some(reading) = Provider::KeyCdn.check_status(status)? {
    return Ok(Observation {
      reading,
      public_ip: None,
    });
  }
  debug!(provider = %Provider::KeyCdn, "status ok");

  let field = |key: &str| {
    mode
      .number_value(body, key)
      .map_err(Error::extract(Provider::KeyCdn))
  };
  let latitude = coordinate(Provider::KeyCdn, "latitude", &field("latitude")?)?;
  let longitude = coordinate(Provider::KeyCdn, "longitude", &field("longitude")?)?;

  Ok(Observation {
    reading: Reading::Located(GeoSample::new(latitude, longitude)),
    public_ip: None,
  })
}
