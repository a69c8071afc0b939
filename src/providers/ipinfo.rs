//! ipinfo.io, JSON with both coordinates in one `"loc": "lat,lon"` string.

use super::{coordinate, Error, GeoSample, Observation, Provider, Reading};
use crate::extract::Mode;

pub const URL: &str = "https://ipinfo.io";

/// Reads the sample from the `loc` field.
///
/// # Errors
/// - [`Error::Extract`] when `loc` cannot be read
/// - [`Error::MalformedLoc`] when `loc` has no comma
/// - [`Error::InvalidCoordinate`] when either half is not a number
pub fn parse(body: &str, mode: Mode) -> Result<Observation, Error> {
  let loc = mode
    .string_value(body, "loc")
    .map_err(Error::extract(Provider::IpInfo))?;

  let Some((latitude, longitude)) = loc.split_once(',') else {
    return Err(Error::MalformedLoc {
      provider: Provider::IpInfo,
      value: loc,
    });
  };

  let sample = GeoSample::new(
    coordinate(Provider::IpInfo, "latitude", latitude)?,
    coordinate(Provider::IpInfo, "longitude", longitude)?,
  );

  Ok(Observation {
    reading: Reading::Located(sample),
    public_ip: None,
  })
}
