//! ip-api.com, CSV format.
//!
//! The record is `status,country,countryCode,region,regionName,city,zip,
//! lat,lon,timezone,isp,org,as,query` followed by a newline.

use super::{coordinate, Error, GeoSample, Observation, Provider, Reading};
use crate::extract::csv_field;

pub const URL: &str = "http://ip-api.com/csv/";

const STATUS: usize = 1;
const LATITUDE: usize = 8;
const LONGITUDE: usize = 9;
const QUERY: usize = 14;

/// Reads the sample and the caller's public IP.
///
/// # Errors
/// - [`Error::Status`] when the status field is not `success`
/// - [`Error::Extract`] when a field cannot be read
/// - [`Error::InvalidCoordinate`] when latitude or longitude is not a number
pub fn parse(body: &str) -> Result<Observation, Error> {
  let field = |index: usize| {
    csv_field(body, index).map_err(Error::extract(Provider::IpApi))
  };

  if let Some(reading) = Provider::IpApi.check_status(csv_field(body, STATUS))? {
    return Ok(Observation {
      reading,
      public_ip: None,
    });
  }

  let latitude = coordinate(Provider::IpApi, "latitude", &field(LATITUDE)?)?;
  let longitude = coordinate(Provider::IpApi, "longitude", &field(LONGITUDE)?)?;
  let public_ip = strip_newline(field(QUERY)?);

  Ok(Observation {
    reading: Reading::Located(GeoSample::new(latitude, longitude)),
    public_ip: Some(public_ip),
  })
}

fn strip_newline(mut value: String) -> String {
  if value.ends_with('\n') {
    value.pop();
    if value.ends_with('\r') {
      value.pop();
    }
  }
  value
}
