//! Combines the provider samples into one position and an accuracy radius.
//!
//! The radius is a flat-Earth local approximation. One degree of latitude is
//! taken as 111.12 km everywhere and one degree of longitude as
//! `cos(latitude) * 111.12` km.
//!
//! The spread along each axis is measured as `|centroid| - |sample|`, not as
//! `|centroid - sample|`, and negative spreads are floored at zero. Samples
//! farther from the equator or meridian than the centroid therefore do not
//! widen the radius. Existing outputs depend on this, so it stays.

use serde::Serialize;

use crate::providers::GeoSample;

/// Kilometres per degree of latitude (60 nautical miles).
pub const KM_PER_DEGREE: f64 = 111.12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
  pub centroid_latitude: f64,
  pub centroid_longitude: f64,
  pub radius_km: f64,
}

/// Averages the samples and derives the accuracy radius in kilometres.
#[must_use]
pub fn aggregate(samples: &[GeoSample; 3]) -> Estimate {
  let count = samples.len() as f64;
  let centroid_latitude = samples.iter().map(|s| s.latitude).sum::<f64>() / count;
  let centroid_longitude =
    samples.iter().map(|s| s.longitude).sum::<f64>() / count;

  let (max_lat, max_lon) =
    samples.iter().fold((0.0_f64, 0.0_f64), |(max_lat, max_lon), s| {
      (
        max_lat.max(centroid_latitude.abs() - s.latitude.abs()),
        max_lon.max(centroid_longitude.abs() - s.longitude.abs()),
      )
    });

  let radius_from_longitude =
    max_lon * centroid_latitude.to_radians().cos() * KM_PER_DEGREE;
  let radius_from_latitude = max_lat * KM_PER_DEGREE;

  Estimate {
    centroid_latitude,
    centroid_longitude,
    radius_km: radius_from_longitude.max(radius_from_latitude),
  }
}
