use serde::{Deserialize, Serialize};

use crate::utils::constants::EARTH_RADIUS_KM;

/// How the haversine term `a` is clamped when rounding pushes it below zero.
///
/// `a` is mathematically in `[0, 1]`; values above 1 are always clamped to 1.
/// `LegacyOne` reproduces older results where a negative `a` was clamped to 1,
/// which reports half the circumference for (near) coincident points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaversineClamp {
    #[default]
    Zero,
    LegacyOne,
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance_with_clamp(lat1, lon1, lat2, lon2, HaversineClamp::Zero)
}

pub fn haversine_distance_with_clamp(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    clamp: HaversineClamp,
) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let a = clamp_haversine_term(a, clamp);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

fn clamp_haversine_term(a: f64, clamp: HaversineClamp) -> f64 {
    if a > 1.0 {
        1.0
    } else if a < 0.0 {
        match clamp {
            HaversineClamp::Zero => 0.0,
            HaversineClamp::LegacyOne => 1.0,
        }
    } else {
        a
    }
}
