//! Condensed view of a route and the formatting helpers shared with the
//! message composer.

use std::fmt;

use crate::routing::response_structs::Route;

/// Maximum number of road names kept in a route label.
const MAX_ROAD_NAMES: usize = 2;

/// Travel time, delay, length and road label of one candidate route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteSummary {
    /// Travel time including traffic, in seconds.
    pub travel_time_seconds: u64,
    /// Extra travel time caused by traffic, in seconds.
    pub traffic_delay_seconds: u64,
    /// Route length in meters.
    pub length_meters: u64,
    /// `" via A, B"`, `" via A"` or an empty string.
    pub label: String,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        RouteSummary {
            travel_time_seconds: route.summary.travel_time_in_seconds,
            traffic_delay_seconds: route.summary.traffic_delay_in_seconds,
            length_meters: route.summary.length_in_meters,
            label: road_label(route),
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {} (Delay: {})",
            format_distance(self.length_meters),
            format_time(self.travel_time_seconds),
            format_time(self.traffic_delay_seconds)
        )
    }
}

/// Builds a label from the first distinct street names of the guidance.
///
/// Streets are taken in instruction order, duplicates and empty names are
/// skipped, and at most [`MAX_ROAD_NAMES`] are kept. No weighting by distance.
fn road_label(route: &Route) -> String {
    let Some(guidance) = &route.guidance else {
        return String::new();
    };

    let mut road_names: Vec<&str> = Vec::with_capacity(MAX_ROAD_NAMES);
    for street in guidance
        .instructions
        .iter()
        .filter_map(|instruction| instruction.street.as_deref())
        .filter(|street| !street.is_empty())
    {
        if road_names.contains(&street) {
            continue;
        }
        road_names.push(street);
        if road_names.len() >= MAX_ROAD_NAMES {
            break;
        }
    }

    if road_names.is_empty() {
        return String::new();
    }
    format!(" via {}", road_names.join(", "))
}

/// Formats a duration as whole minutes, rounded down.
///
/// # Examples
///
/// ```
/// assert_eq!(format_time(299), "4 min");
/// ```
pub fn format_time(seconds: u64) -> String {
    format!("{} min", seconds / 60)
}

/// Formats a length in kilometers with one decimal.
///
/// # Examples
///
/// ```
/// assert_eq!(format_distance(1234), "1.2 km");
/// ```
pub fn format_distance(meters: u64) -> String {
    format!("{:.1} km", meters as f64 / 1000.0)
}
