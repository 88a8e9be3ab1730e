//! Response structures for the TomTom `calculateRoute` endpoint.
//!
//! Only the fields roadwatch reads are declared, everything else in the
//! response is ignored.

use serde::Deserialize;
use std::fmt;

/// Body of `/routing/1/calculateRoute/{start}:{destination}/json`.
#[derive(Deserialize, Debug, Default)]
pub struct RouteResponse {
    /// Candidate routes, the primary route first.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One candidate route.
#[derive(Deserialize, Debug)]
pub struct Route {
    /// Timing and length of the route.
    pub summary: RouteSummaryResponse,
    /// Turn-by-turn guidance, only present when instructions were requested.
    #[serde(default)]
    pub guidance: Option<Guidance>,
}

/// Summary block of a route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummaryResponse {
    /// Estimated travel time including traffic.
    pub travel_time_in_seconds: u64,
    /// Extra travel time caused by traffic. Absent when there is none.
    #[serde(default)]
    pub traffic_delay_in_seconds: u64,
    /// Route length.
    pub length_in_meters: u64,
}

/// Guidance block of a route.
#[derive(Deserialize, Debug, Default)]
pub struct Guidance {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// A single guidance instruction.
#[derive(Deserialize, Debug)]
pub struct Instruction {
    /// Name of the street the instruction refers to, if any.
    #[serde(default)]
    pub street: Option<String>,
}

impl fmt::Display for RouteSummaryResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "travel_time={}s, traffic_delay={}s, length={}m",
            self.travel_time_in_seconds, self.traffic_delay_in_seconds, self.length_in_meters
        )
    }
}

impl fmt::Display for RouteResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let summaries = self
            .routes
            .iter()
            .map(|route| format!("[{}]", route.summary))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "routes={}", summaries)
    }
}
