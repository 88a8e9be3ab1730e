//! TomTom routing integration.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the TomTom `calculateRoute` endpoint
//! - `response_structs` - Deserialization structures for the API response
//! - `summary` - Condensed [`RouteSummary`] and the time/distance formatters

mod requester;
mod response_structs;
mod summary;

#[cfg(test)]
pub use crate::routing::requester::MockRouteProvider;
pub use crate::routing::requester::{RouteProvider, TomTomRequester};
#[cfg(test)]
pub use crate::routing::response_structs::{
    Guidance, Instruction, Route, RouteResponse, RouteSummaryResponse,
};
pub use crate::routing::summary::{RouteSummary, format_distance, format_time};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while fetching routes. All of them end the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No TomTom API key configured.
    #[error("TOMTOM_API_KEY not set")]
    MissingApiKey,

    /// The routing API answered with a non-200 status.
    #[error("error fetching traffic data ({status}): {body}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, verbatim.
        body: String,
    },

    /// Transport failure or malformed response body.
    ///
    /// The request URL is stripped, it carries the API key.
    #[error("error fetching traffic data")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err.without_url())
    }
}
