//! HTTP client for the TomTom routing API.
//!
//! This module provides the [`TomTomRequester`] struct requesting the traffic
//! aware routes between the configured start and destination.

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, StatusCode};

use crate::{
    config::Config,
    routing::{FetchError, response_structs::RouteResponse},
};

/// HTTP client for requesting routes from TomTom.
///
/// # Examples
///
/// ```no_run
/// let requester = TomTomRequester::new(&config)?;
/// let response = requester.fetch_routes().await?;
/// println!("{} routes", response.routes.len());
/// ```
pub struct TomTomRequester {
    /// TomTom API key
    api_key: String,
    /// Routing API base url
    url: String,
    /// Start coordinate, `"latitude,longitude"`
    start: String,
    /// Destination coordinate, `"latitude,longitude"`
    destination: String,
    /// HTTP client
    client: Client,
}

/// Source of route data.
///
/// This trait abstracts the HTTP call for easier testing with mocks.
#[automock]
pub trait RouteProvider {
    /// Fetches the primary route and at most one alternative.
    async fn fetch_routes(&self) -> Result<RouteResponse, FetchError>;
}

impl TomTomRequester {
    /// Create a new [TomTomRequester] from the configuration.
    ///
    /// The API key is not checked here, an empty key is reported by
    /// [`RouteProvider::fetch_routes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.tomtom.timeout))
            .build()?;

        Ok(TomTomRequester {
            api_key: config.tomtom.api_key.to_owned(),
            url: config.tomtom.url.trim_end_matches('/').to_owned(),
            start: config.route.start.to_owned(),
            destination: config.route.destination.to_owned(),
            client,
        })
    }

    fn route_url(&self) -> String {
        format!(
            "{}/routing/1/calculateRoute/{}:{}/json",
            &self.url, &self.start, &self.destination
        )
    }
}

impl RouteProvider for TomTomRequester {
    /// Request `/routing/1/calculateRoute/{start}:{destination}/json`.
    ///
    /// At most one alternative is requested, with live traffic and text
    /// guidance so the instructions carry street names:
    /// ```
    /// {
    ///   routes: [
    ///     { summary: { travelTimeInSeconds: 1200, trafficDelayInSeconds: 400, lengthInMeters: 12345 },
    ///       guidance: { instructions: [{ street: "A10" }, ...] } },
    ///     { summary: { ... } }
    ///   ]
    /// }
    /// ```
    ///
    /// A non-200 answer is returned as [`FetchError::Status`] with the body.
    async fn fetch_routes(&self) -> Result<RouteResponse, FetchError> {
        if self.api_key.is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        let url = self.route_url();
        info!("request routes {} -> {}", &self.start, &self.destination);
        debug!("request {}", &url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("maxAlternatives", "1"),
                ("traffic", "true"),
                ("routeType", "fastest"),
                ("language", "en-US"),
                ("instructionsType", "text"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            return Err(FetchError::Status { status, body });
        }

        let route_response: RouteResponse = response.json().await?;
        debug!("response from {} -> {}", &url, &route_response);

        Ok(route_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(url: &str, api_key: &str) -> Config {
        let mut config = Config::default();
        config.tomtom.url = url.to_owned();
        config.tomtom.api_key = api_key.to_owned();
        config.route.start = "52.3676,4.9041".to_owned();
        config.route.destination = "52.0907,5.1214".to_owned();
        config
    }

    #[tokio::test]
    async fn test_fetch_routes() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"routes": [
            {"summary": {"travelTimeInSeconds": 1200, "trafficDelayInSeconds": 400, "lengthInMeters": 12345},
             "guidance": {"instructions": [{"street": "A10"}, {"street": "A2"}]}},
            {"summary": {"travelTimeInSeconds": 900, "lengthInMeters": 15000}}
        ]}"#;

        let mock = server
            .mock(
                "GET",
                "/routing/1/calculateRoute/52.3676,4.9041:52.0907,5.1214/json",
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".to_owned(), "abcd".to_owned()),
                Matcher::UrlEncoded("maxAlternatives".to_owned(), "1".to_owned()),
                Matcher::UrlEncoded("traffic".to_owned(), "true".to_owned()),
                Matcher::UrlEncoded("routeType".to_owned(), "fastest".to_owned()),
                Matcher::UrlEncoded("language".to_owned(), "en-US".to_owned()),
                Matcher::UrlEncoded("instructionsType".to_owned(), "text".to_owned()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = TomTomRequester::new(&config(&server.url(), "abcd")).unwrap();
        let response = requester.fetch_routes().await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.routes.len(), 2);
        assert_eq!(response.routes[0].summary.travel_time_in_seconds, 1200);
        assert_eq!(response.routes[0].summary.traffic_delay_in_seconds, 400);
        assert_eq!(response.routes[1].summary.traffic_delay_in_seconds, 0);
    }

    #[tokio::test]
    async fn test_fetch_routes_error_status() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock(
                "GET",
                "/routing/1/calculateRoute/52.3676,4.9041:52.0907,5.1214/json",
            )
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let requester = TomTomRequester::new(&config(&server.url(), "abcd")).unwrap();
        let err = requester.fetch_routes().await.unwrap_err();

        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_routes_missing_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let requester = TomTomRequester::new(&config(&server.url(), "")).unwrap();
        let err = requester.fetch_routes().await.unwrap_err();

        assert!(matches!(err, FetchError::MissingApiKey));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_routes_malformed_body() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"routes": [{"summary": {"lengthInMeters": 10}}]}"#)
            .create_async()
            .await;

        let requester = TomTomRequester::new(&config(&server.url(), "abcd")).unwrap();
        let err = requester.fetch_routes().await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_routes_transport_error_hides_api_key() {
        // Nothing listens on port 1
        let requester =
            TomTomRequester::new(&config("http://127.0.0.1:1", "SUPERSECRETKEY")).unwrap();
        let err = requester.fetch_routes().await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
        let report = format!("{:#}", anyhow::Error::new(err));
        assert!(!report.contains("SUPERSECRETKEY"));
        assert!(report.starts_with("error fetching traffic data: "));
        assert_eq!(report.matches("error sending request").count(), 1);
    }

    #[test]
    fn test_route_url_trims_trailing_slash() {
        let requester = TomTomRequester::new(&config("https://api.tomtom.com/", "abcd")).unwrap();
        assert_eq!(
            requester.route_url(),
            "https://api.tomtom.com/routing/1/calculateRoute/52.3676,4.9041:52.0907,5.1214/json"
        );
    }
}
