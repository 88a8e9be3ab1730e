//! One traffic check, from route fetch to notification.
//!
//! ```text
//! fetch routes → summarize routes[0] and routes[1] → compose → notify
//! ```
//!
//! Fetch failures and missing credentials end the run with an error. A
//! message the messaging API refuses is only logged: the check itself
//! succeeded.

use anyhow::Context;
use log::{error, info, warn};

use crate::{
    config::Config,
    message::{compose, is_alert},
    notify::Notifier,
    routing::{RouteProvider, RouteSummary},
};

/// How a check ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The routing API returned no route.
    NoRoutes,
    /// Traffic is clear and reassurance messages are disabled.
    Quiet,
    /// The message was delivered.
    Sent,
    /// The message was composed but could not be delivered.
    DeliveryFailed,
}

/// Runs a single traffic check against a [`RouteProvider`] and a [`Notifier`].
///
/// # Examples
///
/// ```no_run
/// let watcher = Watcher::new(&config, TomTomRequester::new(&config)?, TelegramNotifier::new(&config));
/// let outcome = watcher.run().await?;
/// ```
pub struct Watcher<'a, P: RouteProvider, N: Notifier> {
    /// Immutable configuration shared with the composer
    config: &'a Config,
    /// Route data source
    route_provider: P,
    /// Message sink
    notifier: N,
}

impl<'a, P: RouteProvider, N: Notifier> Watcher<'a, P, N> {
    /// Create a new [Watcher].
    pub fn new(config: &'a Config, route_provider: P, notifier: N) -> Self {
        Watcher {
            config,
            route_provider,
            notifier,
        }
    }

    /// Fetches the routes, composes the message and sends it.
    ///
    /// Only `routes[0]` (primary) and `routes[1]` (alternative) are read.
    ///
    /// # Errors
    ///
    /// Returns an error when the routes cannot be fetched or when a
    /// credential is missing. Delivery failures are not errors, they are
    /// reported as [`Outcome::DeliveryFailed`].
    pub async fn run(&self) -> Result<Outcome, anyhow::Error> {
        let response = self
            .route_provider
            .fetch_routes()
            .await
            .context("failed to fetch routes")?;

        let Some(primary_route) = response.routes.first() else {
            warn!("no routes found");
            return Ok(Outcome::NoRoutes);
        };

        let primary = RouteSummary::from(primary_route);
        let alternative = response.routes.get(1).map(RouteSummary::from);

        info!("Primary Route{}: {}", primary.label, primary);
        if let Some(alternative) = &alternative {
            info!("Alternative{}: {}", alternative.label, alternative);
        }

        if !is_alert(&primary) && !self.config.always_notify {
            info!("traffic is clear, no message sent");
            return Ok(Outcome::Quiet);
        }

        let message = compose(&primary, alternative.as_ref(), self.config);

        match self.notifier.send(&message).await {
            Ok(()) => Ok(Outcome::Sent),
            Err(err) if err.is_fatal() => Err(err).context("failed to send message"),
            Err(err) => {
                error!("{:#}", anyhow::Error::new(err));
                Ok(Outcome::DeliveryFailed)
            }
        }
    }
}
