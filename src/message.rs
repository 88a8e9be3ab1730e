//! Notification text composition.
//!
//! Messages are plain text with emoji markers, ending with a Google Maps
//! directions link. The output only depends on its inputs, so identical
//! route data always produces the same text.

use crate::{
    config::Config,
    routing::{RouteSummary, format_distance, format_time},
};

/// Traffic delay, in seconds, above which an alert is composed.
pub const DELAY_THRESHOLD_SECONDS: u64 = 300;

/// Returns `true` when the primary route delay is strictly above
/// [`DELAY_THRESHOLD_SECONDS`].
pub fn is_alert(primary: &RouteSummary) -> bool {
    primary.traffic_delay_seconds > DELAY_THRESHOLD_SECONDS
}

/// Composes the notification for the primary route and its optional
/// alternative.
///
/// An alert compares both routes and recommends the faster one. A clear
/// message only reassures and gives the primary route figures. The
/// alternative is ignored for clear messages.
///
/// # Arguments
///
/// * `primary` - Summary of the first route returned by the routing API
/// * `alternative` - Summary of the second route, if any
/// * `config` - Configuration providing labels and coordinates
///
/// # Examples
///
/// ```
/// let message = compose(&primary, None, &config);
/// assert!(message.starts_with("🚗 "));
/// ```
pub fn compose(
    primary: &RouteSummary,
    alternative: Option<&RouteSummary>,
    config: &Config,
) -> String {
    let primary_name = format!("Primary Route{}", primary.label);

    let body = if is_alert(primary) {
        format_alert(primary, &primary_name, alternative)
    } else {
        format!(
            "✅ Traffic is clear!\n\n🛣️ {}\n📏 {} | ⏱️ {}",
            primary_name,
            format_distance(primary.length_meters),
            format_time(primary.travel_time_seconds)
        )
    };

    format!(
        "{}\n{}\n\n🗺️ [Open in Google Maps]({})",
        format_header(config),
        body,
        maps_link(config)
    )
}

fn format_header(config: &Config) -> String {
    format!(
        "🚗 {}\n📍 {} → {}\n",
        config.route.name, config.route.start_name, config.route.destination_name
    )
}

fn format_alert(
    primary: &RouteSummary,
    primary_name: &str,
    alternative: Option<&RouteSummary>,
) -> String {
    let mut alert = format!(
        "⚠️ Traffic Alert!\n\n🛣️ {}\n📏 {} | ⏱️ {} | 🚦 +{} delay",
        primary_name,
        format_distance(primary.length_meters),
        format_time(primary.travel_time_seconds),
        format_time(primary.traffic_delay_seconds)
    );

    let Some(alternative) = alternative else {
        alert.push_str("\n\n📌 No alternative route available.");
        return alert;
    };

    let alternative_name = format!("Alternative{}", alternative.label);
    alert.push_str(&format!(
        "\n\n🛣️ {}\n📏 {} | ⏱️ {}",
        alternative_name,
        format_distance(alternative.length_meters),
        format_time(alternative.travel_time_seconds)
    ));

    // Strictly faster only, a tie keeps the primary route.
    if alternative.travel_time_seconds < primary.travel_time_seconds {
        let saved = primary.travel_time_seconds - alternative.travel_time_seconds;
        alert.push_str(&format!(
            "\n\n💡 RECOMMENDATION: Take {}! Saves {}.",
            alternative_name,
            format_time(saved)
        ));
    } else {
        alert.push_str(&format!(
            "\n\n📌 RECOMMENDATION: {} is still fastest despite delay.",
            primary_name
        ));
    }

    alert
}

/// Google Maps directions between the configured coordinates.
fn maps_link(config: &Config) -> String {
    format!(
        "https://www.google.com/maps/dir/{}/{}",
        config.route.start, config.route.destination
    )
}
