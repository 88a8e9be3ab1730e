//! Configuration structures for the roadwatch notifier.
//!
//! The configuration is split into three sections: the watched route, the
//! TomTom routing API and the Telegram bot API. Values are layered from
//! several sources, the later ones overriding the earlier ones:
//!
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. environment variables prefixed with `ROADWATCH_`, nested with `__`
//!    (e.g. `ROADWATCH_TOMTOM__TIMEOUT=5`)
//! 4. flat, unprefixed environment variables
//!    (`START_COORD`, `DESTINATION_COORD`, `TOMTOM_API_KEY`, `TELEGRAM_TOKEN`,
//!    `MY_CHAT_ID`, `ROUTE_NAME`, `START_NAME`, `DESTINATION_NAME`,
//!    `ALWAYS_NOTIFY`)
//!
//! # Configuration File Format
//!
//! ```yaml
//! always_notify: true
//!
//! route:
//!   name: "Daily school pickup"
//!   start: "52.3676,4.9041"
//!   start_name: "Home"
//!   destination: "52.0907,5.1214"
//!   destination_name: "School"
//!
//! tomtom:
//!   api_key: "your-tomtom-key"
//!
//! telegram:
//!   token: "123456:bot-token"
//!   chat_id: "42"
//! ```
//!
//! Credentials are not validated here. Empty values are reported by the
//! component that needs them, when it needs them.

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Deserializer};

/// Flat environment variables and the configuration path they feed.
const LEGACY_ENV_KEYS: [(&str, &str); 9] = [
    ("START_COORD", "route.start"),
    ("DESTINATION_COORD", "route.destination"),
    ("ROUTE_NAME", "route.name"),
    ("START_NAME", "route.start_name"),
    ("DESTINATION_NAME", "route.destination_name"),
    ("TOMTOM_API_KEY", "tomtom.api_key"),
    ("TELEGRAM_TOKEN", "telegram.token"),
    ("MY_CHAT_ID", "telegram.chat_id"),
    ("ALWAYS_NOTIFY", "always_notify"),
];

/// Root configuration structure for roadwatch.
///
/// Built once at startup and then only read, passed by reference to the
/// routing client, the composer and the notifier.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    /// Watched route
    pub route: Route,
    /// TomTom routing API settings
    pub tomtom: TomTom,
    /// Telegram bot settings
    pub telegram: Telegram,
    /// Send a reassurance message when traffic is clear.
    ///
    /// When `false`, nothing is sent unless the delay is above the alert
    /// threshold.
    pub always_notify: bool,
}

/// The route between two fixed points.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Route {
    /// Display name of the route, used in the message header.
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Start coordinate as `"latitude,longitude"`.
    #[serde(deserialize_with = "lenient_string")]
    pub start: String,
    /// Display name of the start point.
    #[serde(deserialize_with = "lenient_string")]
    pub start_name: String,
    /// Destination coordinate as `"latitude,longitude"`.
    #[serde(deserialize_with = "lenient_string")]
    pub destination: String,
    /// Display name of the destination point.
    #[serde(deserialize_with = "lenient_string")]
    pub destination_name: String,
}

/// TomTom routing API settings.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct TomTom {
    /// API key sent as the `key` query parameter.
    #[serde(deserialize_with = "lenient_string")]
    pub api_key: String,
    /// Base URL of the routing API, without trailing slash.
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Telegram bot settings.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Telegram {
    /// Bot token, part of the request path.
    #[serde(deserialize_with = "lenient_string")]
    pub token: String,
    /// Recipient chat id.
    ///
    /// Telegram chat ids are integers, a numeric value is kept as its
    /// decimal representation.
    #[serde(deserialize_with = "lenient_string")]
    pub chat_id: String,
    /// Base URL of the bot API, without trailing slash.
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            route: Route::default(),
            tomtom: TomTom::default(),
            telegram: Telegram::default(),
            always_notify: true,
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route {
            name: "Daily commute".to_owned(),
            start: String::new(),
            start_name: "Home".to_owned(),
            destination: String::new(),
            destination_name: "Destination".to_owned(),
        }
    }
}

impl Default for TomTom {
    fn default() -> Self {
        TomTom {
            api_key: String::new(),
            url: "https://api.tomtom.com".to_owned(),
            timeout: 10,
        }
    }
}

impl Default for Telegram {
    fn default() -> Self {
        Telegram {
            token: String::new(),
            chat_id: String::new(),
            url: "https://api.telegram.org".to_owned(),
        }
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for TomTom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomTom")
            .field("api_key", &redact(&self.api_key))
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Debug for Telegram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telegram")
            .field("token", &redact(&self.token))
            .field("chat_id", &self.chat_id)
            .field("url", &self.url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<set>" }
}

impl Config {
    /// Builds the layered [`Figment`] described in the module documentation.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a YAML configuration file. A missing file
    ///   contributes nothing.
    pub fn figment(path: Option<&str>) -> Figment {
        let mut figment = Figment::new();

        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }

        let legacy_keys: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(key, _)| *key).collect();

        figment
            .merge(Env::prefixed("ROADWATCH_").split("__"))
            .merge(
                Env::raw()
                    .only(&legacy_keys)
                    .map(|key| legacy_env_path(key.as_str()).into()),
            )
    }

    /// Loads the configuration from defaults, the optional YAML file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] when the YAML file is malformed or a value
    /// has the wrong type (e.g. `ALWAYS_NOTIFY=maybe`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let config = Config::load(Some("roadwatch.yaml"))?;
    /// println!("watching {}", config.route.name);
    /// ```
    pub fn load(path: Option<&str>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

/// Maps a flat environment variable to its dotted configuration path.
fn legacy_env_path(key: &str) -> String {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(key))
        .map(|(_, path)| (*path).to_owned())
        .unwrap_or_else(|| key.to_lowercase())
}

/// Accepts any scalar where a string is expected.
///
/// Environment values are parsed into typed values, so `ROUTE_NAME=2024` or
/// `START_NAME=true` reach serde as a number or a bool. Both are kept as
/// their textual representation.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Signed(number) => number.to_string(),
        Raw::Unsigned(number) => number.to_string(),
        Raw::Float(number) => number.to_string(),
        Raw::Flag(flag) => flag.to_string(),
    })
}
