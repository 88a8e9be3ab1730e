//! Message delivery.
//!
//! # Modules
//!
//! - `telegram` - [`Notifier`] trait and the Telegram bot API client
//! - `console` - Dry-run notifier printing to standard output

mod console;
mod telegram;

pub use crate::notify::console::ConsoleNotifier;
#[cfg(test)]
pub use crate::notify::telegram::MockNotifier;
pub use crate::notify::telegram::{Notifier, TelegramNotifier};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while delivering a message.
///
/// Only a missing credential ends the run, see [`NotifyError::is_fatal`].
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No bot token or no recipient configured.
    #[error("TELEGRAM_TOKEN or MY_CHAT_ID not set")]
    MissingCredentials,

    /// The messaging API answered with a non-200 status.
    #[error("error sending Telegram message ({status}): {body}")]
    Rejected {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, verbatim.
        body: String,
    },

    /// Transport failure.
    ///
    /// The request URL is stripped, its path carries the bot token.
    #[error("error sending Telegram message")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.without_url())
    }
}

impl NotifyError {
    /// Whether the error must stop the run.
    ///
    /// Delivery is best-effort: once the traffic check is done a rejected or
    /// lost message is only reported.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NotifyError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fatal() {
        assert!(NotifyError::MissingCredentials.is_fatal());
        assert!(
            !NotifyError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "oops".to_owned(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_rejected_display_contains_body() {
        let err = NotifyError::Rejected {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"ok":false,"description":"chat not found"}"#.to_owned(),
        };

        let display = format!("{}", err);
        assert!(display.contains("400 Bad Request"));
        assert!(display.contains("chat not found"));
    }
}
