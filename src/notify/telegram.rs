//! Telegram bot API client.

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::{config::Config, notify::NotifyError};

/// Delivers a composed message to its recipient.
///
/// This trait abstracts the HTTP call for easier testing with mocks.
#[automock]
pub trait Notifier {
    /// Sends `text` to the configured recipient.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// HTTP client posting messages through the Telegram bot API.
///
/// # Examples
///
/// ```no_run
/// let notifier = TelegramNotifier::new(&config);
/// notifier.send("Traffic is clear!").await?;
/// ```
pub struct TelegramNotifier {
    /// Bot token
    token: String,
    /// Recipient chat id
    chat_id: String,
    /// Bot API base url
    url: String,
    /// HTTP client
    client: Client,
}

/// Body of `sendMessage`.
#[derive(Serialize, Debug)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramNotifier {
    /// Create a new [TelegramNotifier] from the configuration.
    ///
    /// Token and chat id are not checked here, they are checked when sending.
    pub fn new(config: &Config) -> Self {
        TelegramNotifier {
            token: config.telegram.token.to_owned(),
            chat_id: config.telegram.chat_id.to_owned(),
            url: config.telegram.url.trim_end_matches('/').to_owned(),
            client: Client::new(),
        }
    }
}

impl Notifier for TelegramNotifier {
    /// Post `{chat_id, text}` to `/bot{token}/sendMessage`.
    ///
    /// Any status other than 200 is returned as [`NotifyError::Rejected`]
    /// with the response body.
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        if self.token.is_empty() || self.chat_id.is_empty() {
            return Err(NotifyError::MissingCredentials);
        }

        let url = format!("{}/bot{}/sendMessage", &self.url, &self.token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        info!("send telegram message to chat {}", &self.chat_id);
        debug!("message payload {:?}", &payload);

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            return Err(NotifyError::Rejected { status, body });
        }

        info!("telegram message sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(url: &str, token: &str, chat_id: &str) -> Config {
        let mut config = Config::default();
        config.telegram.url = url.to_owned();
        config.telegram.token = token.to_owned();
        config.telegram.chat_id = chat_id.to_owned();
        config
    }

    #[tokio::test]
    async fn test_send() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "chat_id": "42",
                "text": "Traffic is clear!"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(&config(&server.url(), "123:abc", "42"));
        notifier.send("Traffic is clear!").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(&config(&server.url(), "123:abc", "42"));
        let err = notifier.send("hello").await.unwrap_err();

        assert!(!err.is_fatal());
        match err {
            NotifyError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_transport_error_hides_token() {
        // Nothing listens on port 1
        let notifier =
            TelegramNotifier::new(&config("http://127.0.0.1:1", "123:SECRETTOKEN", "42"));
        let err = notifier.send("hello").await.unwrap_err();

        assert!(!err.is_fatal());
        let report = format!("{:#}", anyhow::Error::new(err));
        assert!(!report.contains("SECRETTOKEN"));
        assert!(report.starts_with("error sending Telegram message: "));
        assert_eq!(report.matches("error sending request").count(), 1);
    }

    #[tokio::test]
    async fn test_send_missing_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(&config(&server.url(), "", "42"));
        let err = notifier.send("hello").await.unwrap_err();

        assert!(matches!(err, NotifyError::MissingCredentials));
        assert!(err.is_fatal());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_missing_chat_id() {
        let notifier = TelegramNotifier::new(&config("http://127.0.0.1:1", "123:abc", ""));
        let err = notifier.send("hello").await.unwrap_err();

        assert!(matches!(err, NotifyError::MissingCredentials));
    }
}
