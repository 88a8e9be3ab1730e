//! Dry-run notifier.

use log::info;

use crate::notify::{Notifier, NotifyError};

/// Prints messages to standard output instead of sending them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!("dry run, message not sent");
        println!("{}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_never_fails() {
        assert!(ConsoleNotifier.send("🚗 Daily commute").await.is_ok());
    }
}
