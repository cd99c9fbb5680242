//! Notification transport.
//!
//! Delivery backends are enum-dispatched: async methods are not
//! dyn-compatible, so the update cycle holds a [`Transport`] value and
//! matches on it. The transport is handed one rendered string per
//! destination and does not know or care how it was produced.

use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// A delivery backend for rendered notifications.
pub enum Transport {
    /// Telegram Bot API.
    Telegram(TelegramTransport),
    /// Print to stdout instead of delivering (dry runs).
    Console(ConsoleTransport),
}

impl Transport {
    /// Deliver one rendered message to one destination.
    ///
    /// Delivery is fire-and-forget from the cycle's point of view: a
    /// non-2xx response is an error, but no retry happens here.
    pub async fn deliver(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        match self {
            Self::Telegram(t) => t.deliver(chat_id, text).await,
            Self::Console(t) => {
                t.deliver(chat_id, text);
                Ok(())
            }
        }
    }

    /// Backend name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Telegram(_) => "telegram",
            Self::Console(_) => "console",
        }
    }
}

/// Sends messages through the Telegram Bot API.
pub struct TelegramTransport {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramTransport {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    async fn deliver(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(target: "talkwatch::telegram", chat_id, "message delivered");
        Ok(())
    }
}

/// Echoes messages to stdout instead of delivering them.
pub struct ConsoleTransport;

impl ConsoleTransport {
    fn deliver(&self, chat_id: i64, text: &str) {
        println!("--- message for chat {chat_id} ---");
        println!("{text}");
    }
}
