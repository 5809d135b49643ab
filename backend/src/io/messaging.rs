//! Outbound message capability.
//!
//! The core never talks to a transport itself. It hands the finished message
//! body to a [`MessageSender`]; recipient and delivery belong to the sender.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// Something that can deliver an absence message body
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, body: &str) -> Result<()>;
}

/// A text message ready for the platform SMS composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsDraft {
    pub recipient: String,
    pub body: String,
}

/// Hands absence messages to the app shell as SMS drafts for the school number
#[derive(Debug, Clone)]
pub struct SmsDraftSender {
    recipient: String,
    drafts: mpsc::Sender<SmsDraft>,
}

impl SmsDraftSender {
    pub fn new(recipient: impl Into<String>, drafts: mpsc::Sender<SmsDraft>) -> Self {
        Self {
            recipient: recipient.into(),
            drafts,
        }
    }

    /// Sender plus the receiving end the shell listens on
    pub fn channel(recipient: impl Into<String>, buffer: usize) -> (Self, mpsc::Receiver<SmsDraft>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(recipient, tx), rx)
    }
}

#[async_trait]
impl MessageSender for SmsDraftSender {
    async fn send_message(&self, body: &str) -> Result<()> {
        if self.recipient.trim().is_empty() {
            return Err(anyhow!("no school SMS number configured"));
        }

        let draft = SmsDraft {
            recipient: self.recipient.clone(),
            body: body.to_string(),
        };
        self.drafts
            .send(draft)
            .await
            .map_err(|_| anyhow!("SMS composer is not listening"))?;

        info!("Handed absence SMS ({} chars) to composer for {}", body.len(), self.recipient);
        Ok(())
    }
}
