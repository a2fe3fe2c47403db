//! One open conversation, with the assistant's delayed replies.
//!
//! Messages live behind an `Arc<RwLock<..>>` so a pending reply task can
//! append to them after its delay. The session owns those tasks: cancelling
//! or dropping the session aborts every reply that has not landed yet.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::assistant::ScriptedAssistant;
use super::model::{ChatEvent, ChatMessage, Sender};

/// Default broadcast channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

pub struct ChatSession {
    contact_id: String,
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    tx: broadcast::Sender<ChatEvent>,
    assistant: Option<Arc<ScriptedAssistant>>,
    pending: Vec<JoinHandle<()>>,
}

impl ChatSession {
    /// Open a conversation that publishes on `tx`.
    pub fn new(contact_id: impl Into<String>, tx: broadcast::Sender<ChatEvent>) -> Self {
        Self {
            contact_id: contact_id.into(),
            messages: Arc::new(RwLock::new(Vec::new())),
            tx,
            assistant: None,
            pending: Vec::new(),
        }
    }

    /// Open a conversation with its own event channel.
    pub fn standalone(contact_id: impl Into<String>) -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self::new(contact_id, tx)
    }

    /// Builder: have the scripted assistant answer every message.
    pub fn with_assistant(mut self, assistant: Arc<ScriptedAssistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Builder: start from an existing transcript.
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.messages = Arc::new(RwLock::new(history));
        self
    }

    pub fn contact_id(&self) -> &str {
        &self.contact_id
    }

    pub fn is_assistant(&self) -> bool {
        self.assistant.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    /// Snapshot of the transcript.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Send a message as the user.
    ///
    /// Blank text is ignored and returns `None`. In an assistant conversation
    /// this also schedules the scripted reply.
    pub async fn send(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            debug!(contact_id = %self.contact_id, "Ignoring blank message");
            return None;
        }

        let message = ChatMessage::new(Sender::User, text);
        self.append(message.clone()).await;
        info!(contact_id = %self.contact_id, message_id = %message.id, "Message sent");

        if let Some(assistant) = self.assistant.clone() {
            self.schedule_reply(assistant);
        }
        Some(message)
    }

    /// Append a message written by the other side.
    pub async fn receive(&self, text: &str) -> ChatMessage {
        let sender = if self.is_assistant() {
            Sender::Assistant
        } else {
            Sender::Contact
        };
        let message = ChatMessage::new(sender, text);
        self.append(message.clone()).await;
        message
    }

    async fn append(&self, message: ChatMessage) {
        self.messages.write().await.push(message.clone());
        let _ = self.tx.send(ChatEvent::MessageAdded {
            contact_id: self.contact_id.clone(),
            message,
        });
    }

    fn schedule_reply(&mut self, assistant: Arc<ScriptedAssistant>) {
        self.pending.retain(|h| !h.is_finished());

        let delay = assistant.delay();
        let messages = Arc::clone(&self.messages);
        let tx = self.tx.clone();
        let contact_id = self.contact_id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = assistant.reply_message();
            messages.write().await.push(reply.clone());
            info!(contact_id = %contact_id, message_id = %reply.id, "Assistant reply delivered");
            let _ = tx.send(ChatEvent::MessageAdded {
                contact_id,
                message: reply,
            });
        });
        self.pending.push(handle);

        info!(
            contact_id = %self.contact_id,
            delay_ms = delay.as_millis() as u64,
            "Assistant reply scheduled"
        );
        let _ = self.tx.send(ChatEvent::ReplyScheduled {
            contact_id: self.contact_id.clone(),
            delay_ms: delay.as_millis() as u64,
        });
    }

    /// Replies scheduled but not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort every reply that has not landed. Returns how many were dropped.
    pub fn cancel_pending(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in self.pending.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            info!(contact_id = %self.contact_id, cancelled, "Pending assistant replies aborted");
            let _ = self.tx.send(ChatEvent::ReplyCancelled {
                contact_id: self.contact_id.clone(),
            });
        }
        cancelled
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("contact_id", &self.contact_id)
            .field("assistant", &self.assistant.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}
