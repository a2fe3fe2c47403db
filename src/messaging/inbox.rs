//! The messages page: a contact sidebar plus one conversation per contact.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use super::assistant::ScriptedAssistant;
use super::contacts::ContactList;
use super::model::{ChatEvent, ChatMessage, Contact, Sender};
use super::session::{ChatSession, DEFAULT_EVENT_CAPACITY};
use crate::error::ChatError;

/// Conversations are opened lazily and all live until the inbox is dropped,
/// so switching contacts does not cancel a reply that is on its way.
pub struct Inbox {
    contacts: ContactList,
    sessions: HashMap<String, ChatSession>,
    selected: Option<String>,
    assistant: Arc<ScriptedAssistant>,
    assistant_history: Vec<ChatMessage>,
    tx: broadcast::Sender<ChatEvent>,
}

impl Inbox {
    /// The first contact in sidebar order starts selected.
    pub fn new(
        mut contacts: Vec<Contact>,
        assistant: Arc<ScriptedAssistant>,
        assistant_history: Vec<ChatMessage>,
    ) -> Self {
        for contact in contacts.iter_mut().filter(|c| c.assistant) {
            contact.name = assistant.name().to_string();
        }
        let contacts = ContactList::new(contacts);
        let selected = contacts.visible().first().map(|c| c.id.clone());
        let (tx, _rx) = broadcast::channel(DEFAULT_EVENT_CAPACITY);

        Self {
            contacts,
            sessions: HashMap::new(),
            selected,
            assistant,
            assistant_history,
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    pub fn contacts(&self) -> &ContactList {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ContactList {
        &mut self.contacts
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected
            .as_deref()
            .and_then(|id| self.contacts.get(id).ok())
    }

    /// Switch the open conversation.
    pub fn select(&mut self, id: &str) -> Result<&Contact, ChatError> {
        self.contacts.get(id)?;
        info!(contact_id = %id, "Conversation selected");
        self.selected = Some(id.to_string());
        self.open(id)?;
        self.contacts.get(id)
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// Transcript of the open conversation.
    pub async fn transcript(&mut self) -> Result<Vec<ChatMessage>, ChatError> {
        let id = self.selected.clone().ok_or(ChatError::NoConversation)?;
        Ok(self.open(&id)?.messages().await)
    }

    /// Send to the open conversation. Blank text is ignored and yields `Ok(None)`.
    pub async fn send(&mut self, text: &str) -> Result<Option<ChatMessage>, ChatError> {
        let id = self.selected.clone().ok_or(ChatError::NoConversation)?;
        let sent = self.open(&id)?.send(text).await;
        if let Some(message) = &sent {
            self.contacts
                .record_message(&id, &message.text, message.timestamp)?;
        }
        Ok(sent)
    }

    /// Replies still in flight across all conversations.
    pub fn pending_replies(&self) -> usize {
        self.sessions
            .values()
            .map(ChatSession::pending_replies)
            .sum()
    }

    fn open(&mut self, id: &str) -> Result<&mut ChatSession, ChatError> {
        if !self.sessions.contains_key(id) {
            let contact = self.contacts.get(id)?;
            let session = if contact.assistant {
                ChatSession::new(id, self.tx.clone())
                    .with_assistant(Arc::clone(&self.assistant))
                    .with_history(self.assistant_history.clone())
            } else {
                let opener = ChatMessage::at(
                    Sender::Contact,
                    &contact.last_message,
                    contact.last_message_at,
                );
                ChatSession::new(id, self.tx.clone()).with_history(vec![opener])
            };
            self.sessions.insert(id.to_string(), session);
        }
        self.sessions
            .get_mut(id)
            .ok_or_else(|| ChatError::UnknownContact { id: id.to_string() })
    }
}

impl std::fmt::Debug for Inbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inbox")
            .field("contacts", &self.contacts.all().len())
            .field("open_sessions", &self.sessions.len())
            .field("selected", &self.selected)
            .finish()
    }
}
