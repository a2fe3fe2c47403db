//! Conversations sidebar: search, unread-first ordering and the pinned assistant.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::model::Contact;
use crate::error::ChatError;

#[derive(Debug, Clone)]
pub struct ContactList {
    contacts: Vec<Contact>,
    search_text: String,
    assistant_pinned: bool,
}

impl ContactList {
    /// The assistant starts pinned.
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            contacts,
            search_text: String::new(),
            assistant_pinned: true,
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_assistant_pinned(&self) -> bool {
        self.assistant_pinned
    }

    /// Flip the pin. Returns the new state.
    pub fn toggle_pin(&mut self) -> bool {
        self.assistant_pinned = !self.assistant_pinned;
        debug!(pinned = self.assistant_pinned, "Assistant pin toggled");
        self.assistant_pinned
    }

    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: &str) -> Result<&Contact, ChatError> {
        self.contacts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ChatError::UnknownContact { id: id.to_string() })
    }

    pub fn assistant(&self) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.assistant)
    }

    /// Record the latest message on a conversation so the preview and ordering follow it.
    pub fn record_message(
        &mut self,
        id: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<(), ChatError> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ChatError::UnknownContact { id: id.to_string() })?;
        contact.last_message = text.to_string();
        contact.last_message_at = at;
        Ok(())
    }

    /// Contacts as the sidebar shows them.
    ///
    /// Names are matched case-insensitively. Humans are ordered by unread count,
    /// then by most recent message. The assistant goes first while pinned and
    /// last otherwise.
    pub fn visible(&self) -> Vec<&Contact> {
        let needle = self.search_text.to_lowercase();
        let matched = self
            .contacts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle));

        let (assistants, mut others): (Vec<&Contact>, Vec<&Contact>) =
            matched.partition(|c| c.assistant);
        others.sort_by(|a, b| compare_activity(a, b));

        if self.assistant_pinned {
            assistants.into_iter().chain(others).collect()
        } else {
            others.into_iter().chain(assistants).collect()
        }
    }
}

fn compare_activity(a: &Contact, b: &Contact) -> Ordering {
    b.unread_count
        .cmp(&a.unread_count)
        .then_with(|| b.last_message_at.cmp(&a.last_message_at))
}
