//! Messaging: contacts, conversations and the scripted assistant.

pub mod assistant;
pub mod contacts;
pub mod inbox;
pub mod model;
pub mod session;

pub use assistant::ScriptedAssistant;
pub use contacts::ContactList;
pub use inbox::Inbox;
pub use model::{ChatEvent, ChatMessage, Contact, Sender};
pub use session::ChatSession;
