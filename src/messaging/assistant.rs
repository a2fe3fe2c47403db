//! The scripted assistant. It answers every message with the same text after a fixed delay.

use std::time::Duration;

use super::model::{ChatMessage, Sender};
use crate::config::{AppConfig, DEFAULT_ASSISTANT_NAME, DEFAULT_ASSISTANT_REPLY};

#[derive(Debug, Clone)]
pub struct ScriptedAssistant {
    name: String,
    reply: String,
    delay: Duration,
}

impl Default for ScriptedAssistant {
    fn default() -> Self {
        Self {
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            reply: DEFAULT_ASSISTANT_REPLY.to_string(),
            delay: Duration::from_millis(1000),
        }
    }
}

impl ScriptedAssistant {
    pub fn new(name: impl Into<String>, reply: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            reply: reply.into(),
            delay,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.assistant_name.clone(),
            config.assistant_reply.clone(),
            config.assistant_reply_delay,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The reply to any user message, stamped now.
    pub fn reply_message(&self) -> ChatMessage {
        ChatMessage::new(Sender::Assistant, self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_fixed_text_from_assistant() {
        let assistant = ScriptedAssistant::default();
        let a = assistant.reply_message();
        let b = assistant.reply_message();
        assert_eq!(a.sender, Sender::Assistant);
        assert_eq!(a.text, DEFAULT_ASSISTANT_REPLY);
        assert_eq!(a.text, b.text);
        assert_ne!(a.id, b.id);
        assert_eq!(assistant.delay(), Duration::from_secs(1));
    }

    #[test]
    fn config_overrides_name_and_delay() {
        let config = AppConfig {
            assistant_name: "Study Buddy".into(),
            assistant_reply_delay: Duration::from_millis(250),
            ..AppConfig::default()
        };
        let assistant = ScriptedAssistant::from_config(&config);
        assert_eq!(assistant.name(), "Study Buddy");
        assert_eq!(assistant.delay(), Duration::from_millis(250));
    }
}
