//! The three-slot conversation prompt.
//!
//! | Slot | Content |
//! |------|---------|
//! | System | optional override, newline, default instructions |
//! | History | placeholder bound to the memory's history-slot name |
//! | Human | `{input}` |
//!
//! Built once per configuration and never mutated afterwards.

use saiachain_core::message::{Message, Role};
use serde::{Deserialize, Serialize};

/// Instructions every system slot ends with.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "The following is a friendly conversation between a human and an AI. The AI is talkative and provides lots of specific details from its context. If the AI does not know the answer to a question, it truthfully says it does not know.";

/// Variable the human slot is bound to.
pub const INPUT_KEY: &str = "input";

/// One slot of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageSlot {
    /// Fixed system text.
    System { template: String },
    /// Prior turns, injected under `variable_name`.
    History { variable_name: String },
    /// The user's message; `{input}` is substituted at format time.
    Human { template: String },
}

/// An ordered, immutable sequence of message slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    slots: Vec<MessageSlot>,
}

impl PromptTemplate {
    /// The conversation prompt: system, history, human.
    ///
    /// An empty override counts as no override.
    pub fn conversation(system_override: Option<&str>, memory_key: &str) -> Self {
        let system = match system_override.filter(|s| !s.is_empty()) {
            Some(prefix) => format!("{prefix}\n{DEFAULT_SYSTEM_MESSAGE}"),
            None => DEFAULT_SYSTEM_MESSAGE.to_string(),
        };

        Self {
            slots: vec![
                MessageSlot::System { template: system },
                MessageSlot::History {
                    variable_name: memory_key.to_string(),
                },
                MessageSlot::Human {
                    template: format!("{{{INPUT_KEY}}}"),
                },
            ],
        }
    }

    pub fn slots(&self) -> &[MessageSlot] {
        &self.slots
    }

    /// Text of the system slot.
    pub fn system_text(&self) -> Option<&str> {
        self.slots.iter().find_map(|slot| match slot {
            MessageSlot::System { template } => Some(template.as_str()),
            _ => None,
        })
    }

    /// Variable name of the history slot.
    pub fn memory_key(&self) -> Option<&str> {
        self.slots.iter().find_map(|slot| match slot {
            MessageSlot::History { variable_name } => Some(variable_name.as_str()),
            _ => None,
        })
    }

    /// Names the caller must supply when formatting, in slot order.
    pub fn input_variables(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                MessageSlot::History { variable_name } => Some(variable_name.as_str()),
                MessageSlot::Human { template } if template.contains(&format!("{{{INPUT_KEY}}}")) => {
                    Some(INPUT_KEY)
                }
                _ => None,
            })
            .collect()
    }

    /// Render the slots into concrete messages.
    pub fn format_messages(&self, history: &[Message], input: &str) -> Vec<Message> {
        let placeholder = format!("{{{INPUT_KEY}}}");
        let mut messages = Vec::with_capacity(history.len() + 2);

        for slot in &self.slots {
            match slot {
                MessageSlot::System { template } => messages.push(Message::system(template)),
                MessageSlot::History { .. } => messages.extend(
                    history
                        .iter()
                        .filter(|m| m.role != Role::System)
                        .cloned(),
                ),
                MessageSlot::Human { template } => {
                    messages.push(Message::user(template.replacen(&placeholder, input, 1)))
                }
            }
        }

        messages
    }

    /// JSON form of the template, for hosts that display it.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
