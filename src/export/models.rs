// Export models: Rust structs that map to the Telegram desktop JSON export.
//
// The export is loosely typed: `text` may be a plain string, a list of rich
// fragments, or missing entirely, and `date_unixtime` is a string in recent
// exports but an integer in some older ones. These types pin that down so the
// rest of the crate never has to poke at raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Message type tag carried by ordinary user messages.
pub const MESSAGE_TYPE: &str = "message";

/// Entity type tag for unformatted text fragments.
pub const PLAIN_ENTITY_TYPE: &str = "plain";

/// One conversation: display name plus its full message history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chat {
    /// Display name. Missing or null names (e.g. "Saved Messages" in some
    /// exports) become the empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    pub messages: Vec<Message>,
}

/// A single record in a chat's message list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    /// "message" for user messages, "service" for joins, pins, calls etc.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: MessageText,
    #[serde(default)]
    pub text_entities: Vec<TextEntity>,
    /// Send time as unix seconds.
    #[serde(default, deserialize_with = "unixtime")]
    pub date_unixtime: Option<i64>,
}

/// The `text` field of a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MessageText {
    /// Plain string, the only variant the tokenizer reads.
    Plain(String),
    /// Formatted text exported as a list of fragments, or any other
    /// non-string value.
    Rich(Value),
    /// Field missing or null.
    #[default]
    Absent,
}

/// A typed fragment of message text (`{"type": "plain", "text": "..."}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl Chat {
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }
}

impl Message {
    /// A user message with plain string text and a matching plain entity.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: MESSAGE_TYPE.to_string(),
            text_entities: vec![TextEntity {
                kind: PLAIN_ENTITY_TYPE.to_string(),
                text: text.clone(),
            }],
            text: MessageText::Plain(text),
            date_unixtime: None,
        }
    }

    /// A service event (join, pin, call) with no analyzable text.
    pub fn service() -> Self {
        Self {
            kind: "service".to_string(),
            text: MessageText::Plain(String::new()),
            text_entities: Vec::new(),
            date_unixtime: None,
        }
    }

    /// Set the send time (unix seconds).
    pub fn at(mut self, unixtime: i64) -> Self {
        self.date_unixtime = Some(unixtime);
        self
    }

    /// Whether this is an ordinary user message rather than a service event.
    pub fn is_message(&self) -> bool {
        self.kind == MESSAGE_TYPE
    }

    /// The text to analyze, or `None` when the field is absent or not a
    /// plain string.
    pub fn plain_text(&self) -> Option<&str> {
        match &self.text {
            MessageText::Plain(text) => Some(text),
            MessageText::Rich(_) | MessageText::Absent => None,
        }
    }

    /// Concatenation of all plain text entities, each prefixed by a space.
    pub fn plain_entity_text(&self) -> String {
        let mut out = String::new();
        for entity in &self.text_entities {
            if entity.kind == PLAIN_ENTITY_TYPE {
                out.push(' ');
                out.push_str(&entity.text);
            }
        }
        out
    }
}

impl<'de> Deserialize<'de> for MessageText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => Self::Plain(text),
            Some(other) => Self::Rich(other),
        })
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `"1650000000"`, `1650000000`, or null. Unparseable strings become
/// `None` rather than failing the whole archive.
fn unixtime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    })
}
