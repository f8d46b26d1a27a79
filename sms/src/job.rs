//! SMS job schema.

use serde::{Deserialize, Serialize};

/// An SMS job: one or more messages, each with its own recipients
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

impl Job {
    pub fn new(messages: Vec<Message>, options: Option<Options>) -> Self {
        Self { messages, options }
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Destination number, international format.
    pub dst: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_ref: String,
    /// ISO 8601 periods during which this recipient must not be messaged.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blackout_periods: Vec<String>,
}

impl Recipient {
    pub fn new(dst: impl Into<String>) -> Self {
        Self {
            dst: dst.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub recipients: Vec<Recipient>,
}

impl Message {
    pub fn new(text: impl Into<String>, recipients: Vec<Recipient>) -> Self {
        Self {
            text: text.into(),
            recipients,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "UTF-16")]
    Utf16,
}

/// Handling of characters the standard encoding cannot carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidCharacters {
    Refuse,
    Replace,
    #[serde(rename = "TO_UTF16")]
    ToUtf16,
    Transliterate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qos {
    Normal,
    Express,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Sender id shown to the recipient.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub billcode: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub status_requested: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flash: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_characters: Option<InvalidCharacters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<Qos>,
    /// Earliest send time, ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_period: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate_detection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blackout_periods: Vec<String>,
}
