/*!
 * Decoded translation declarations.
 *
 * A declaration body is decoded into `RawDeclaration` (the JSON shape the
 * source authors write) and normalized once into an `Entry`, so the rest of
 * the pipeline never has to branch on "string or list of strings".
 */

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ValidationError;

/// A message given either as one string or as a list of lines
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrSequence {
    /// Plain string
    Text(String),
    /// Lines joined with `\n`
    Lines(Vec<String>),
}

impl StringOrSequence {
    /// Collapse into a single string
    pub fn normalize(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.join("\n"),
        }
    }
}

/// Body of a `t({...})` declaration as written in the source file.
///
/// Keys are also accepted capitalized or uppercase; a `null` message,
/// plural form or `msgs` map decodes as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDeclaration {
    #[serde(alias = "Code", alias = "CODE")]
    pub code: String,
    #[serde(alias = "Desc", alias = "DESC")]
    pub desc: String,
    #[serde(alias = "Msg", alias = "MSG")]
    pub msg: Option<StringOrSequence>,
    #[serde(alias = "Msgs", alias = "MSGS")]
    pub msgs: Option<BTreeMap<String, Option<StringOrSequence>>>,
}

/// Borrowed view of an entry's translatable payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation<'a> {
    /// Single message
    Singular(&'a str),
    /// Plural form name to message
    Plural(&'a BTreeMap<String, String>),
}

/// One decoded translation declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// `file:line` where the declaration's marker begins
    pub location: String,
    /// Logical translation key
    pub code: String,
    /// Singular message, empty when the declaration is plural
    pub message: String,
    /// Plural messages, empty when the declaration is singular
    pub messages: BTreeMap<String, String>,
    /// Optional context for translators
    pub description: String,
}

impl Entry {
    pub(crate) fn from_raw(location: String, raw: RawDeclaration) -> Self {
        Self {
            location,
            code: raw.code,
            message: raw.msg.map(StringOrSequence::normalize).unwrap_or_default(),
            messages: raw
                .msgs
                .unwrap_or_default()
                .into_iter()
                .map(|(form, text)| (form, text.map(StringOrSequence::normalize).unwrap_or_default()))
                .collect(),
            description: raw.desc,
        }
    }

    /// Whether any plural form carries text
    pub fn has_plural_content(&self) -> bool {
        self.messages.values().any(|m| !m.is_empty())
    }

    /// The payload written to catalogs: plural when any plural form exists
    pub fn translation(&self) -> Translation<'_> {
        if self.messages.is_empty() {
            Translation::Singular(&self.message)
        } else {
            Translation::Plural(&self.messages)
        }
    }

    /// Check the required fields of a decoded entry
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.is_empty() {
            return Err(ValidationError::MissingCode {
                location: self.location.clone(),
                entry: format!("{:?}", self),
            });
        }

        if self.message.is_empty() && !self.has_plural_content() {
            return Err(ValidationError::MissingMessage {
                location: self.location.clone(),
                entry: format!("{:?}", self),
            });
        }

        Ok(())
    }

    /// Same translatable content: both singular and equal, or both plural and equal.
    /// A singular entry never matches a plural one.
    pub fn content_eq(&self, other: &Entry) -> bool {
        if !self.message.is_empty() && !other.message.is_empty() {
            return self.message == other.message;
        }
        if !self.messages.is_empty() && !other.messages.is_empty() {
            return self.messages == other.messages;
        }
        false
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.translation() {
            Translation::Singular(message) => {
                write!(f, "{}: (singular) {:?}", self.location, message)
            }
            Translation::Plural(messages) => {
                write!(f, "{}: (plural) {:?}", self.location, messages)
            }
        }
    }
}
