use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerKeyError {
    #[error("answer key must not be blank")]
    Blank,
}

/// Identifier of one question unit, e.g. the name of a court ruling.
///
/// The key doubles as the label of the option the player picks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey(String);

impl AnswerKey {
    /// # Errors
    ///
    /// Returns `AnswerKeyError::Blank` for empty or whitespace-only keys.
    pub fn parse(s: impl Into<String>) -> Result<Self, AnswerKeyError> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(AnswerKeyError::Blank);
        }
        Ok(Self(s))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerKey({:?})", self.0)
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Question text shown for an `AnswerKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected() {
        assert_eq!(AnswerKey::parse("  "), Err(AnswerKeyError::Blank));
        assert_eq!(AnswerKey::parse(""), Err(AnswerKeyError::Blank));
    }

    #[test]
    fn key_keeps_raw_text() {
        let key = AnswerKey::parse(" Blanco ").unwrap();
        assert_eq!(key.as_str(), " Blanco ");
        assert_eq!(key.to_string(), " Blanco ");
    }
}
