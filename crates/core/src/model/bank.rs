use std::collections::HashMap;

use thiserror::Error;

use crate::model::{AnswerKey, AnswerKeyError, Prompt};

/// Smallest bank a quiz can be played with: one correct answer plus three distractors.
pub const MIN_BANK_SIZE: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("quiz has {len} questions, at least {min} are required")]
    TooShort { len: usize, min: usize },

    #[error("entry {index} has an invalid answer key: {source}")]
    InvalidKey {
        index: usize,
        #[source]
        source: AnswerKeyError,
    },
}

/// Immutable mapping of answer key to prompt for one play-through.
///
/// Entries keep the order in which their key first appeared; a key seen twice
/// keeps its first position but takes the last prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    entries: Vec<(AnswerKey, Prompt)>,
    index: HashMap<AnswerKey, usize>,
}

impl QuestionBank {
    /// Build a bank from `(key, prompt)` pairs as delivered by the server.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidKey` for a blank key.
    /// Returns `BankError::TooShort` if fewer than `MIN_BANK_SIZE` distinct keys remain.
    pub fn from_pairs<K, P>(pairs: impl IntoIterator<Item = (K, P)>) -> Result<Self, BankError>
    where
        K: Into<String>,
        P: Into<String>,
    {
        let mut entries: Vec<(AnswerKey, Prompt)> = Vec::new();
        let mut index: HashMap<AnswerKey, usize> = HashMap::new();

        for (i, (key, prompt)) in pairs.into_iter().enumerate() {
            let key = AnswerKey::parse(key)
                .map_err(|source| BankError::InvalidKey { index: i, source })?;
            let prompt = Prompt::new(prompt);
            match index.get(&key) {
                Some(&slot) => entries[slot].1 = prompt,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, prompt));
                }
            }
        }

        if entries.len() < MIN_BANK_SIZE {
            return Err(BankError::TooShort {
                len: entries.len(),
                min: MIN_BANK_SIZE,
            });
        }

        Ok(Self { entries, index })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn prompt(&self, key: &AnswerKey) -> Option<&Prompt> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[must_use]
    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &AnswerKey> {
        self.entries.iter().map(|(key, _)| key)
    }
}
