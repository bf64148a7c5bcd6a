use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{QuizId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown quiz visibility: {0}")]
pub struct VisibilityError(String);

/// Whether a quiz is shared with every user or only playable by its author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizVisibility {
    Public,
    Private,
}

impl FromStr for QuizVisibility {
    type Err = VisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(VisibilityError(other.to_string())),
        }
    }
}

impl fmt::Display for QuizVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Private => f.write_str("private"),
        }
    }
}

/// Read-only facts about the quiz being played, provided by whoever hosts the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayContext {
    pub visibility: QuizVisibility,
    pub quiz_id: QuizId,
    pub title: String,
    pub subject: String,
    pub author_id: Option<UserId>,
    pub viewer_id: Option<UserId>,
}

impl PlayContext {
    #[must_use]
    pub fn new(visibility: QuizVisibility, quiz_id: QuizId, subject: impl Into<String>) -> Self {
        Self {
            visibility,
            quiz_id,
            title: String::new(),
            subject: subject.into(),
            author_id: None,
            viewer_id: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    #[must_use]
    pub fn with_viewer(mut self, viewer_id: UserId) -> Self {
        self.viewer_id = Some(viewer_id);
        self
    }

    /// Results are recorded only for public quizzes played by someone other than the author.
    #[must_use]
    pub fn reports_results(&self) -> bool {
        if self.visibility != QuizVisibility::Public {
            return false;
        }
        match (self.author_id, self.viewer_id) {
            (Some(author), Some(viewer)) => author != viewer,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public() -> PlayContext {
        PlayContext::new(QuizVisibility::Public, QuizId::new(3), "Droit civil")
    }

    #[test]
    fn visibility_parses_page_values() {
        assert_eq!("public".parse(), Ok(QuizVisibility::Public));
        assert_eq!("private\n".parse(), Ok(QuizVisibility::Private));
        assert!("shared".parse::<QuizVisibility>().is_err());
    }

    #[test]
    fn author_playing_own_public_quiz_is_not_reported() {
        let ctx = public().with_author(UserId::new(1)).with_viewer(UserId::new(1));
        assert!(!ctx.reports_results());
    }

    #[test]
    fn other_player_on_public_quiz_is_reported() {
        let ctx = public().with_author(UserId::new(1)).with_viewer(UserId::new(2));
        assert!(ctx.reports_results());
    }

    #[test]
    fn private_quiz_is_never_reported() {
        let ctx = PlayContext::new(QuizVisibility::Private, QuizId::new(3), "Droit civil")
            .with_author(UserId::new(1))
            .with_viewer(UserId::new(2));
        assert!(!ctx.reports_results());
    }
}
