use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizId, QuizVisibility};

use crate::api::QuizApi;
use crate::error::BankLoadError;

/// Fetches and validates the question bank of a quiz. One request, no retry.
#[derive(Clone)]
pub struct QuestionBankLoader {
    api: Arc<dyn QuizApi>,
}

impl QuestionBankLoader {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `BankLoadError` if the request fails or the rows do not form a
    /// playable bank (blank key, fewer than four distinct questions).
    pub async fn load(
        &self,
        visibility: QuizVisibility,
        quiz_id: QuizId,
    ) -> Result<QuestionBank, BankLoadError> {
        let rows = self.api.fetch_questions(visibility, quiz_id).await?;
        log::debug!("quiz {quiz_id}: received {} question rows", rows.len());
        Ok(QuestionBank::from_pairs(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryQuizApi;
    use quiz_core::model::{AnswerKey, BankError};
    use reqwest::StatusCode;

    #[tokio::test]
    async fn builds_bank_with_last_prompt_winning() {
        let api = InMemoryQuizApi::new();
        api.insert_quiz(
            QuizId::new(4),
            [("A", "p1"), ("B", "p2"), ("C", "p3"), ("A", "p4"), ("D", "p5")],
        );
        let loader = QuestionBankLoader::new(Arc::new(api.clone()));

        let bank = loader.load(QuizVisibility::Private, QuizId::new(4)).await.unwrap();

        assert_eq!(bank.len(), 4);
        let a = AnswerKey::parse("A").unwrap();
        assert_eq!(bank.prompt(&a).unwrap().as_str(), "p4");
        assert_eq!(api.fetches(), [(QuizVisibility::Private, QuizId::new(4))]);
    }

    #[tokio::test]
    async fn short_quiz_fails_like_a_transport_error() {
        let api = InMemoryQuizApi::new();
        api.insert_quiz(QuizId::new(4), [("A", "p1"), ("B", "p2")]);
        let loader = QuestionBankLoader::new(Arc::new(api));

        let err = loader.load(QuizVisibility::Public, QuizId::new(4)).await.unwrap_err();

        assert!(matches!(
            err,
            BankLoadError::Bank(BankError::TooShort { len: 2, min: 4 })
        ));
    }

    #[tokio::test]
    async fn server_error_is_surfaced_once() {
        let api = InMemoryQuizApi::new();
        api.fail_fetch_with(StatusCode::INTERNAL_SERVER_ERROR);
        let loader = QuestionBankLoader::new(Arc::new(api.clone()));

        let err = loader.load(QuizVisibility::Public, QuizId::new(1)).await.unwrap_err();

        assert!(matches!(
            err,
            BankLoadError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));
        assert_eq!(api.fetches().len(), 1);
    }
}
