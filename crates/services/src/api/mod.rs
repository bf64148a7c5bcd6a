//! Contract with the quiz server.

use async_trait::async_trait;
use quiz_core::model::{QuizId, QuizStats, QuizVisibility};

use crate::error::{BankLoadError, StatsSubmitError};

mod http;
mod memory;

pub use http::HttpQuizApi;
pub use memory::InMemoryQuizApi;

/// One `[answerKey, prompt]` pair as delivered by the questions endpoint.
pub type QuestionRow = (String, String);

#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Fetch the raw question rows of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` on transport failure, non-2xx status or an
    /// unreadable payload.
    async fn fetch_questions(
        &self,
        visibility: QuizVisibility,
        quiz_id: QuizId,
    ) -> Result<Vec<QuestionRow>, BankLoadError>;

    /// Record the outcome of a finished play-through.
    ///
    /// The response status is not inspected; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `StatsSubmitError` if the request could not be sent.
    async fn update_stats(&self, stats: &QuizStats) -> Result<(), StatsSubmitError>;
}
