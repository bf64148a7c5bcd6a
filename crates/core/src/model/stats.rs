use thiserror::Error;

use crate::model::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsError {
    #[error("correct answers ({correct}) exceed questions served ({served})")]
    CountMismatch { served: u32, correct: u32 },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Result of one finished play-through, as sent to the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStats {
    subject: String,
    questions_served: u32,
    questions_correct: u32,
    quiz_id: QuizId,
}

impl QuizStats {
    /// # Errors
    ///
    /// Returns `StatsError::CountMismatch` if `questions_correct > questions_served`.
    pub fn new(
        subject: impl Into<String>,
        questions_served: u32,
        questions_correct: u32,
        quiz_id: QuizId,
    ) -> Result<Self, StatsError> {
        if questions_correct > questions_served {
            return Err(StatsError::CountMismatch {
                served: questions_served,
                correct: questions_correct,
            });
        }
        Ok(Self {
            subject: subject.into(),
            questions_served,
            questions_correct,
            quiz_id,
        })
    }

    /// Build stats from session counters.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::TooManyQuestions` if a count cannot fit in `u32`.
    /// Returns `StatsError::CountMismatch` if more answers were found than served.
    pub fn from_counts(
        subject: impl Into<String>,
        served: usize,
        correct: usize,
        quiz_id: QuizId,
    ) -> Result<Self, StatsError> {
        let questions_served =
            u32::try_from(served).map_err(|_| StatsError::TooManyQuestions { len: served })?;
        let questions_correct =
            u32::try_from(correct).map_err(|_| StatsError::TooManyQuestions { len: correct })?;
        Self::new(subject, questions_served, questions_correct, quiz_id)
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn questions_served(&self) -> u32 {
        self.questions_served
    }

    #[must_use]
    pub fn questions_correct(&self) -> u32 {
        self.questions_correct
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_more_correct_than_served() {
        let err = QuizStats::new("Droit", 3, 4, QuizId::new(1)).unwrap_err();
        assert_eq!(err, StatsError::CountMismatch { served: 3, correct: 4 });
    }

    #[test]
    fn from_counts_keeps_values() {
        let stats = QuizStats::from_counts("Droit", 5, 3, QuizId::new(9)).unwrap();
        assert_eq!(stats.questions_served(), 5);
        assert_eq!(stats.questions_correct(), 3);
        assert_eq!(stats.subject(), "Droit");
        assert_eq!(stats.quiz_id(), QuizId::new(9));
    }
}
