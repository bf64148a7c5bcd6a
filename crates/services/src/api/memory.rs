use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quiz_core::model::{QuizId, QuizStats, QuizVisibility};

use super::{QuestionRow, QuizApi};
use crate::error::{BankLoadError, StatsSubmitError};

#[derive(Default)]
struct State {
    quizzes: HashMap<QuizId, Vec<QuestionRow>>,
    fetch_status: Option<StatusCode>,
    stats_unavailable: bool,
    fetches: Vec<(QuizVisibility, QuizId)>,
    submitted: Vec<QuizStats>,
}

/// Simple in-memory quiz server for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuizApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryQuizApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for `quiz_id`, replacing any previous rows.
    pub fn insert_quiz<K, P>(&self, quiz_id: QuizId, rows: impl IntoIterator<Item = (K, P)>)
    where
        K: Into<String>,
        P: Into<String>,
    {
        if let Ok(mut state) = self.state.lock() {
            let rows = rows.into_iter().map(|(k, p)| (k.into(), p.into())).collect();
            state.quizzes.insert(quiz_id, rows);
        }
    }

    /// Answer every question request with `status`, as a failing server would.
    pub fn fail_fetch_with(&self, status: StatusCode) {
        if let Ok(mut state) = self.state.lock() {
            state.fetch_status = Some(status);
        }
    }

    /// Make stats submissions fail as if the server were unreachable.
    pub fn fail_stats(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.stats_unavailable = true;
        }
    }

    /// Question requests received so far.
    #[must_use]
    pub fn fetches(&self) -> Vec<(QuizVisibility, QuizId)> {
        self.state
            .lock()
            .map(|state| state.fetches.clone())
            .unwrap_or_default()
    }

    /// Stats accepted so far.
    #[must_use]
    pub fn submitted(&self) -> Vec<QuizStats> {
        self.state
            .lock()
            .map(|state| state.submitted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuizApi for InMemoryQuizApi {
    async fn fetch_questions(
        &self,
        visibility: QuizVisibility,
        quiz_id: QuizId,
    ) -> Result<Vec<QuestionRow>, BankLoadError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| BankLoadError::Connection(e.to_string()))?;
        state.fetches.push((visibility, quiz_id));
        if let Some(status) = state.fetch_status {
            return Err(BankLoadError::HttpStatus(status));
        }
        state
            .quizzes
            .get(&quiz_id)
            .cloned()
            .ok_or(BankLoadError::HttpStatus(StatusCode::NOT_FOUND))
    }

    async fn update_stats(&self, stats: &QuizStats) -> Result<(), StatsSubmitError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StatsSubmitError::Connection(e.to_string()))?;
        if state.stats_unavailable {
            return Err(StatsSubmitError::Connection("stats endpoint unreachable".into()));
        }
        state.submitted.push(stats.clone());
        Ok(())
    }
}
