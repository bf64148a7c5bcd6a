use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;

use quiz_core::model::{QuizId, QuizStats, QuizVisibility};

use super::{QuestionRow, QuizApi};
use crate::config::ApiConfig;
use crate::error::{BankLoadError, StatsSubmitError};

/// `QuizApi` backed by the quiz web server.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuizApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.session_cookie() {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_questions(
        &self,
        visibility: QuizVisibility,
        quiz_id: QuizId,
    ) -> Result<Vec<QuestionRow>, BankLoadError> {
        let url = self.config.questions_url(visibility).clone();
        let request = self
            .client
            .get(url)
            .query(&[("quiz_id", quiz_id.to_string())]);

        let response = self.with_session(request).send().await?;
        if !response.status().is_success() {
            return Err(BankLoadError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let rows: Vec<QuestionRow> = serde_json::from_slice(&body)?;
        Ok(rows)
    }

    async fn update_stats(&self, stats: &QuizStats) -> Result<(), StatsSubmitError> {
        let form = StatsForm::from(stats);
        let request = self.client.post(self.config.stats_url().clone()).form(&form);

        let response = self.with_session(request).send().await?;
        log::debug!("stats endpoint answered {}", response.status());
        Ok(())
    }
}

/// Form body expected by `/quiz/update_stats`.
#[derive(Debug, Serialize)]
struct StatsForm<'a> {
    matiere: &'a str,
    #[serde(rename = "posées")]
    served: u32,
    #[serde(rename = "trouvées")]
    found: u32,
    quiz_id: u64,
}

impl<'a> From<&'a QuizStats> for StatsForm<'a> {
    fn from(stats: &'a QuizStats) -> Self {
        Self {
            matiere: stats.subject(),
            served: stats.questions_served(),
            found: stats.questions_correct(),
            quiz_id: stats.quiz_id().value(),
        }
    }
}
