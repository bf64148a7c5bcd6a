use std::sync::Arc;

use tokio::task::JoinHandle;

use quiz_core::model::{AnswerKey, PlayContext};
use quiz_core::session::{AnswerOutcome, NextOutcome, QuizSession};

use crate::Clock;
use crate::api::QuizApi;
use crate::config::ApiConfig;
use crate::error::{BankLoadError, LoadFailure, SessionError};
use crate::loader::QuestionBankLoader;
use crate::reporter::ResultReporter;

/// Result of asking for the next question.
#[derive(Debug)]
pub struct QuizNextResult {
    pub outcome: NextOutcome,
    /// Detached stats submission, present when the session just completed and
    /// its results are recorded. Dropping it does not cancel the submission.
    pub report: Option<JoinHandle<()>>,
}

/// Orchestrates loading a quiz, driving its session and reporting its results.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    config: ApiConfig,
    loader: QuestionBankLoader,
    reporter: ResultReporter,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, config: ApiConfig, api: Arc<dyn QuizApi>) -> Self {
        Self {
            clock,
            config,
            loader: QuestionBankLoader::new(Arc::clone(&api)),
            reporter: ResultReporter::new(api),
            seed: None,
        }
    }

    /// Make question order reproducible across runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load the quiz described by `context` and serve its first question.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailure` carrying the error page the player must be sent to.
    pub async fn start(&self, context: PlayContext) -> Result<QuizSession, LoadFailure> {
        let mut session = match self.seed {
            Some(seed) => QuizSession::with_seed(context, self.clock, seed),
            None => QuizSession::new(context, self.clock),
        };
        let (visibility, quiz_id) = (session.context().visibility, session.context().quiz_id);

        let loaded = match self.loader.load(visibility, quiz_id).await {
            Ok(bank) => session.on_load_success(bank).map_err(BankLoadError::from),
            Err(err) => {
                session.on_load_failure();
                Err(err)
            }
        };

        match loaded {
            Ok(()) => Ok(session),
            Err(source) => {
                log::error!("quiz {quiz_id} ({visibility}) cannot be played: {source}");
                Err(LoadFailure {
                    redirect_to: self.config.length_error_url().clone(),
                    source,
                })
            }
        }
    }

    /// Forward a click on an option to the session.
    pub fn answer(&self, session: &mut QuizSession, selection: &AnswerKey) -> AnswerOutcome {
        let outcome = session.on_answer_selected(selection);
        if outcome == AnswerOutcome::Ignored {
            log::debug!("answer {selection} ignored in phase {:?}", session.phase());
        }
        outcome
    }

    /// Move past a resolved question; on completion, send results in the background.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the next question cannot be built.
    pub fn next(&self, session: &mut QuizSession) -> Result<QuizNextResult, SessionError> {
        let outcome = session.on_next_clicked()?;

        let report = match &outcome {
            NextOutcome::Complete(completion) => completion
                .stats
                .clone()
                .and_then(|stats| self.reporter.submit(stats)),
            _ => None,
        };

        Ok(QuizNextResult { outcome, report })
    }
}
