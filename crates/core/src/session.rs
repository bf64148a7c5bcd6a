//! One play-through of a quiz as an explicit state machine.
//!
//! The session never renders anything. Callers feed it events through the
//! `on_*` transition functions and read `snapshot()` to draw the screen.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

use crate::Clock;
use crate::error::Error;
use crate::model::{AnswerKey, PlayContext, Prompt, QuestionBank, QuizStats};
use crate::selector::{DistractorSelector, Draw, OPTIONS_PER_QUESTION, ServedQuestion};

/// Attempt budget every question starts with. A wrong answer on the last
/// attempt ends the question.
pub const ATTEMPTS_PER_QUESTION: u8 = 1;

//
// ─── STATES & OUTCOMES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Correct,
    IncorrectFinal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    AwaitingAnswer,
    Resolved(Resolution),
    Complete,
    /// The question bank could not be loaded; the player is sent away.
    Failed,
}

/// Message shown after an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Missed { correct: AnswerKey },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Answering was locked or no question is in play.
    Ignored,
    Resolved(Resolution),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    Ignored,
    Question,
    Complete(QuizCompletion),
}

/// Score as displayed on the end screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: usize,
    pub total: usize,
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

/// Everything known once the pool is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizCompletion {
    pub final_score: FinalScore,
    pub questions_served: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Present only when the play context asks for results to be recorded.
    pub stats: Option<QuizStats>,
}

/// Progress bar state: questions already resolved out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}

/// Read-only view of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub prompt: Option<Prompt>,
    pub options: Option<[AnswerKey; OPTIONS_PER_QUESTION]>,
    pub score: usize,
    pub attempts_remaining: u8,
    pub answering_locked: bool,
    pub feedback: Option<Feedback>,
    pub show_next: bool,
    pub progress: Progress,
    pub final_score: Option<FinalScore>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

struct Loaded {
    bank: QuestionBank,
    selector: DistractorSelector,
}

pub struct QuizSession {
    context: PlayContext,
    clock: Clock,
    rng: StdRng,
    loaded: Option<Loaded>,
    phase: SessionPhase,
    score: usize,
    attempts_remaining: u8,
    current: Option<ServedQuestion>,
    answering_locked: bool,
    feedback: Option<Feedback>,
    show_next: bool,
    progress: Progress,
    started_at: Option<DateTime<Utc>>,
    completion: Option<QuizCompletion>,
}

impl QuizSession {
    /// Create a session waiting for its question bank.
    #[must_use]
    pub fn new(context: PlayContext, clock: Clock) -> Self {
        Self::with_rng(context, clock, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create a session whose question order is reproducible.
    #[must_use]
    pub fn with_seed(context: PlayContext, clock: Clock, seed: u64) -> Self {
        Self::with_rng(context, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(context: PlayContext, clock: Clock, rng: StdRng) -> Self {
        Self {
            context,
            clock,
            rng,
            loaded: None,
            phase: SessionPhase::Loading,
            score: 0,
            attempts_remaining: ATTEMPTS_PER_QUESTION,
            current: None,
            answering_locked: true,
            feedback: None,
            show_next: false,
            progress: Progress::default(),
            started_at: None,
            completion: None,
        }
    }

    #[must_use]
    pub fn context(&self) -> &PlayContext {
        &self.context
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> u8 {
        self.attempts_remaining
    }

    #[must_use]
    pub fn is_answering_locked(&self) -> bool {
        self.answering_locked
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// Question currently in play, including its correct answer.
    #[must_use]
    pub fn current_question(&self) -> Option<&ServedQuestion> {
        self.current.as_ref()
    }

    /// Number of questions in the bank, zero until it is loaded.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.bank.len())
    }

    #[must_use]
    pub fn pool(&self) -> &[AnswerKey] {
        self.loaded.as_ref().map(|l| l.selector.pool()).unwrap_or_default()
    }

    #[must_use]
    pub fn asked(&self) -> &[AnswerKey] {
        self.loaded.as_ref().map(|l| l.selector.asked()).unwrap_or_default()
    }

    #[must_use]
    pub fn completion(&self) -> Option<&QuizCompletion> {
        self.completion.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            prompt: self.current.as_ref().map(|q| q.prompt.clone()),
            options: self.current.as_ref().map(|q| q.options.clone()),
            score: self.score,
            attempts_remaining: self.attempts_remaining,
            answering_locked: self.answering_locked,
            feedback: self.feedback.clone(),
            show_next: self.show_next,
            progress: self.progress,
            final_score: self.completion.as_ref().map(|c| c.final_score),
        }
    }

    /// Loading → AwaitingAnswer with the first question.
    ///
    /// Ignored outside `Loading`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Selection` if no question can be drawn from `bank`;
    /// the session moves to `Failed`.
    pub fn on_load_success(&mut self, bank: QuestionBank) -> Result<(), Error> {
        if self.phase != SessionPhase::Loading {
            log::debug!("load result ignored in phase {:?}", self.phase);
            return Ok(());
        }

        log::info!(
            "quiz {} loaded with {} questions",
            self.context.quiz_id,
            bank.len()
        );
        let selector = DistractorSelector::new(&bank);
        self.loaded = Some(Loaded { bank, selector });
        self.started_at = Some(self.clock.now());

        if let Err(err) = self.serve_next() {
            self.phase = SessionPhase::Failed;
            return Err(err);
        }
        Ok(())
    }

    /// Loading → Failed.
    pub fn on_load_failure(&mut self) {
        if self.phase == SessionPhase::Loading {
            self.phase = SessionPhase::Failed;
        }
    }

    /// Resolve a click on one of the options.
    pub fn on_answer_selected(&mut self, selection: &AnswerKey) -> AnswerOutcome {
        if self.phase != SessionPhase::AwaitingAnswer || self.answering_locked {
            return AnswerOutcome::Ignored;
        }
        let (Some(current), Some(loaded)) = (self.current.as_ref(), self.loaded.as_mut()) else {
            return AnswerOutcome::Ignored;
        };
        if !current.options.contains(selection) {
            return AnswerOutcome::Ignored;
        }

        if *selection == current.correct {
            self.answering_locked = true;
            self.score += 1;
            loaded.selector.record_asked(current.correct.clone());
            self.feedback = Some(Feedback::Correct);
            self.show_next = true;
            self.phase = SessionPhase::Resolved(Resolution::Correct);
            log::debug!("{} answered correctly, score {}", current.correct, self.score);
            return AnswerOutcome::Resolved(Resolution::Correct);
        }

        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        self.answering_locked = true;
        loaded.selector.record_asked(current.correct.clone());
        self.feedback = Some(Feedback::Missed {
            correct: current.correct.clone(),
        });
        self.show_next = true;
        self.phase = SessionPhase::Resolved(Resolution::IncorrectFinal);
        log::debug!("{} missed", current.correct);
        AnswerOutcome::Resolved(Resolution::IncorrectFinal)
    }

    /// Resolved → next question, or Complete once the pool is empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Selection` if the next question cannot be drawn, or
    /// `Error::Stats` if final counts cannot be reported. The session keeps
    /// its state in both cases.
    pub fn on_next_clicked(&mut self) -> Result<NextOutcome, Error> {
        if !matches!(self.phase, SessionPhase::Resolved(_)) {
            return Ok(NextOutcome::Ignored);
        }
        self.serve_next()
    }

    fn serve_next(&mut self) -> Result<NextOutcome, Error> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(NextOutcome::Ignored);
        };

        match loaded.selector.next(&loaded.bank, &mut self.rng)? {
            Draw::Question(question) => {
                self.progress = Progress {
                    answered: loaded.selector.asked().len(),
                    total: loaded.bank.len(),
                };
                self.current = Some(question);
                self.attempts_remaining = ATTEMPTS_PER_QUESTION;
                self.feedback = None;
                self.show_next = false;
                self.answering_locked = false;
                self.phase = SessionPhase::AwaitingAnswer;
                Ok(NextOutcome::Question)
            }
            Draw::PoolExhausted => self.complete().map(NextOutcome::Complete),
        }
    }

    fn complete(&mut self) -> Result<QuizCompletion, Error> {
        let (served, total) = self
            .loaded
            .as_ref()
            .map_or((0, 0), |l| (l.selector.asked().len(), l.bank.len()));

        let stats = if self.context.reports_results() {
            Some(QuizStats::from_counts(
                self.context.subject.clone(),
                served,
                self.score,
                self.context.quiz_id,
            )?)
        } else {
            None
        };

        let completed_at = self.clock.now();
        let completion = QuizCompletion {
            final_score: FinalScore {
                score: self.score,
                total,
            },
            questions_served: served,
            started_at: self.started_at.unwrap_or(completed_at),
            completed_at,
            stats,
        };

        self.progress = Progress {
            answered: served,
            total: served,
        };
        self.current = None;
        self.answering_locked = true;
        self.show_next = false;
        self.feedback = None;
        self.phase = SessionPhase::Complete;
        self.completion = Some(completion.clone());

        log::info!(
            "quiz {} complete: {} in {}s",
            self.context.quiz_id,
            completion.final_score,
            self.clock.elapsed_since(completion.started_at).num_seconds()
        );
        Ok(completion)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.context.quiz_id)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("attempts_remaining", &self.attempts_remaining)
            .field("answering_locked", &self.answering_locked)
            .field("pool_len", &self.pool().len())
            .field("asked_len", &self.asked().len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
