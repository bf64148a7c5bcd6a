use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use quiz_core::model::QuizStats;

use crate::api::QuizApi;

/// Best-effort delivery of final results.
///
/// Each submission runs as its own detached task: it is sent once, failures
/// are logged, and nothing waits for it.
#[derive(Clone)]
pub struct ResultReporter {
    api: Arc<dyn QuizApi>,
}

impl ResultReporter {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Spawn the submission on the current tokio runtime.
    ///
    /// Returns the task handle, which callers may drop. Returns `None` when
    /// called outside a runtime; the results are then dropped with a warning.
    pub fn submit(&self, stats: QuizStats) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            log::warn!(
                "no async runtime, stats for quiz {} not sent",
                stats.quiz_id()
            );
            return None;
        };

        let api = Arc::clone(&self.api);
        Some(runtime.spawn(async move {
            match api.update_stats(&stats).await {
                Ok(()) => log::info!(
                    "stats sent for quiz {}: {}/{}",
                    stats.quiz_id(),
                    stats.questions_correct(),
                    stats.questions_served()
                ),
                Err(err) => log::warn!("stats update for quiz {} failed: {err}", stats.quiz_id()),
            }
        }))
    }
}
