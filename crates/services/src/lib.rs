#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod loader;
pub mod quiz_loop;
pub mod reporter;

pub use quiz_core::Clock;

pub use api::{HttpQuizApi, InMemoryQuizApi, QuestionRow, QuizApi};
pub use config::ApiConfig;
pub use error::{BankLoadError, ConfigError, LoadFailure, SessionError, StatsSubmitError};
pub use loader::QuestionBankLoader;
pub use quiz_loop::{QuizLoopService, QuizNextResult};
pub use reporter::ResultReporter;
