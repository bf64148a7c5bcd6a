mod answer;
mod bank;
mod context;
mod ids;
mod stats;

pub use ids::{ParseIdError, QuizId, UserId};

pub use answer::{AnswerKey, AnswerKeyError, Prompt};
pub use bank::{BankError, MIN_BANK_SIZE, QuestionBank};
pub use context::{PlayContext, QuizVisibility, VisibilityError};
pub use stats::{QuizStats, StatsError};
