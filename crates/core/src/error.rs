use thiserror::Error;

use crate::model::StatsError;
use crate::selector::SelectionError;

/// Failures a quiz session can hit while moving between questions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}
