//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::{ActivityError, LessonId};

/// Errors emitted by the progress store.
///
/// Persistence failures never show up here; they are logged and absorbed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("reset token is unknown, stale or already used")]
    InvalidResetToken,
}

/// Errors emitted by `LessonFlowService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonFlowError {
    #[error("lesson {0} is not part of the course")]
    NotFound(LessonId),
    #[error("lesson {0} has no activity")]
    NoActivity(LessonId),
    #[error(transparent)]
    Activity(#[from] ActivityError),
}
