#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_flow;
pub mod progress_service;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use error::{LessonFlowError, ProgressError};
pub use lesson_flow::{CompletionOutcome, FinalProjectState, LessonFlowService, LessonVisit};
pub use progress_service::{PROGRESS_STORAGE_KEY, Persistence, ProgressService, ProgressStore};
