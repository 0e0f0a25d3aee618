use std::sync::Arc;

use tracing::debug;

use course_core::Catalog;
use course_core::model::{ActivitySubmission, Lesson, LessonId, ModuleId};

use crate::error::LessonFlowError;
use crate::progress_service::ProgressStore;

/// Result of opening a lesson page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonVisit {
    pub lesson_id: LessonId,
    pub module_id: ModuleId,
    /// One-based position in the course.
    pub ordinal: usize,
    pub total: usize,
    pub previous: Option<LessonId>,
    pub next: Option<LessonId>,
    pub completed: bool,
    pub submission: Option<ActivitySubmission>,
}

impl LessonVisit {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Whether a completion request changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    NewlyCompleted,
    AlreadyCompleted,
}

/// The capstone lesson together with what the learner has handed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalProjectState {
    pub lesson_id: LessonId,
    pub submission: Option<ActivitySubmission>,
    pub completed: bool,
}

/// Page-level interactions on top of the catalog and the progress store.
#[derive(Clone)]
pub struct LessonFlowService {
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressStore>,
}

impl LessonFlowService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { catalog, progress }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Open a lesson and remember it as the resume point.
    ///
    /// # Errors
    ///
    /// Returns `LessonFlowError::NotFound` for ids outside the catalog; the
    /// resume point is left alone in that case.
    pub async fn open_lesson(&self, lesson_id: &LessonId) -> Result<LessonVisit, LessonFlowError> {
        let sequencer = self.catalog.sequencer();
        let position = sequencer
            .locate(lesson_id)
            .ok_or_else(|| LessonFlowError::NotFound(lesson_id.clone()))?;

        self.progress.set_last_accessed(lesson_id).await;

        Ok(LessonVisit {
            lesson_id: lesson_id.clone(),
            module_id: position.current.module_id().clone(),
            ordinal: position.ordinal(),
            total: position.total,
            previous: position.previous.map(|l| l.id().clone()),
            next: position.next.map(|l| l.id().clone()),
            completed: self.progress.is_completed(lesson_id).await,
            submission: self.progress.submission(lesson_id).await,
        })
    }

    /// Mark a lesson as done.
    ///
    /// # Errors
    ///
    /// Returns `LessonFlowError::NotFound` for ids outside the catalog.
    pub async fn mark_complete(
        &self,
        lesson_id: &LessonId,
    ) -> Result<CompletionOutcome, LessonFlowError> {
        self.known_lesson(lesson_id)?;
        Ok(self.complete(lesson_id).await)
    }

    /// Validate and store the answers for a lesson's activity, then complete
    /// the lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonFlowError::NotFound` for unknown lessons,
    /// `LessonFlowError::NoActivity` if the lesson has nothing to submit, and
    /// `LessonFlowError::Activity` when the answers do not fit the prompts.
    pub async fn submit_activity<I, S>(
        &self,
        lesson_id: &LessonId,
        answers: I,
    ) -> Result<CompletionOutcome, LessonFlowError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lesson = self.known_lesson(lesson_id)?;
        let activity = lesson
            .activity()
            .ok_or_else(|| LessonFlowError::NoActivity(lesson_id.clone()))?;
        let submission = activity.build_submission(answers)?;

        self.progress
            .save_activity_submission(lesson_id, submission)
            .await;
        debug!(lesson = %lesson_id, activity = %activity.id(), "activity submitted");
        Ok(self.complete(lesson_id).await)
    }

    /// Where "continue" should take the learner.
    ///
    /// Last visited lesson if it still exists, otherwise the first lesson not
    /// yet completed, otherwise the very first lesson.
    pub async fn resume_target(&self) -> Option<LessonId> {
        let sequencer = self.catalog.sequencer();
        let last = self.progress.last_accessed().await;
        if let Some(last) = last.filter(|id| sequencer.position_of(id).is_some()) {
            return Some(last);
        }

        let progress = self.progress.load().await;
        sequencer
            .lessons()
            .iter()
            .copied()
            .find(|lesson| !progress.is_completed(lesson.id()))
            .or_else(|| sequencer.first())
            .map(|lesson| lesson.id().clone())
    }

    /// The closing project: the last lesson of the course that carries an
    /// activity.
    pub async fn final_project(&self) -> Option<FinalProjectState> {
        let lesson = self.final_project_lesson()?;
        let lesson_id = lesson.id().clone();
        Some(FinalProjectState {
            submission: self.progress.submission(&lesson_id).await,
            completed: self.progress.is_completed(&lesson_id).await,
            lesson_id,
        })
    }

    #[must_use]
    pub fn final_project_lesson(&self) -> Option<&Lesson> {
        self.catalog
            .sequencer()
            .lessons()
            .iter()
            .rev()
            .find(|lesson| lesson.activity().is_some())
            .copied()
    }

    fn known_lesson(&self, lesson_id: &LessonId) -> Result<&Lesson, LessonFlowError> {
        self.catalog
            .lesson(lesson_id)
            .map(|location| location.lesson)
            .ok_or_else(|| LessonFlowError::NotFound(lesson_id.clone()))
    }

    async fn complete(&self, lesson_id: &LessonId) -> CompletionOutcome {
        if self.progress.is_completed(lesson_id).await {
            return CompletionOutcome::AlreadyCompleted;
        }
        self.progress.complete_lesson(lesson_id).await;
        CompletionOutcome::NewlyCompleted
    }
}
