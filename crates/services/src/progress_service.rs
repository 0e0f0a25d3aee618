use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{debug, info, warn};

use course_core::model::{ActivitySubmission, LessonId, ResetToken, UserProgress};
use course_core::stats::progress_percentage;
use storage::repository::KeyValueRepository;

use crate::Clock;
use crate::error::ProgressError;

/// Key under which the serialized progress record is stored.
pub const PROGRESS_STORAGE_KEY: &str = "course_progress_v1";

/// Whether mutations still reach the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Durable,
    /// The store failed once; the in-memory record is authoritative until
    /// the process exits.
    InMemoryOnly,
}

/// Read and write access to the learner's course progress.
///
/// Implementations never surface persistence failures. The only error a
/// caller can observe is a rejected reset confirmation.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Snapshot of the current record, loading it on first use.
    async fn load(&self) -> UserProgress;

    /// Mark a lesson as completed. Completing it again is a no-op.
    async fn complete_lesson(&self, lesson_id: &LessonId);

    /// Replace the stored answers for a lesson.
    async fn save_activity_submission(&self, lesson_id: &LessonId, submission: ActivitySubmission);

    async fn set_last_accessed(&self, lesson_id: &LessonId);

    async fn is_completed(&self, lesson_id: &LessonId) -> bool;

    /// Start a reset. Only the most recently issued token can confirm it.
    async fn request_reset(&self) -> ResetToken;

    /// Wipe all progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidResetToken` if `token` was not the
    /// pending one; the record is left untouched.
    async fn confirm_reset(&self, token: ResetToken) -> Result<(), ProgressError>;

    /// Decline a pending reset. Unknown tokens are ignored.
    async fn cancel_reset(&self, token: ResetToken);

    async fn overall_progress_percentage(&self) -> u8;

    async fn completed_count(&self) -> usize;

    fn total_lessons(&self) -> u32;

    async fn last_accessed(&self) -> Option<LessonId>;

    async fn submission(&self, lesson_id: &LessonId) -> Option<ActivitySubmission>;

    async fn persistence(&self) -> Persistence;
}

struct Session {
    progress: UserProgress,
    persistence: Persistence,
    pending_reset: Option<ResetToken>,
}

impl Session {
    fn new(progress: UserProgress, persistence: Persistence) -> Self {
        Self {
            progress,
            persistence,
            pending_reset: None,
        }
    }
}

/// Progress store backed by a key-value repository.
///
/// The record is read once, on first access, and written back in full after
/// every mutation. The session lock is held across the write so the stored
/// value always matches the in-memory record.
pub struct ProgressService {
    clock: Clock,
    total_lessons: u32,
    kv: Arc<dyn KeyValueRepository>,
    session: OnceCell<Mutex<Session>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, total_lessons: u32, kv: Arc<dyn KeyValueRepository>) -> Self {
        Self {
            clock,
            total_lessons,
            kv,
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .get_or_init(|| async { Mutex::new(self.open_session().await) })
            .await
            .lock()
            .await
    }

    async fn open_session(&self) -> Session {
        match self.kv.get(PROGRESS_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserProgress>(&raw) {
                Ok(progress) => {
                    debug!(
                        completed = progress.completed_count(),
                        "restored course progress"
                    );
                    Session::new(progress, Persistence::Durable)
                }
                Err(err) => {
                    warn!(error = %err, "stored course progress is unreadable, starting over");
                    self.fresh_session().await
                }
            },
            Ok(None) => {
                debug!("no stored course progress, starting a new record");
                self.fresh_session().await
            }
            Err(err) => {
                warn!(error = %err, "progress store unavailable, keeping progress in memory");
                Session::new(
                    UserProgress::new(self.clock.now()),
                    Persistence::InMemoryOnly,
                )
            }
        }
    }

    /// New record, written immediately so the start time survives restarts.
    async fn fresh_session(&self) -> Session {
        let mut session = Session::new(UserProgress::new(self.clock.now()), Persistence::Durable);
        self.persist(&mut session).await;
        session
    }

    async fn persist(&self, session: &mut Session) {
        if session.persistence == Persistence::InMemoryOnly {
            return;
        }
        let raw = match serde_json::to_string(&session.progress) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not serialize course progress");
                return;
            }
        };
        if let Err(err) = self.kv.put(PROGRESS_STORAGE_KEY, &raw).await {
            warn!(error = %err, "could not save course progress, continuing in memory");
            session.persistence = Persistence::InMemoryOnly;
        }
    }
}

#[async_trait]
impl ProgressStore for ProgressService {
    async fn load(&self) -> UserProgress {
        self.session().await.progress.clone()
    }

    async fn complete_lesson(&self, lesson_id: &LessonId) {
        let mut session = self.session().await;
        if !session
            .progress
            .complete_lesson(lesson_id.clone(), self.total_lessons)
        {
            return;
        }
        debug!(lesson = %lesson_id, "lesson completed");
        if session.progress.is_course_completed() {
            info!("course completed");
        }
        self.persist(&mut session).await;
    }

    async fn save_activity_submission(&self, lesson_id: &LessonId, submission: ActivitySubmission) {
        let mut session = self.session().await;
        session
            .progress
            .record_submission(lesson_id.clone(), submission);
        self.persist(&mut session).await;
    }

    async fn set_last_accessed(&self, lesson_id: &LessonId) {
        let mut session = self.session().await;
        session.progress.set_last_accessed(lesson_id.clone());
        self.persist(&mut session).await;
    }

    async fn is_completed(&self, lesson_id: &LessonId) -> bool {
        self.session().await.progress.is_completed(lesson_id)
    }

    async fn request_reset(&self) -> ResetToken {
        let token = ResetToken::generate();
        self.session().await.pending_reset = Some(token);
        token
    }

    async fn confirm_reset(&self, token: ResetToken) -> Result<(), ProgressError> {
        let mut session = self.session().await;
        if session.pending_reset != Some(token) {
            return Err(ProgressError::InvalidResetToken);
        }
        session.pending_reset = None;
        session.progress = session.progress.restarted(self.clock.now());
        info!("course progress reset");
        self.persist(&mut session).await;
        Ok(())
    }

    async fn cancel_reset(&self, token: ResetToken) {
        let mut session = self.session().await;
        if session.pending_reset == Some(token) {
            session.pending_reset = None;
            debug!("reset declined");
        }
    }

    async fn overall_progress_percentage(&self) -> u8 {
        let completed = self.completed_count().await;
        progress_percentage(completed, self.total_lessons)
    }

    async fn completed_count(&self) -> usize {
        self.session().await.progress.completed_count()
    }

    fn total_lessons(&self) -> u32 {
        self.total_lessons
    }

    async fn last_accessed(&self) -> Option<LessonId> {
        self.session().await.progress.last_accessed().cloned()
    }

    async fn submission(&self, lesson_id: &LessonId) -> Option<ActivitySubmission> {
        self.session().await.progress.submission(lesson_id).cloned()
    }

    async fn persistence(&self) -> Persistence {
        self.session().await.persistence
    }
}
