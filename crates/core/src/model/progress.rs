use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use uuid::Uuid;

use crate::model::activity::ActivitySubmission;
use crate::model::ids::LessonId;

//
// ─── USER PROGRESS ─────────────────────────────────────────────────────────────
//

/// Everything we remember about one learner.
///
/// Serialized as a single JSON object under one storage key. The completed
/// list has set semantics: it never holds duplicates, and a record read back
/// from storage is normalized the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProgressRecord")]
pub struct UserProgress {
    completed_lesson_ids: Vec<LessonId>,
    last_accessed_lesson_id: Option<LessonId>,
    activity_submissions: BTreeMap<LessonId, ActivitySubmission>,
    started_at: DateTime<Utc>,
    is_course_completed: bool,
}

/// Wire shape accepted when reading a persisted record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRecord {
    completed_lesson_ids: Vec<LessonId>,
    last_accessed_lesson_id: Option<LessonId>,
    #[serde(default)]
    activity_submissions: BTreeMap<LessonId, ActivitySubmission>,
    started_at: DateTime<Utc>,
    #[serde(default)]
    is_course_completed: bool,
}

impl From<ProgressRecord> for UserProgress {
    fn from(record: ProgressRecord) -> Self {
        let mut seen = HashSet::new();
        let completed_lesson_ids = record
            .completed_lesson_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self {
            completed_lesson_ids,
            last_accessed_lesson_id: record.last_accessed_lesson_id,
            activity_submissions: record.activity_submissions,
            started_at: record.started_at,
            is_course_completed: record.is_course_completed,
        }
    }
}

impl UserProgress {
    /// Fresh record for a learner starting the course at `started_at`.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            completed_lesson_ids: Vec::new(),
            last_accessed_lesson_id: None,
            activity_submissions: BTreeMap::new(),
            started_at,
            is_course_completed: false,
        }
    }

    /// Replacement record for a confirmed reset.
    ///
    /// The new start time never precedes the old one, even if the clock
    /// moved backwards.
    #[must_use]
    pub fn restarted(&self, now: DateTime<Utc>) -> Self {
        Self::new(now.max(self.started_at))
    }

    #[must_use]
    pub fn completed_lesson_ids(&self) -> &[LessonId] {
        &self.completed_lesson_ids
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_lesson_ids.len()
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lesson_ids.contains(lesson_id)
    }

    #[must_use]
    pub fn last_accessed(&self) -> Option<&LessonId> {
        self.last_accessed_lesson_id.as_ref()
    }

    #[must_use]
    pub fn submission(&self, lesson_id: &LessonId) -> Option<&ActivitySubmission> {
        self.activity_submissions.get(lesson_id)
    }

    #[must_use]
    pub fn submissions(&self) -> &BTreeMap<LessonId, ActivitySubmission> {
        &self.activity_submissions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_course_completed(&self) -> bool {
        self.is_course_completed
    }

    /// Mark a lesson as done. Returns `false` when it already was, in which
    /// case nothing changed.
    pub fn complete_lesson(&mut self, lesson_id: LessonId, total_lessons: u32) -> bool {
        if self.is_completed(&lesson_id) {
            return false;
        }
        self.completed_lesson_ids.push(lesson_id);
        let total = usize::try_from(total_lessons).unwrap_or(usize::MAX);
        self.is_course_completed = self.completed_lesson_ids.len() >= total;
        true
    }

    /// Store answers for a lesson, replacing any earlier ones wholesale.
    pub fn record_submission(&mut self, lesson_id: LessonId, submission: ActivitySubmission) {
        self.activity_submissions.insert(lesson_id, submission);
    }

    pub fn set_last_accessed(&mut self, lesson_id: LessonId) {
        self.last_accessed_lesson_id = Some(lesson_id);
    }
}

//
// ─── RESET TOKEN ───────────────────────────────────────────────────────────────
//

/// Single-use proof that a reset was requested before it is confirmed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResetToken(Uuid);

impl ResetToken {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResetToken({})", self.0)
    }
}

impl fmt::Display for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::TimeDelta;

    fn id(raw: &str) -> LessonId {
        LessonId::new(raw).unwrap()
    }

    #[test]
    fn completing_twice_changes_nothing_the_second_time() {
        let mut progress = UserProgress::new(fixed_now());
        assert!(progress.complete_lesson(id("les-1"), 3));
        let snapshot = progress.clone();
        assert!(!progress.complete_lesson(id("les-1"), 3));
        assert_eq!(progress, snapshot);
    }

    #[test]
    fn completion_flag_follows_declared_total() {
        let mut progress = UserProgress::new(fixed_now());
        progress.complete_lesson(id("les-1"), 2);
        assert!(!progress.is_course_completed());
        progress.complete_lesson(id("les-2"), 2);
        assert!(progress.is_course_completed());
    }

    #[test]
    fn submissions_are_replaced_not_merged() {
        let mut progress = UserProgress::new(fixed_now());
        progress.record_submission(id("les-1"), [("q1", "a"), ("q2", "x")].into_iter().collect());
        progress.record_submission(id("les-1"), [("q1", "b")].into_iter().collect());
        let stored = progress.submission(&id("les-1")).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("q1"), Some("b"));
    }

    #[test]
    fn restarted_never_moves_start_time_backwards() {
        let mut progress = UserProgress::new(fixed_now());
        progress.complete_lesson(id("les-1"), 1);
        progress.set_last_accessed(id("les-1"));

        let earlier = fixed_now() - TimeDelta::hours(1);
        let fresh = progress.restarted(earlier);
        assert_eq!(fresh.started_at(), fixed_now());
        assert_eq!(fresh.completed_count(), 0);
        assert!(fresh.last_accessed().is_none());
        assert!(!fresh.is_course_completed());

        let later = fixed_now() + TimeDelta::hours(1);
        assert_eq!(progress.restarted(later).started_at(), later);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut progress = UserProgress::new(fixed_now());
        progress.complete_lesson(id("les-1"), 9);
        let json: serde_json::Value = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["completedLessonIds"], serde_json::json!(["les-1"]));
        assert_eq!(json["lastAccessedLessonId"], serde_json::Value::Null);
        assert_eq!(json["activitySubmissions"], serde_json::json!({}));
        assert_eq!(json["startedAt"], "2023-11-14T22:13:20Z");
        assert_eq!(json["isCourseCompleted"], false);
    }

    #[test]
    fn duplicates_in_stored_record_are_dropped() {
        let raw = r#"{
            "completedLessonIds": ["les-1", "les-2", "les-1"],
            "lastAccessedLessonId": "les-2",
            "activitySubmissions": {"les-1": {"q": "a"}},
            "startedAt": "2023-11-14T22:13:20Z",
            "isCourseCompleted": false
        }"#;
        let progress: UserProgress = serde_json::from_str(raw).unwrap();
        assert_eq!(progress.completed_lesson_ids(), &[id("les-1"), id("les-2")]);
        assert_eq!(progress.last_accessed(), Some(&id("les-2")));
        assert_eq!(
            progress.submission(&id("les-1")).and_then(|s| s.get("q")),
            Some("a")
        );
    }

    #[test]
    fn reset_tokens_are_unique() {
        assert_ne!(ResetToken::generate(), ResetToken::generate());
    }
}
