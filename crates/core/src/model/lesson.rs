use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::activity::Activity;
use crate::model::ids::{LessonId, ModuleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,
}

/// Presentation type of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Reading,
    Activity,
    Reflection,
}

impl LessonKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonKind::Video => "video",
            LessonKind::Reading => "reading",
            LessonKind::Activity => "activity",
            LessonKind::Reflection => "reflection",
        }
    }
}

/// One lesson of the course.
///
/// `module_id` is a back-reference for display; ownership lives in
/// `CourseModule`. The optional next/previous links come from the authoring
/// format and are checked against the flattened catalog order at load time,
/// so they never disagree with `LessonSequencer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    module_id: ModuleId,
    title: String,
    duration: String,
    kind: LessonKind,
    content: String,
    activity: Option<Activity>,
    next_lesson_id: Option<LessonId>,
    previous_lesson_id: Option<LessonId>,
}

impl Lesson {
    /// Creates a lesson without an activity or adjacency links.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        module_id: ModuleId,
        title: impl Into<String>,
        duration: impl Into<String>,
        kind: LessonKind,
        content: impl Into<String>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        Ok(Self {
            id,
            module_id,
            title,
            duration: duration.into(),
            kind,
            content: content.into(),
            activity: None,
            next_lesson_id: None,
            previous_lesson_id: None,
        })
    }

    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    #[must_use]
    pub fn with_links(mut self, previous: Option<LessonId>, next: Option<LessonId>) -> Self {
        self.previous_lesson_id = previous;
        self.next_lesson_id = next;
        self
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Human label such as "45 min".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// Leading integer of the duration label, if any ("20 min" -> 20).
    #[must_use]
    pub fn duration_minutes(&self) -> Option<u32> {
        let digits: String = self
            .duration
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    /// Markdown body, opaque to everything but the renderer.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    #[must_use]
    pub fn next_lesson_id(&self) -> Option<&LessonId> {
        self.next_lesson_id.as_ref()
    }

    #[must_use]
    pub fn previous_lesson_id(&self) -> Option<&LessonId> {
        self.previous_lesson_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(duration: &str) -> Lesson {
        Lesson::new(
            LessonId::new("les-1").unwrap(),
            ModuleId::new("mod-1").unwrap(),
            "Intro",
            duration,
            LessonKind::Reading,
            "body",
        )
        .unwrap()
    }

    #[test]
    fn duration_minutes_reads_leading_number() {
        assert_eq!(lesson("45 min").duration_minutes(), Some(45));
        assert_eq!(lesson(" 5min").duration_minutes(), Some(5));
        assert_eq!(lesson("una hora").duration_minutes(), None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Lesson::new(
            LessonId::new("les-1").unwrap(),
            ModuleId::new("mod-1").unwrap(),
            "  ",
            "1 min",
            LessonKind::Video,
            "",
        )
        .unwrap_err();
        assert_eq!(err, LessonError::EmptyTitle);
    }

    #[test]
    fn kind_round_trips_lowercase() {
        let kind: LessonKind = serde_json::from_str("\"reflection\"").unwrap();
        assert_eq!(kind, LessonKind::Reflection);
        assert_eq!(LessonKind::Video.as_str(), "video");
    }
}
