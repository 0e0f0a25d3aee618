use thiserror::Error;

use crate::model::ids::{LessonId, ModuleId};
use crate::model::lesson::Lesson;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module title cannot be empty")]
    EmptyTitle,

    #[error("lesson {lesson_id} claims module {claimed}")]
    ForeignLesson {
        lesson_id: LessonId,
        claimed: ModuleId,
    },
}

/// An ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseModule {
    id: ModuleId,
    title: String,
    description: String,
    lessons: Vec<Lesson>,
    icon: Option<String>,
    accent: Option<String>,
}

impl CourseModule {
    /// Creates a module from its lessons, in display order.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::EmptyTitle` for a blank title, or
    /// `ModuleError::ForeignLesson` if a lesson's back-reference names a
    /// different module.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        description: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, ModuleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModuleError::EmptyTitle);
        }
        if let Some(stray) = lessons.iter().find(|l| l.module_id() != &id) {
            return Err(ModuleError::ForeignLesson {
                lesson_id: stray.id().clone(),
                claimed: stray.module_id().clone(),
            });
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            lessons,
            icon: None,
            accent: None,
        })
    }

    /// Attach the author's icon and accent hints. Both are opaque names.
    #[must_use]
    pub fn with_presentation(mut self, icon: Option<String>, accent: Option<String>) -> Self {
        self.icon = icon;
        self.accent = accent;
        self
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[must_use]
    pub fn accent(&self) -> Option<&str> {
        self.accent.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::LessonKind;

    fn lesson(id: &str, module: &str) -> Lesson {
        Lesson::new(
            LessonId::new(id).unwrap(),
            ModuleId::new(module).unwrap(),
            id,
            "10 min",
            LessonKind::Video,
            "",
        )
        .unwrap()
    }

    #[test]
    fn rejects_lessons_owned_elsewhere() {
        let err = CourseModule::new(
            ModuleId::new("mod-1").unwrap(),
            "One",
            "",
            vec![lesson("les-1", "mod-1"), lesson("les-2", "mod-2")],
        )
        .unwrap_err();
        assert!(matches!(err, ModuleError::ForeignLesson { lesson_id, .. } if lesson_id == "les-2"));
    }

    #[test]
    fn finds_lessons_by_id() {
        let module = CourseModule::new(
            ModuleId::new("mod-1").unwrap(),
            "One",
            "",
            vec![lesson("les-1", "mod-1")],
        )
        .unwrap();
        assert!(module.lesson(&LessonId::new("les-1").unwrap()).is_some());
        assert!(module.lesson(&LessonId::new("les-9").unwrap()).is_none());
    }
}
