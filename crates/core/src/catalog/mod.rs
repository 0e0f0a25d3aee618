use std::collections::HashSet;

use thiserror::Error;

use crate::model::{
    Activity, ActivityError, ActivityId, ActivityPrompts, Annex, CourseMetadata, CourseModule,
    Lesson, LessonError, LessonId, ModuleError, ModuleId,
};
use crate::sequencer::LessonSequencer;

mod draft;

use draft::{ActivityDraft, CatalogDraft, LessonDraft, ModuleDraft};

/// The course bundled with the application.
const BUILTIN_CATALOG: &str = include_str!("../../data/course.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("module {module_id} is declared more than once")]
    DuplicateModule { module_id: ModuleId },

    #[error("lesson {lesson_id} is declared more than once")]
    DuplicateLesson { lesson_id: LessonId },

    #[error("module {module_id}: {source}")]
    Module {
        module_id: ModuleId,
        #[source]
        source: ModuleError,
    },

    #[error("lesson {lesson_id}: {source}")]
    Lesson {
        lesson_id: LessonId,
        #[source]
        source: LessonError,
    },

    #[error("activity {activity_id}: {source}")]
    Activity {
        activity_id: ActivityId,
        #[source]
        source: ActivityError,
    },

    #[error("activity {activity_id} declares both questions and template fields")]
    ConflictingPrompts { activity_id: ActivityId },

    #[error("lesson {lesson_id}: {link} link points to {found}, catalog order says {expected:?}")]
    AdjacencyMismatch {
        lesson_id: LessonId,
        link: &'static str,
        expected: Option<LessonId>,
        found: LessonId,
    },
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// A lesson together with the module that owns it.
#[derive(Debug, Clone, Copy)]
pub struct LessonLocation<'a> {
    pub module: &'a CourseModule,
    pub lesson: &'a Lesson,
}

/// The read-only course hierarchy: modules, lessons, activities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    metadata: CourseMetadata,
    modules: Vec<CourseModule>,
    annexes: Vec<Annex>,
}

impl Catalog {
    /// Assemble a catalog from already-built modules.
    ///
    /// Module ids and lesson ids must be unique across the whole catalog.
    /// Lesson order is the flattened module order; any explicit next/previous
    /// links on lessons must agree with it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateModule`, `CatalogError::DuplicateLesson`
    /// or `CatalogError::AdjacencyMismatch`.
    pub fn new(
        metadata: CourseMetadata,
        modules: Vec<CourseModule>,
        annexes: Vec<Annex>,
    ) -> Result<Self, CatalogError> {
        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for module in &modules {
            if !module_ids.insert(module.id()) {
                return Err(CatalogError::DuplicateModule {
                    module_id: module.id().clone(),
                });
            }
            for lesson in module.lessons() {
                if !lesson_ids.insert(lesson.id()) {
                    return Err(CatalogError::DuplicateLesson {
                        lesson_id: lesson.id().clone(),
                    });
                }
            }
        }

        check_adjacency(&LessonSequencer::from_modules(&modules))?;

        Ok(Self {
            metadata,
            modules,
            annexes,
        })
    }

    /// Parse and validate a catalog in the JSON authoring format.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and any validation
    /// error raised while building modules, lessons and activities.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let draft: CatalogDraft = serde_json::from_str(raw)?;
        let modules = draft
            .modules
            .into_iter()
            .map(build_module)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(draft.metadata, modules, draft.annexes)
    }

    /// The course compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    #[must_use]
    pub fn metadata(&self) -> &CourseMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    #[must_use]
    pub fn annexes(&self) -> &[Annex] {
        &self.annexes
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&CourseModule> {
        self.modules.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<LessonLocation<'_>> {
        self.modules.iter().find_map(|module| {
            module
                .lesson(id)
                .map(|lesson| LessonLocation { module, lesson })
        })
    }

    /// All lessons in traversal order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(CourseModule::lessons)
    }

    /// Live count of lessons in the module list.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons().len()).sum()
    }

    /// Author-declared lesson total used for percentages and completion.
    #[must_use]
    pub fn total_lessons(&self) -> u32 {
        self.metadata.total_lessons
    }

    /// `(declared, actual)` when the metadata total disagrees with the
    /// module list. The declared value stays authoritative.
    #[must_use]
    pub fn metadata_mismatch(&self) -> Option<(u32, usize)> {
        let actual = self.lesson_count();
        let declared = self.metadata.total_lessons;
        (usize::try_from(declared).ok() != Some(actual)).then_some((declared, actual))
    }

    #[must_use]
    pub fn sequencer(&self) -> LessonSequencer<'_> {
        LessonSequencer::new(self)
    }
}

fn check_adjacency(sequencer: &LessonSequencer<'_>) -> Result<(), CatalogError> {
    let lessons = sequencer.lessons();
    for (index, lesson) in lessons.iter().enumerate() {
        let expected_next = lessons.get(index + 1).map(|l| l.id());
        if let Some(found) = lesson.next_lesson_id() {
            if Some(found) != expected_next {
                return Err(CatalogError::AdjacencyMismatch {
                    lesson_id: lesson.id().clone(),
                    link: "next",
                    expected: expected_next.cloned(),
                    found: found.clone(),
                });
            }
        }

        let expected_previous = index
            .checked_sub(1)
            .and_then(|prev| lessons.get(prev))
            .map(|l| l.id());
        if let Some(found) = lesson.previous_lesson_id() {
            if Some(found) != expected_previous {
                return Err(CatalogError::AdjacencyMismatch {
                    lesson_id: lesson.id().clone(),
                    link: "previous",
                    expected: expected_previous.cloned(),
                    found: found.clone(),
                });
            }
        }
    }
    Ok(())
}

fn build_module(draft: ModuleDraft) -> Result<CourseModule, CatalogError> {
    let lessons = draft
        .lessons
        .into_iter()
        .map(build_lesson)
        .collect::<Result<Vec<_>, _>>()?;
    let module = CourseModule::new(draft.id.clone(), draft.title, draft.description, lessons)
        .map_err(|source| CatalogError::Module {
            module_id: draft.id,
            source,
        })?;
    Ok(module.with_presentation(draft.icon_name, draft.color))
}

fn build_lesson(draft: LessonDraft) -> Result<Lesson, CatalogError> {
    let lesson = Lesson::new(
        draft.id.clone(),
        draft.module_id,
        draft.title,
        draft.duration,
        draft.kind,
        draft.content,
    )
    .map_err(|source| CatalogError::Lesson {
        lesson_id: draft.id,
        source,
    })?
    .with_links(draft.prev_lesson_id, draft.next_lesson_id);

    match draft.activity {
        Some(activity) => Ok(lesson.with_activity(build_activity(activity)?)),
        None => Ok(lesson),
    }
}

fn build_activity(draft: ActivityDraft) -> Result<Activity, CatalogError> {
    let prompts = match (draft.questions, draft.template_fields) {
        (Some(_), Some(_)) => {
            return Err(CatalogError::ConflictingPrompts {
                activity_id: draft.id,
            });
        }
        (Some(questions), None) => ActivityPrompts::Questions(questions),
        (None, Some(fields)) => ActivityPrompts::Fields(fields),
        (None, None) => ActivityPrompts::None,
    };
    Activity::new(
        draft.id.clone(),
        draft.kind,
        draft.title,
        draft.description,
        prompts,
    )
    .map_err(|source| CatalogError::Activity {
        activity_id: draft.id,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonKind;

    const METADATA: &str = r#"{
        "title": "T", "subtitle": "S", "author": "A", "description": "D",
        "totalModules": 2, "totalLessons": 3, "estimatedTime": "1 h", "year": 2026
    }"#;

    fn catalog_json(modules: &str) -> String {
        format!(r#"{{ "metadata": {METADATA}, "modules": {modules} }}"#)
    }

    fn lesson_json(id: &str, module: &str, links: &str) -> String {
        format!(
            r#"{{ "id": "{id}", "moduleId": "{module}", "title": "{id}",
                 "duration": "10 min", "type": "reading", "content": "" {links} }}"#
        )
    }

    fn two_modules(l2_links: &str) -> String {
        catalog_json(&format!(
            r#"[
                {{ "id": "m0", "title": "M0", "lessons": [{}, {}] }},
                {{ "id": "m1", "title": "M1", "lessons": [{}] }}
            ]"#,
            lesson_json("l1", "m0", r#", "nextLessonId": "l2""#),
            lesson_json("l2", "m0", l2_links),
            lesson_json("l3", "m1", r#", "prevLessonId": "l2""#),
        ))
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.modules().len(), 5);
        assert_eq!(catalog.lesson_count(), 9);
        assert_eq!(catalog.total_lessons(), 8);
        assert_eq!(catalog.metadata_mismatch(), Some((8, 9)));
        assert!(catalog.annexes().len() >= 3);
    }

    #[test]
    fn consistent_links_are_accepted() {
        let catalog =
            Catalog::from_json(&two_modules(r#", "prevLessonId": "l1", "nextLessonId": "l3""#))
                .unwrap();
        let location = catalog.lesson(&LessonId::new("l3").unwrap()).unwrap();
        assert_eq!(location.module.id(), &ModuleId::new("m1").unwrap());
        assert_eq!(location.lesson.kind(), LessonKind::Reading);
    }

    #[test]
    fn links_contradicting_catalog_order_are_rejected() {
        let err = Catalog::from_json(&two_modules(r#", "nextLessonId": "l1""#)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::AdjacencyMismatch { link: "next", ref lesson_id, .. } if lesson_id == "l2"
        ));
    }

    #[test]
    fn last_lesson_cannot_point_forward() {
        let json = catalog_json(&format!(
            r#"[{{ "id": "m0", "title": "M0", "lessons": [{}] }}]"#,
            lesson_json("l1", "m0", r#", "nextLessonId": "ghost""#)
        ));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::AdjacencyMismatch { expected: None, .. }
        ));
    }

    #[test]
    fn duplicate_lessons_across_modules_are_rejected() {
        let json = catalog_json(&format!(
            r#"[
                {{ "id": "m0", "title": "M0", "lessons": [{}] }},
                {{ "id": "m1", "title": "M1", "lessons": [{}] }}
            ]"#,
            lesson_json("l1", "m0", ""),
            lesson_json("l1", "m1", ""),
        ));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLesson { .. }));
    }

    #[test]
    fn activity_cannot_mix_questions_and_fields() {
        let json = catalog_json(&format!(
            r#"[{{ "id": "m0", "title": "M0", "lessons": [{}] }}]"#,
            lesson_json(
                "l1",
                "m0",
                r#", "activity": { "id": "a1", "type": "quiz", "title": "Q",
                      "questions": ["x"], "templateFields": ["y"] }"#
            )
        ));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::ConflictingPrompts { .. }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::from_json(&catalog_json("[]")).unwrap();
        assert_eq!(catalog.lesson_count(), 0);
        assert!(catalog.sequencer().is_empty());
        assert_eq!(catalog.metadata_mismatch(), Some((3, 0)));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
