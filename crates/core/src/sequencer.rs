use crate::catalog::Catalog;
use crate::model::{CourseModule, Lesson, LessonId};

/// Linear traversal over every lesson of the course.
///
/// Order is modules in declaration order, and within each module lessons in
/// declaration order. Built on demand; flattening a static catalog is cheap
/// enough that nothing is cached.
#[derive(Debug, Clone)]
pub struct LessonSequencer<'a> {
    lessons: Vec<&'a Lesson>,
}

/// Where a lesson sits in the flattened course.
#[derive(Debug, Clone, Copy)]
pub struct LessonPosition<'a> {
    /// Zero-based index in the flattened sequence.
    pub index: usize,
    pub total: usize,
    pub current: &'a Lesson,
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
}

impl LessonPosition<'_> {
    /// One-based position, for "lesson 3 of 9" labels.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

impl<'a> LessonSequencer<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::from_modules(catalog.modules())
    }

    #[must_use]
    pub fn from_modules(modules: &'a [CourseModule]) -> Self {
        Self {
            lessons: modules.iter().flat_map(CourseModule::lessons).collect(),
        }
    }

    #[must_use]
    pub fn lessons(&self) -> &[&'a Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Entry point of the course.
    #[must_use]
    pub fn first(&self) -> Option<&'a Lesson> {
        self.lessons.first().copied()
    }

    #[must_use]
    pub fn position_of(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| l.id() == id)
    }

    /// Locate a lesson and its neighbours. `None` for ids not in the course.
    #[must_use]
    pub fn locate(&self, id: &LessonId) -> Option<LessonPosition<'a>> {
        let index = self.position_of(id)?;
        let previous = index
            .checked_sub(1)
            .and_then(|prev| self.lessons.get(prev))
            .copied();
        Some(LessonPosition {
            index,
            total: self.lessons.len(),
            current: self.lessons[index],
            previous,
            next: self.lessons.get(index + 1).copied(),
        })
    }

    #[must_use]
    pub fn previous(&self, id: &LessonId) -> Option<&'a Lesson> {
        self.locate(id).and_then(|pos| pos.previous)
    }

    #[must_use]
    pub fn next(&self, id: &LessonId) -> Option<&'a Lesson> {
        self.locate(id).and_then(|pos| pos.next)
    }

    /// `false` for unknown ids as well as for lessons that have a successor.
    #[must_use]
    pub fn is_last(&self, id: &LessonId) -> bool {
        self.locate(id).is_some_and(|pos| pos.is_last())
    }
}
