use course_core::model::{CourseModule, Lesson, ModuleId, UserProgress};
use course_core::stats::{ModuleStats, module_total_minutes};

use crate::routes::Route;
use crate::vm::dashboard_vm::module_route;
use crate::vm::labels::lesson_kind_label;
use crate::vm::time_fmt::format_minutes;

/// One row of a module's lesson list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub route: Route,
    /// One-based position within the module.
    pub number: usize,
    pub title: String,
    pub duration: String,
    pub kind_label: &'static str,
    pub completed: bool,
    pub has_activity: bool,
}

impl LessonRowVm {
    fn new(number: usize, lesson: &Lesson, progress: &UserProgress) -> Self {
        Self {
            route: Route::lesson(lesson.id().clone()),
            number,
            title: lesson.title().to_owned(),
            duration: lesson.duration().to_owned(),
            kind_label: lesson_kind_label(lesson.kind()),
            completed: progress.is_completed(lesson.id()),
            has_activity: lesson.activity().is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModulePageVm {
    pub id: ModuleId,
    pub route: Route,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub stats: ModuleStats,
    pub duration_label: String,
    pub lessons: Vec<LessonRowVm>,
    /// First lesson not yet completed, or the first lesson once all are done.
    pub start: Option<Route>,
}

#[must_use]
pub fn map_module_page(module: &CourseModule, progress: &UserProgress) -> ModulePageVm {
    let lessons: Vec<LessonRowVm> = module
        .lessons()
        .iter()
        .enumerate()
        .map(|(index, lesson)| LessonRowVm::new(index + 1, lesson, progress))
        .collect();

    let start = lessons
        .iter()
        .find(|row| !row.completed)
        .or_else(|| lessons.first())
        .map(|row| row.route.clone());

    ModulePageVm {
        id: module.id().clone(),
        route: module_route(module),
        title: module.title().to_owned(),
        description: module.description().to_owned(),
        icon: module.icon().map(str::to_owned),
        stats: ModuleStats::compute(module, progress),
        duration_label: format_minutes(module_total_minutes(module)),
        lessons,
        start,
    }
}
