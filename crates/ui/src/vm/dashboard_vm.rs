use course_core::Catalog;
use course_core::model::{CourseModule, LessonId, UserProgress};
use course_core::stats::{ModuleStats, module_total_minutes, progress_percentage};

use crate::routes::Route;
use crate::vm::time_fmt::{format_date, format_minutes};

/// Summary card for one module on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleCardVm {
    pub route: Route,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub accent: Option<String>,
    pub lesson_count: usize,
    pub stats: ModuleStats,
    pub duration_label: String,
}

impl ModuleCardVm {
    #[must_use]
    pub fn new(module: &CourseModule, route: Route, progress: &UserProgress) -> Self {
        Self {
            route,
            title: module.title().to_owned(),
            description: module.description().to_owned(),
            icon: module.icon().map(str::to_owned),
            accent: module.accent().map(str::to_owned),
            lesson_count: module.lessons().len(),
            stats: ModuleStats::compute(module, progress),
            duration_label: format_minutes(module_total_minutes(module)),
        }
    }
}

/// "Continue where you left off" target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumeVm {
    pub route: Route,
    pub lesson_title: String,
    pub module_title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub estimated_time: String,
    pub percentage: u8,
    pub completed: usize,
    pub total: u32,
    pub progress_label: String,
    pub started_on: String,
    pub course_completed: bool,
    /// The master class, when the course has one.
    pub master_class: Option<ModuleCardVm>,
    pub modules: Vec<ModuleCardVm>,
    pub resume: Option<ResumeVm>,
    pub final_project: Route,
}

#[must_use]
pub fn module_route(module: &CourseModule) -> Route {
    Route::module(module.id().clone())
}

#[must_use]
pub fn map_dashboard(
    catalog: &Catalog,
    progress: &UserProgress,
    resume: Option<&LessonId>,
) -> DashboardVm {
    let metadata = catalog.metadata();
    let total = catalog.total_lessons();
    let completed = progress.completed_count();

    // The first module opens as the master class lesson.
    let (master_class, modules) = match catalog.modules().split_first() {
        Some((first, rest)) => (
            Some(ModuleCardVm::new(first, Route::MasterClass, progress)),
            rest.iter()
                .map(|module| ModuleCardVm::new(module, module_route(module), progress))
                .collect(),
        ),
        None => (None, Vec::new()),
    };

    let resume = resume.and_then(|id| catalog.lesson(id)).map(|location| ResumeVm {
        route: Route::lesson(location.lesson.id().clone()),
        lesson_title: location.lesson.title().to_owned(),
        module_title: location.module.title().to_owned(),
    });

    DashboardVm {
        title: metadata.title.clone(),
        subtitle: metadata.subtitle.clone(),
        author: metadata.author.clone(),
        estimated_time: metadata.estimated_time.clone(),
        percentage: progress_percentage(completed, total),
        completed,
        total,
        progress_label: format!("{completed} de {total} lecciones"),
        started_on: format_date(progress.started_at()),
        course_completed: progress.is_course_completed(),
        master_class,
        modules,
        resume,
        final_project: Route::FinalProject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::fixed_now;

    fn lesson(id: &str) -> LessonId {
        LessonId::new(id).unwrap()
    }

    #[test]
    fn fresh_learner_sees_zero_progress() {
        let catalog = Catalog::builtin().unwrap();
        let vm = map_dashboard(&catalog, &UserProgress::new(fixed_now()), None);

        assert_eq!(vm.percentage, 0);
        assert_eq!(vm.progress_label, "0 de 8 lecciones");
        assert_eq!(vm.started_on, "14/11/2023");
        assert_eq!(vm.master_class.map(|m| m.route), Some(Route::MasterClass));
        assert_eq!(vm.modules.len(), 4);
        assert!(vm.resume.is_none());
    }

    #[test]
    fn module_cards_reflect_completed_lessons() {
        let catalog = Catalog::builtin().unwrap();
        let mut progress = UserProgress::new(fixed_now());
        progress.complete_lesson(lesson("les-1-1"), 9);
        progress.complete_lesson(lesson("les-1-2"), 9);
        progress.complete_lesson(lesson("les-2-1"), 9);

        let vm = map_dashboard(&catalog, &progress, Some(&lesson("les-2-1")));
        assert_eq!(vm.percentage, 38);
        let first = &vm.modules[0];
        assert_eq!(first.route.path(), "/modulo/mod-1");
        assert_eq!(first.stats.percentage, 100);
        assert_eq!(vm.modules[1].stats.completed, 1);

        let resume = vm.resume.unwrap();
        assert_eq!(resume.route, Route::lesson(lesson("les-2-1")));
    }

    #[test]
    fn resume_pointing_outside_the_catalog_is_hidden() {
        let catalog = Catalog::builtin().unwrap();
        let vm = map_dashboard(
            &catalog,
            &UserProgress::new(fixed_now()),
            Some(&lesson("retired")),
        );
        assert!(vm.resume.is_none());
    }
}
