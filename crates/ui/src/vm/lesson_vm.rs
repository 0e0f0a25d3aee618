use course_core::Catalog;
use course_core::model::LessonId;
use services::LessonVisit;

use crate::routes::Route;
use crate::vm::activity_vm::ActivityFormVm;
use crate::vm::dashboard_vm::module_route;
use crate::vm::labels::lesson_kind_label;
use crate::vm::markdown_vm::{TextBlock, markdown_to_blocks, markdown_to_html};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonPageVm {
    pub lesson_id: LessonId,
    pub route: Route,
    pub module_route: Route,
    pub module_title: String,
    pub title: String,
    pub kind_label: &'static str,
    pub duration: String,
    pub completed: bool,
    pub body: Vec<TextBlock>,
    pub body_html: String,
    pub activity: Option<ActivityFormVm>,
    /// "Lección 3 de 9".
    pub position_label: String,
    pub previous: Option<Route>,
    /// The final project follows the last lesson.
    pub next: Route,
    pub next_label: &'static str,
    /// Lessons without an activity are completed by hand.
    pub can_mark_complete: bool,
}

/// Build the lesson page for a visit. `None` if the catalog no longer holds
/// the visited lesson.
#[must_use]
pub fn map_lesson_page(catalog: &Catalog, visit: &LessonVisit) -> Option<LessonPageVm> {
    let location = catalog.lesson(&visit.lesson_id)?;
    let lesson = location.lesson;

    let activity = lesson
        .activity()
        .map(|activity| ActivityFormVm::new(activity, visit.submission.as_ref()));

    let (next, next_label) = match &visit.next {
        Some(id) => (Route::lesson(id.clone()), "Siguiente"),
        None => (Route::FinalProject, "Finalizar Curso"),
    };

    Some(LessonPageVm {
        lesson_id: lesson.id().clone(),
        route: Route::lesson(lesson.id().clone()),
        module_route: module_route(location.module),
        module_title: location.module.title().to_owned(),
        title: lesson.title().to_owned(),
        kind_label: lesson_kind_label(lesson.kind()),
        duration: lesson.duration().to_owned(),
        completed: visit.completed,
        body: markdown_to_blocks(lesson.content()),
        body_html: markdown_to_html(lesson.content()),
        can_mark_complete: activity.is_none() && !visit.completed,
        activity,
        position_label: format!("Lección {} de {}", visit.ordinal, visit.total),
        previous: visit.previous.clone().map(Route::lesson),
        next,
        next_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::ModuleId;

    fn visit(lesson: &str, module: &str, ordinal: usize) -> LessonVisit {
        LessonVisit {
            lesson_id: LessonId::new(lesson).unwrap(),
            module_id: ModuleId::new(module).unwrap(),
            ordinal,
            total: 9,
            previous: None,
            next: None,
            completed: false,
            submission: None,
        }
    }

    #[test]
    fn last_lesson_leads_to_the_final_project() {
        let catalog = Catalog::builtin().unwrap();
        let mut v = visit("les-final", "mod-4", 9);
        v.previous = Some(LessonId::new("les-4-1").unwrap());

        let vm = map_lesson_page(&catalog, &v).unwrap();
        assert_eq!(vm.next, Route::FinalProject);
        assert_eq!(vm.next_label, "Finalizar Curso");
        assert_eq!(vm.position_label, "Lección 9 de 9");
        assert!(vm.activity.is_some());
        assert!(!vm.can_mark_complete);
    }

    #[test]
    fn lesson_without_activity_offers_manual_completion() {
        let catalog = Catalog::builtin().unwrap();
        let mut v = visit("les-1-2", "mod-1", 3);
        v.next = Some(LessonId::new("les-2-1").unwrap());

        let vm = map_lesson_page(&catalog, &v).unwrap();
        assert!(vm.can_mark_complete);
        assert_eq!(vm.next_label, "Siguiente");
        assert_eq!(vm.module_route.path(), "/modulo/mod-1");
        assert!(!vm.body.is_empty());
        assert!(!vm.body_html.is_empty());

        v.completed = true;
        assert!(!map_lesson_page(&catalog, &v).unwrap().can_mark_complete);
    }

    #[test]
    fn master_class_lesson_links_to_its_module_list() {
        let catalog = Catalog::builtin().unwrap();
        let vm = map_lesson_page(&catalog, &visit("les-mc-1", "mod-0", 1)).unwrap();
        assert_eq!(vm.module_route.path(), "/modulo/mod-0");
        assert_eq!(vm.previous, None);
    }
}
