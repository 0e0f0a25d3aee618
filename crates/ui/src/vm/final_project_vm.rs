use course_core::Catalog;
use course_core::model::{Annex, LessonId};
use services::FinalProjectState;

use crate::routes::Route;
use crate::vm::activity_vm::ActivityFormVm;
use crate::vm::markdown_vm::{TextBlock, markdown_to_blocks};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnexVm {
    pub title: String,
    pub description: String,
    pub link: String,
}

impl From<&Annex> for AnnexVm {
    fn from(annex: &Annex) -> Self {
        Self {
            title: annex.title.clone(),
            description: annex.description.clone(),
            link: annex.link.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalProjectVm {
    /// The capstone lesson, absent when the course has none.
    pub lesson_id: Option<LessonId>,
    pub lesson_route: Option<Route>,
    pub title: String,
    pub body: Vec<TextBlock>,
    pub activity: Option<ActivityFormVm>,
    pub completed: bool,
    pub annexes: Vec<AnnexVm>,
}

/// Build the final project page. Without a capstone lesson the page still
/// lists the annexes.
#[must_use]
pub fn map_final_project(catalog: &Catalog, state: Option<&FinalProjectState>) -> FinalProjectVm {
    let annexes = catalog.annexes().iter().map(AnnexVm::from).collect();
    let lesson = state.and_then(|s| catalog.lesson(&s.lesson_id).map(|l| (s, l.lesson)));

    match lesson {
        Some((state, lesson)) => FinalProjectVm {
            lesson_id: Some(lesson.id().clone()),
            lesson_route: Some(Route::lesson(lesson.id().clone())),
            title: lesson.title().to_owned(),
            body: markdown_to_blocks(lesson.content()),
            activity: lesson
                .activity()
                .map(|activity| ActivityFormVm::new(activity, state.submission.as_ref())),
            completed: state.completed,
            annexes,
        },
        None => FinalProjectVm {
            lesson_id: None,
            lesson_route: None,
            title: "Proyecto Final".to_owned(),
            body: Vec::new(),
            activity: None,
            completed: false,
            annexes,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::ActivitySubmission;

    #[test]
    fn stored_plan_is_shown_with_annexes() {
        let catalog = Catalog::builtin().unwrap();
        let mut submission = ActivitySubmission::new();
        submission.insert("Objetivo de bienestar para el niño", "rutina de sueño");
        let state = FinalProjectState {
            lesson_id: LessonId::new("les-final").unwrap(),
            submission: Some(submission),
            completed: true,
        };

        let vm = map_final_project(&catalog, Some(&state));
        assert!(vm.completed);
        assert_eq!(vm.annexes.len(), 3);
        let activity = vm.activity.unwrap();
        assert!(activity.submitted);
        assert_eq!(
            activity.fields[0].answer.as_deref(),
            Some("rutina de sueño")
        );
    }

    #[test]
    fn missing_capstone_still_lists_annexes() {
        let catalog = Catalog::builtin().unwrap();
        let vm = map_final_project(&catalog, None);
        assert!(vm.activity.is_none());
        assert_eq!(vm.lesson_route, None);
        assert_eq!(vm.annexes.len(), 3);
    }
}
