use crate::routes::Route;
use crate::vm::dashboard_vm::DashboardVm;
use crate::vm::final_project_vm::FinalProjectVm;
use crate::vm::lesson_vm::LessonPageVm;
use crate::vm::module_vm::ModulePageVm;

/// Shown for module and lesson ids outside the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotFoundVm {
    pub title: &'static str,
    pub message: &'static str,
    pub back: Route,
}

impl NotFoundVm {
    #[must_use]
    pub fn lesson() -> Self {
        Self {
            title: "Lección no encontrada",
            message: "El contenido que buscas no está disponible o ha sido movido.",
            back: Route::Home,
        }
    }

    #[must_use]
    pub fn module() -> Self {
        Self {
            title: "Módulo no encontrado",
            message: "El módulo que buscas no forma parte del curso.",
            back: Route::Home,
        }
    }
}

/// Everything a front end needs to draw one route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageVm {
    Dashboard(DashboardVm),
    Module(ModulePageVm),
    Lesson(LessonPageVm),
    FinalProject(FinalProjectVm),
    NotFound(NotFoundVm),
}
