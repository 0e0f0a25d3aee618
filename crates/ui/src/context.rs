use std::sync::Arc;

use course_core::Catalog;
use course_core::model::{CourseModule, LessonId};
use services::{LessonFlowService, ProgressStore};

use crate::routes::Route;
use crate::vm::{
    NotFoundVm, PageVm, map_dashboard, map_final_project, map_lesson_page, map_module_page,
};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<Catalog>;
    fn progress(&self) -> Arc<dyn ProgressStore>;
    fn lesson_flow(&self) -> Arc<LessonFlowService>;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<Catalog>,
    progress: Arc<dyn ProgressStore>,
    lesson_flow: Arc<LessonFlowService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            progress: app.progress(),
            lesson_flow: app.lesson_flow(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<dyn ProgressStore> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }

    /// Build the view model for a route.
    ///
    /// Opening a lesson page records it as the resume point, the same as a
    /// learner navigating to it.
    pub async fn page(&self, route: &Route) -> PageVm {
        match route {
            Route::Home => {
                let progress = self.progress.load().await;
                let resume = self.lesson_flow.resume_target().await;
                PageVm::Dashboard(map_dashboard(&self.catalog, &progress, resume.as_ref()))
            }
            Route::MasterClass => match self.master_class_lesson() {
                Some(lesson_id) => self.lesson_page(&lesson_id).await,
                None => PageVm::NotFound(NotFoundVm::lesson()),
            },
            Route::Module { module_id } => match self.catalog.module(module_id) {
                Some(module) => self.module_page(module).await,
                None => PageVm::NotFound(NotFoundVm::module()),
            },
            Route::Lesson { lesson_id } => self.lesson_page(lesson_id).await,
            Route::FinalProject => {
                let state = self.lesson_flow.final_project().await;
                PageVm::FinalProject(map_final_project(&self.catalog, state.as_ref()))
            }
        }
    }

    /// The introductory lesson: first lesson of the first module.
    fn master_class_lesson(&self) -> Option<LessonId> {
        self.catalog
            .modules()
            .first()
            .and_then(|module| module.lessons().first())
            .map(|lesson| lesson.id().clone())
    }

    async fn lesson_page(&self, lesson_id: &LessonId) -> PageVm {
        match self.lesson_flow.open_lesson(lesson_id).await {
            Ok(visit) => map_lesson_page(&self.catalog, &visit)
                .map_or_else(|| PageVm::NotFound(NotFoundVm::lesson()), PageVm::Lesson),
            Err(_) => PageVm::NotFound(NotFoundVm::lesson()),
        }
    }

    async fn module_page(&self, module: &CourseModule) -> PageVm {
        let progress = self.progress.load().await;
        PageVm::Module(map_module_page(module, &progress))
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
