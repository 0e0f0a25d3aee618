use std::sync::Arc;

use tracing::warn;

use course_core::Catalog;
use storage::repository::Storage;

use crate::Clock;
use crate::lesson_flow::LessonFlowService;
use crate::progress_service::{ProgressService, ProgressStore};

/// Assembles app-facing services around one catalog and one progress store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    lesson_flow: Arc<LessonFlowService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// A database that cannot be opened or migrated does not stop the app:
    /// the failure is logged and progress is kept in memory for the session.
    pub async fn open_sqlite(db_url: &str, clock: Clock, catalog: Catalog) -> Self {
        let storage = match Storage::sqlite(db_url).await {
            Ok(storage) => storage,
            Err(err) => {
                warn!(error = %err, "progress store unavailable, progress will not be saved");
                Storage::unavailable(err.to_string())
            }
        };
        Self::from_storage(&storage, clock, catalog)
    }

    /// Build services that forget everything when the process exits.
    #[must_use]
    pub fn in_memory(clock: Clock, catalog: Catalog) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, catalog)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, catalog: Catalog) -> Self {
        if let Some((declared, actual)) = catalog.metadata_mismatch() {
            warn!(
                declared,
                actual, "course metadata lesson count disagrees with the catalog"
            );
        }

        let catalog = Arc::new(catalog);
        let progress = Arc::new(ProgressService::new(
            clock,
            catalog.total_lessons(),
            Arc::clone(&storage.kv),
        ));
        let store: Arc<dyn ProgressStore> = progress.clone();
        let lesson_flow = Arc::new(LessonFlowService::new(Arc::clone(&catalog), store));

        Self {
            catalog,
            progress,
            lesson_flow,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<dyn ProgressStore> {
        self.progress.clone()
    }

    #[must_use]
    pub fn lesson_flow(&self) -> Arc<LessonFlowService> {
        Arc::clone(&self.lesson_flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress_service::Persistence;
    use course_core::model::LessonId;
    use course_core::time::fixed_clock;

    #[tokio::test]
    async fn unopenable_database_degrades_to_memory() {
        let services = AppServices::open_sqlite(
            "sqlite:///nonexistent-dir/course.sqlite3",
            fixed_clock(),
            Catalog::builtin().unwrap(),
        )
        .await;
        let progress = services.progress();

        assert_eq!(progress.load().await.completed_count(), 0);
        assert_eq!(progress.persistence().await, Persistence::InMemoryOnly);

        services
            .lesson_flow()
            .mark_complete(&LessonId::new("les-mc-1").unwrap())
            .await
            .unwrap();
        assert_eq!(progress.completed_count().await, 1);
    }

    #[tokio::test]
    async fn shared_memory_database_is_durable() {
        let services = AppServices::open_sqlite(
            "sqlite:file:memdb_app_services?mode=memory&cache=shared",
            fixed_clock(),
            Catalog::builtin().unwrap(),
        )
        .await;
        services.progress().load().await;
        assert_eq!(services.progress().persistence().await, Persistence::Durable);
    }
}
