use std::sync::Arc;

use exam_core::model::ClientSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::answer_evaluator::AnswerEvaluator;
use crate::error::AppServicesError;
use crate::identity_service::IdentityService;
use crate::progress_log::ProgressLog;
use crate::remote::{ExamBackend, HttpBackend};
use crate::sessions::{ReviewLoopService, ReviewQueueBuilder};

/// Assembles app-facing services over one store and one backend.
#[derive(Clone)]
pub struct AppServices {
    identity: Arc<IdentityService>,
    progress: Arc<ProgressLog>,
    review_loop: Arc<ReviewLoopService>,
    backend: Arc<dyn ExamBackend>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        settings: ClientSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let backend: Arc<dyn ExamBackend> = Arc::new(HttpBackend::new(settings)?);
        Ok(Self::from_parts(&storage, backend, clock))
    }

    /// Build services over an in-memory store and the given backend.
    #[must_use]
    pub fn in_memory(backend: Arc<dyn ExamBackend>, clock: Clock) -> Self {
        Self::from_parts(&Storage::in_memory(), backend, clock)
    }

    #[must_use]
    pub fn from_parts(storage: &Storage, backend: Arc<dyn ExamBackend>, clock: Clock) -> Self {
        let identity = IdentityService::new(Arc::clone(&storage.kv));
        let progress = ProgressLog::new(Arc::clone(&storage.kv), clock);
        let review_loop = ReviewLoopService::new(
            identity.clone(),
            ReviewQueueBuilder::new(Arc::clone(&backend), progress.clone()),
            AnswerEvaluator::new(Arc::clone(&backend), progress.clone()),
            Arc::clone(&backend),
        );

        Self {
            identity: Arc::new(identity),
            progress: Arc::new(progress),
            review_loop: Arc::new(review_loop),
            backend,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Arc<IdentityService> {
        Arc::clone(&self.identity)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressLog> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn review_loop(&self) -> Arc<ReviewLoopService> {
        Arc::clone(&self.review_loop)
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn ExamBackend> {
        Arc::clone(&self.backend)
    }
}
