use std::sync::Arc;

use tracing::{debug, warn};

use exam_core::model::{RemoteReviewItem, ReviewQueue, UserId};

use crate::progress_log::ProgressLog;
use crate::remote::ExamBackend;

/// Decides, once per session, which questions the learner reviews.
///
/// Whichever source answers with data wins; the two sources are never merged.
/// Server review items take precedence because they reflect cross-device
/// history. A failed listing, or one with no active items, falls back to the
/// local incorrect set.
#[derive(Clone)]
pub struct ReviewQueueBuilder {
    backend: Arc<dyn ExamBackend>,
    progress: ProgressLog,
}

impl ReviewQueueBuilder {
    #[must_use]
    pub fn new(backend: Arc<dyn ExamBackend>, progress: ProgressLog) -> Self {
        Self { backend, progress }
    }

    /// Build the queue for this session. Never fails; an empty queue means
    /// there is nothing to review.
    ///
    /// Remote items whose status is `mastered` are filtered out; a listing
    /// left with no items after that filter falls back to local history.
    pub async fn build_queue(&self, user_id: &UserId) -> ReviewQueue {
        match self.backend.list_review_items(user_id).await {
            Ok(items) => {
                let active: Vec<RemoteReviewItem> =
                    items.into_iter().filter(RemoteReviewItem::is_active).collect();
                if !active.is_empty() {
                    debug!(count = active.len(), "review queue from server review items");
                    return ReviewQueue::from_remote(active);
                }
                debug!("server has no active review items; using local history");
            }
            Err(err) => warn!(%err, "review item listing failed; using local history"),
        }

        let local = self.progress.incorrect_question_ids().await;
        debug!(count = local.len(), "review queue from local history");
        ReviewQueue::from_local(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedBackend, review_item};
    use exam_core::model::{MasteryStatus, QueueSource, QuestionId};
    use exam_core::time::fixed_clock;
    use storage::InMemoryStore;

    async fn local_log_with_q1_incorrect() -> ProgressLog {
        let progress = ProgressLog::new(Arc::new(InMemoryStore::new()), fixed_clock());
        progress.record_answer(&QuestionId::new("q1"), false).await;
        progress.record_answer(&QuestionId::new("q2"), true).await;
        progress
    }

    fn builder(backend: ScriptedBackend, progress: ProgressLog) -> ReviewQueueBuilder {
        ReviewQueueBuilder::new(Arc::new(backend), progress)
    }

    #[tokio::test]
    async fn remote_items_take_precedence_over_local_log() {
        let progress = local_log_with_q1_incorrect().await;
        let backend =
            ScriptedBackend::new().with_review_items(vec![review_item("ri1", MasteryStatus::Active)]);

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        assert_eq!(queue.source(), QueueSource::Remote);
        assert_eq!(queue.question_ids(), &[QuestionId::new("ri1")]);
    }

    #[tokio::test]
    async fn remote_order_is_preserved() {
        let backend = ScriptedBackend::new().with_review_items(vec![
            review_item("q9", MasteryStatus::Active),
            review_item("q1", MasteryStatus::Active),
            review_item("q5", MasteryStatus::Active),
        ]);
        let progress = ProgressLog::new(Arc::new(InMemoryStore::new()), fixed_clock());

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        let ids: Vec<&str> = queue.question_ids().iter().map(QuestionId::as_str).collect();
        assert_eq!(ids, ["q9", "q1", "q5"]);
    }

    #[tokio::test]
    async fn empty_remote_list_falls_back_to_local() {
        let progress = local_log_with_q1_incorrect().await;
        let backend = ScriptedBackend::new().with_review_items(Vec::new());

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        assert_eq!(queue.source(), QueueSource::Local);
        assert_eq!(queue.question_ids(), &[QuestionId::new("q1")]);
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_local() {
        let progress = local_log_with_q1_incorrect().await;
        let backend = ScriptedBackend::new();

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        assert_eq!(queue.source(), QueueSource::Local);
        assert_eq!(queue.question_ids(), &[QuestionId::new("q1")]);
    }

    #[tokio::test]
    async fn only_mastered_remote_items_count_as_empty() {
        let progress = local_log_with_q1_incorrect().await;
        let backend = ScriptedBackend::new()
            .with_review_items(vec![review_item("q7", MasteryStatus::Mastered)]);

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        assert_eq!(queue.source(), QueueSource::Local);
        assert_eq!(queue.question_ids(), &[QuestionId::new("q1")]);
    }

    #[tokio::test]
    async fn mastered_items_are_dropped_from_a_remote_queue() {
        let backend = ScriptedBackend::new().with_review_items(vec![
            review_item("q1", MasteryStatus::Mastered),
            review_item("q2", MasteryStatus::Active),
        ]);
        let progress = ProgressLog::new(Arc::new(InMemoryStore::new()), fixed_clock());

        let queue = builder(backend, progress).build_queue(&UserId::new("u1")).await;
        assert_eq!(queue.source(), QueueSource::Remote);
        assert_eq!(queue.question_ids(), &[QuestionId::new("q2")]);
    }

    #[tokio::test]
    async fn nothing_anywhere_is_an_empty_queue() {
        let progress = ProgressLog::new(Arc::new(InMemoryStore::new()), fixed_clock());
        let queue = builder(ScriptedBackend::new(), progress)
            .build_queue(&UserId::new("u1"))
            .await;
        assert!(queue.is_empty());
    }
}
