use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use exam_core::Clock;
use exam_core::model::{AnswerRecord, LocalStats, QuestionId, incorrect_question_ids};
use storage::keys;
use storage::{KeyValueStore, StorageError};
use storage::repository::{load_json, save_json};

/// Durable, append-only log of answer outcomes on this device.
///
/// The log in the store is the single source of truth: every read goes back
/// to the store and derives stats or the incorrect set from scratch, so no
/// cached summary can drift from what was persisted.
///
/// Persistence is best effort and none of these calls fail. A missing,
/// unreadable, or corrupt log reads as empty. An append rewrites a corrupt log
/// from scratch but is dropped when the log cannot be read at all, so a
/// transient storage error never overwrites existing history.
#[derive(Clone)]
pub struct ProgressLog {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
    append_lock: Arc<Mutex<()>>,
}

impl ProgressLog {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append one outcome and persist the whole log before returning.
    pub async fn record_answer(&self, question_id: &QuestionId, is_correct: bool) {
        // Load-append-store must not interleave with another append.
        let _guard = self.append_lock.lock().await;

        let mut records = match self.load_for_append().await {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, %question_id, "answer log unreadable; answer not recorded");
                return;
            }
        };
        records.push(AnswerRecord::new(
            question_id.clone(),
            is_correct,
            self.clock.now(),
        ));

        match save_json(self.store.as_ref(), keys::PROGRESS, &records).await {
            Ok(()) => debug!(%question_id, is_correct, total = records.len(), "answer recorded"),
            Err(err) => warn!(%err, %question_id, "failed to persist answer log"),
        }
    }

    /// Aggregate counts over the whole log.
    pub async fn stats(&self) -> LocalStats {
        LocalStats::from_records(&self.load().await)
    }

    /// Questions whose latest outcome is incorrect, oldest mistake first.
    pub async fn incorrect_question_ids(&self) -> Vec<QuestionId> {
        incorrect_question_ids(&self.load().await)
    }

    /// Every record in append order.
    pub async fn records(&self) -> Vec<AnswerRecord> {
        self.load().await
    }

    /// Forget all local history.
    pub async fn clear(&self) {
        let _guard = self.append_lock.lock().await;
        if let Err(err) = self.store.remove(keys::PROGRESS).await {
            warn!(%err, "failed to clear answer log");
        }
    }

    async fn load_for_append(&self) -> Result<Vec<AnswerRecord>, StorageError> {
        match load_json::<Vec<AnswerRecord>>(self.store.as_ref(), keys::PROGRESS).await {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(StorageError::Serialization(msg)) => {
                warn!(error = %msg, "answer log is corrupt; starting a new one");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn load(&self) -> Vec<AnswerRecord> {
        match load_json::<Vec<AnswerRecord>>(self.store.as_ref(), keys::PROGRESS).await {
            Ok(records) => records.unwrap_or_default(),
            Err(err) => {
                warn!(%err, "answer log unavailable; treating as empty");
                Vec::new()
            }
        }
    }
}
