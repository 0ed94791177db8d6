use crate::model::ids::QuestionId;
use crate::model::review_item::RemoteReviewItem;

/// Where the ids of a review queue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSource {
    /// Server-tracked review items.
    Remote,
    /// The "currently incorrect" set derived from the local progress log.
    Local,
}

impl QueueSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueueSource::Remote => "remote",
            QueueSource::Local => "local",
        }
    }
}

/// The fixed, ordered list of questions one review session will present.
///
/// Built once at session start from exactly one source and never mutated
/// afterwards; there is no API to push, remove, or reorder ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQueue {
    source: QueueSource,
    question_ids: Vec<QuestionId>,
    review_items: Vec<RemoteReviewItem>,
}

impl ReviewQueue {
    /// Queue built from server review items, in server order.
    #[must_use]
    pub fn from_remote(items: Vec<RemoteReviewItem>) -> Self {
        let question_ids = items.iter().map(|item| item.question_id.clone()).collect();
        Self {
            source: QueueSource::Remote,
            question_ids,
            review_items: items,
        }
    }

    /// Queue built from the locally derived incorrect set.
    #[must_use]
    pub fn from_local(question_ids: Vec<QuestionId>) -> Self {
        Self {
            source: QueueSource::Local,
            question_ids,
            review_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn source(&self) -> QueueSource {
        self.source
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuestionId> {
        self.question_ids.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.question_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }

    /// Server review item backing the entry at `index`, for remote queues.
    #[must_use]
    pub fn review_item(&self, index: usize) -> Option<&RemoteReviewItem> {
        self.review_items.get(index)
    }
}
