use exam_core::model::{Question, QueueSource, RemoteReviewItem};

use super::session::SessionPhase;

/// Presentation-agnostic snapshot of a review session.
///
/// Borrowed from the session; holds no pre-formatted strings beyond the
/// position label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub phase: &'a SessionPhase,
    pub question: Option<&'a Question>,
    pub selected_answer: Option<usize>,
    /// Present only once a result is shown.
    pub is_correct: Option<bool>,
    pub cursor: usize,
    pub queue_length: usize,
    pub source: QueueSource,
    /// Server bookkeeping for the current entry of a remote queue.
    pub review_item: Option<&'a RemoteReviewItem>,
}

impl SessionView<'_> {
    /// "3 / 7" style position of the cursor within the queue.
    #[must_use]
    pub fn position_label(&self) -> String {
        if self.queue_length == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.cursor + 1, self.queue_length)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.queue_length
    }
}

#[cfg(test)]
mod tests {
    use exam_core::model::{QuestionId, ReviewQueue, UserId};

    use crate::sessions::ReviewSession;
    use crate::test_support::{question, review_item};
    use exam_core::model::MasteryStatus;

    #[test]
    fn view_of_remote_queue_carries_review_item() {
        let queue = ReviewQueue::from_remote(vec![
            review_item("q1", MasteryStatus::Active),
            review_item("q2", MasteryStatus::Active),
        ]);
        let mut session = ReviewSession::start(queue, UserId::new("u1"));
        session.question_loaded(question("q1", 0)).unwrap();

        let view = session.view();
        assert_eq!(view.position_label(), "1 / 2");
        assert!(!view.is_last());
        assert_eq!(
            view.review_item.map(|item| &item.question_id),
            Some(&QuestionId::new("q1"))
        );
        assert_eq!(view.question.map(|q| q.id.as_str()), Some("q1"));
        assert!(view.is_correct.is_none());
    }

    #[test]
    fn view_of_empty_queue() {
        let session = ReviewSession::start(ReviewQueue::from_local(Vec::new()), UserId::new("u1"));
        let view = session.view();
        assert_eq!(view.position_label(), "0 / 0");
        assert!(view.question.is_none());
        assert!(view.review_item.is_none());
    }
}
