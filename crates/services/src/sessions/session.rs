use std::fmt;

use exam_core::model::{Question, QuestionId, ReviewQueue, UserId};

use super::progress::SessionProgress;
use super::view::SessionView;
use crate::answer_evaluator::Evaluation;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a review session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Fetching the body of the question under the cursor.
    Loading,
    /// Question shown; the learner may pick or change an answer.
    Presenting,
    /// Answer submitted; the question stays visible with its verdict.
    ShowingResult,
    /// The queue had no entries at all. Terminal.
    Empty,
    /// The cursor moved past the last entry. `skipped_to_end` is set when the
    /// tail of the queue was skipped as not-found ("nothing left"). Terminal.
    Complete { skipped_to_end: bool },
    /// A question body could not be loaded for a reason other than not-found.
    /// Terminal; not retried.
    Failed { message: String },
}

/// Fieldless mirror of [`SessionPhase`] for errors and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhaseKind {
    Loading,
    Presenting,
    ShowingResult,
    Empty,
    Complete,
    Failed,
}

impl SessionPhase {
    #[must_use]
    pub fn kind(&self) -> SessionPhaseKind {
        match self {
            SessionPhase::Loading => SessionPhaseKind::Loading,
            SessionPhase::Presenting => SessionPhaseKind::Presenting,
            SessionPhase::ShowingResult => SessionPhaseKind::ShowingResult,
            SessionPhase::Empty => SessionPhaseKind::Empty,
            SessionPhase::Complete { .. } => SessionPhaseKind::Complete,
            SessionPhase::Failed { .. } => SessionPhaseKind::Failed,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Empty | SessionPhase::Complete { .. } | SessionPhase::Failed { .. }
        )
    }
}

impl fmt::Display for SessionPhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionPhaseKind::Loading => "loading a question",
            SessionPhaseKind::Presenting => "presenting a question",
            SessionPhaseKind::ShowingResult => "showing a result",
            SessionPhaseKind::Empty => "the queue is empty",
            SessionPhaseKind::Complete => "the session is complete",
            SessionPhaseKind::Failed => "the session has failed",
        };
        f.write_str(text)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One review session over a fixed queue.
///
/// Pure state machine: it performs no I/O. [`super::ReviewLoopService`] feeds
/// it the results of backend calls. The queue is never modified; advancing
/// only moves the cursor. Every method that rejects an action leaves the
/// session unchanged.
pub struct ReviewSession {
    queue: ReviewQueue,
    user_id: UserId,
    cursor: usize,
    phase: SessionPhase,
    question: Option<Question>,
    selected_answer: Option<usize>,
    evaluation: Option<Evaluation>,
    answered: usize,
    correct: usize,
    skipped: usize,
}

impl ReviewSession {
    /// Start a session: `Empty` for an empty queue, otherwise `Loading` the
    /// first entry.
    #[must_use]
    pub fn start(queue: ReviewQueue, user_id: UserId) -> Self {
        let phase = if queue.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Loading
        };
        Self {
            queue,
            user_id,
            cursor: 0,
            phase,
            question: None,
            selected_answer: None,
            evaluation: None,
            answered: 0,
            correct: 0,
            skipped: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    #[must_use]
    pub fn evaluation(&self) -> Option<Evaluation> {
        self.evaluation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Id whose body should be fetched next, while `Loading`.
    #[must_use]
    pub fn pending_question_id(&self) -> Option<&QuestionId> {
        match self.phase {
            SessionPhase::Loading => self.queue.get(self.cursor),
            _ => None,
        }
    }

    /// `Loading` → `Presenting` with the fetched body.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Loading`.
    pub fn question_loaded(&mut self, question: Question) -> Result<(), SessionError> {
        self.expect_phase(SessionPhaseKind::Loading, "show a question")?;
        self.question = Some(question);
        self.phase = SessionPhase::Presenting;
        Ok(())
    }

    /// The entry under the cursor no longer resolves: skip it.
    ///
    /// Stays `Loading` for the next entry, or completes with
    /// `skipped_to_end` when it was the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Loading`.
    pub fn question_missing(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhaseKind::Loading, "skip a question")?;
        self.skipped += 1;
        if self.cursor + 1 < self.queue.len() {
            self.cursor += 1;
        } else {
            self.phase = SessionPhase::Complete {
                skipped_to_end: true,
            };
        }
        Ok(())
    }

    /// Loading failed for a reason other than not-found. Fatal for the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Loading`.
    pub fn load_failed(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.expect_phase(SessionPhaseKind::Loading, "fail a load")?;
        self.phase = SessionPhase::Failed {
            message: message.into(),
        };
        Ok(())
    }

    /// Pick an answer for the current question, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SelectionFrozen` once the result is shown,
    /// `SessionError::ChoiceOutOfRange` for an index past the last choice, and
    /// `SessionError::InvalidTransition` in any other phase.
    pub fn select_answer(&mut self, index: usize) -> Result<(), SessionError> {
        if self.phase == SessionPhase::ShowingResult {
            return Err(SessionError::SelectionFrozen);
        }
        self.expect_phase(SessionPhaseKind::Presenting, "select an answer")?;

        let len = self.question.as_ref().map_or(0, Question::choice_count);
        if index >= len {
            return Err(SessionError::ChoiceOutOfRange { index, len });
        }
        self.selected_answer = Some(index);
        Ok(())
    }

    /// The question and selection to submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Presenting` and
    /// `SessionError::NoSelection` when nothing was picked.
    pub fn pending_submission(&self) -> Result<(&Question, usize), SessionError> {
        self.expect_phase(SessionPhaseKind::Presenting, "submit an answer")?;
        let selected = self.selected_answer.ok_or(SessionError::NoSelection)?;
        let question = self.question.as_ref().ok_or(SessionError::InvalidTransition {
            action: "submit an answer",
            phase: SessionPhaseKind::Loading,
        })?;
        Ok((question, selected))
    }

    /// `Presenting` → `ShowingResult`, freezing the selection.
    ///
    /// # Errors
    ///
    /// Same as [`Self::pending_submission`].
    pub fn record_result(&mut self, evaluation: Evaluation) -> Result<(), SessionError> {
        self.pending_submission()?;
        self.evaluation = Some(evaluation);
        self.answered += 1;
        if evaluation.is_correct {
            self.correct += 1;
        }
        self.phase = SessionPhase::ShowingResult;
        Ok(())
    }

    /// Move past the shown result: `Loading` the next entry, or `Complete`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `ShowingResult`.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhaseKind::ShowingResult, "move to the next question")?;
        self.question = None;
        self.selected_answer = None;
        self.evaluation = None;

        if self.cursor + 1 < self.queue.len() {
            self.cursor += 1;
            self.phase = SessionPhase::Loading;
        } else {
            self.phase = SessionPhase::Complete {
                skipped_to_end: false,
            };
        }
        Ok(())
    }

    /// Snapshot of everything a renderer needs.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            phase: &self.phase,
            question: self.question.as_ref(),
            selected_answer: self.selected_answer,
            is_correct: self.evaluation.map(|e| e.is_correct),
            cursor: self.cursor,
            queue_length: self.queue.len(),
            source: self.queue.source(),
            review_item: self.queue.review_item(self.cursor),
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.queue.len();
        let consumed = self.answered + self.skipped;
        SessionProgress {
            total,
            position: if total == 0 { 0 } else { self.cursor + 1 },
            answered: self.answered,
            correct: self.correct,
            skipped: self.skipped,
            remaining: total.saturating_sub(consumed),
            is_finished: self.is_finished(),
        }
    }

    fn expect_phase(
        &self,
        expected: SessionPhaseKind,
        action: &'static str,
    ) -> Result<(), SessionError> {
        let phase = self.phase.kind();
        if phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { action, phase })
        }
    }
}

impl fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewSession")
            .field("source", &self.queue.source())
            .field("queue_len", &self.queue.len())
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("answered", &self.answered)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_evaluator::Resolution;
    use crate::test_support::question;

    fn queue(ids: &[&str]) -> ReviewQueue {
        ReviewQueue::from_local(ids.iter().map(|id| QuestionId::new(*id)).collect())
    }

    fn session(ids: &[&str]) -> ReviewSession {
        ReviewSession::start(queue(ids), UserId::new("u1"))
    }

    fn verdict(is_correct: bool) -> Evaluation {
        Evaluation {
            is_correct,
            resolution: Resolution::Remote,
        }
    }

    #[test]
    fn empty_queue_starts_in_empty() {
        let s = session(&[]);
        assert_eq!(s.phase(), &SessionPhase::Empty);
        assert!(s.is_finished());
        assert!(s.pending_question_id().is_none());
    }

    #[test]
    fn non_empty_queue_starts_loading_first_entry() {
        let s = session(&["q1", "q2"]);
        assert_eq!(s.phase(), &SessionPhase::Loading);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.pending_question_id(), Some(&QuestionId::new("q1")));
    }

    #[test]
    fn full_walk_through_two_questions() {
        let mut s = session(&["q1", "q2"]);
        s.question_loaded(question("q1", 0)).unwrap();
        assert_eq!(s.phase(), &SessionPhase::Presenting);

        s.select_answer(0).unwrap();
        s.record_result(verdict(true)).unwrap();
        assert_eq!(s.phase(), &SessionPhase::ShowingResult);
        assert_eq!(s.current_question().map(|q| q.id.as_str()), Some("q1"));

        s.advance().unwrap();
        assert_eq!(s.phase(), &SessionPhase::Loading);
        assert_eq!(s.cursor(), 1);
        assert!(s.selected_answer().is_none());
        assert!(s.evaluation().is_none());
        assert!(s.current_question().is_none());

        s.question_loaded(question("q2", 1)).unwrap();
        s.select_answer(3).unwrap();
        s.record_result(verdict(false)).unwrap();
        s.advance().unwrap();
        assert_eq!(
            s.phase(),
            &SessionPhase::Complete {
                skipped_to_end: false
            }
        );

        let progress = s.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.correct, 1);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_finished);
    }

    #[test]
    fn answering_never_shrinks_the_queue() {
        let mut s = session(&["q1", "q2"]);
        s.question_loaded(question("q1", 0)).unwrap();
        s.select_answer(0).unwrap();
        s.record_result(verdict(true)).unwrap();
        s.advance().unwrap();

        assert_eq!(s.queue().len(), 2);
        assert_eq!(
            s.queue().question_ids(),
            &[QuestionId::new("q1"), QuestionId::new("q2")]
        );
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn selection_can_change_until_submitted_then_freezes() {
        let mut s = session(&["q1"]);
        s.question_loaded(question("q1", 2)).unwrap();
        s.select_answer(0).unwrap();
        s.select_answer(2).unwrap();
        assert_eq!(s.selected_answer(), Some(2));

        s.record_result(verdict(true)).unwrap();
        assert_eq!(s.select_answer(1), Err(SessionError::SelectionFrozen));
        assert_eq!(s.selected_answer(), Some(2));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut s = session(&["q1"]);
        s.question_loaded(question("q1", 0)).unwrap();
        assert_eq!(
            s.select_answer(4),
            Err(SessionError::ChoiceOutOfRange { index: 4, len: 4 })
        );
        assert!(s.selected_answer().is_none());
    }

    #[test]
    fn submit_without_selection_is_rejected() {
        let mut s = session(&["q1"]);
        s.question_loaded(question("q1", 0)).unwrap();
        assert_eq!(s.record_result(verdict(true)), Err(SessionError::NoSelection));
        assert_eq!(s.phase(), &SessionPhase::Presenting);
    }

    #[test]
    fn missing_question_skips_to_next_entry() {
        let mut s = session(&["missing", "q2"]);
        s.question_missing().unwrap();
        assert_eq!(s.phase(), &SessionPhase::Loading);
        assert_eq!(s.pending_question_id(), Some(&QuestionId::new("q2")));
        assert_eq!(s.progress().skipped, 1);
    }

    #[test]
    fn skipping_the_last_entry_completes_with_nothing_left() {
        let mut s = session(&["gone1", "gone2"]);
        s.question_missing().unwrap();
        s.question_missing().unwrap();
        assert_eq!(
            s.phase(),
            &SessionPhase::Complete {
                skipped_to_end: true
            }
        );
        assert_ne!(s.phase(), &SessionPhase::Empty);
    }

    #[test]
    fn load_failure_is_terminal() {
        let mut s = session(&["q1", "q2"]);
        s.load_failed("connection reset").unwrap();
        assert_eq!(
            s.phase(),
            &SessionPhase::Failed {
                message: "connection reset".into()
            }
        );
        assert!(s.is_finished());
        assert!(s.pending_question_id().is_none());
        assert!(matches!(
            s.question_loaded(question("q1", 0)),
            Err(SessionError::InvalidTransition {
                phase: SessionPhaseKind::Failed,
                ..
            })
        ));
    }

    #[test]
    fn invalid_actions_leave_state_untouched() {
        let mut s = session(&["q1"]);
        assert!(matches!(
            s.advance(),
            Err(SessionError::InvalidTransition {
                phase: SessionPhaseKind::Loading,
                ..
            })
        ));
        assert!(matches!(
            s.select_answer(0),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert_eq!(s.phase(), &SessionPhase::Loading);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn invalid_transition_message_names_action_and_phase() {
        let mut s = session(&[]);
        let err = s.question_missing().unwrap_err();
        assert_eq!(err.to_string(), "cannot skip a question while the queue is empty");
    }
}
