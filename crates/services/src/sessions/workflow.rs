use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::answer_evaluator::{AnswerEvaluator, Evaluation};
use crate::error::SessionError;
use crate::identity_service::IdentityService;
use crate::remote::ExamBackend;

use super::queue::ReviewQueueBuilder;
use super::session::{ReviewSession, SessionPhase};

/// Orchestrates a review session: builds the queue, loads each question, and
/// routes submissions through the evaluator.
///
/// All I/O lives here; [`ReviewSession`] only records the outcomes.
#[derive(Clone)]
pub struct ReviewLoopService {
    identity: IdentityService,
    builder: ReviewQueueBuilder,
    evaluator: AnswerEvaluator,
    backend: Arc<dyn ExamBackend>,
}

impl ReviewLoopService {
    #[must_use]
    pub fn new(
        identity: IdentityService,
        builder: ReviewQueueBuilder,
        evaluator: AnswerEvaluator,
        backend: Arc<dyn ExamBackend>,
    ) -> Self {
        Self {
            identity,
            builder,
            evaluator,
            backend,
        }
    }

    /// Resolve the learner, build the queue, and load the first question.
    ///
    /// The returned session is `Presenting`, or already terminal when the
    /// queue is empty, fully skipped, or a load failed.
    #[instrument(skip(self))]
    pub async fn start_session(&self) -> ReviewSession {
        let user_id = self.identity.get_or_create_user_id().await;
        let queue = self.builder.build_queue(&user_id).await;
        info!(
            source = queue.source().as_str(),
            len = queue.len(),
            "review session started"
        );

        let mut session = ReviewSession::start(queue, user_id);
        self.load_current(&mut session).await;
        session
    }

    /// Fetch bodies until a question can be shown or the session ends.
    ///
    /// Not-found entries are skipped; any other failure fails the session.
    /// Does nothing outside `Loading`.
    pub async fn load_current(&self, session: &mut ReviewSession) {
        while let Some(id) = session.pending_question_id().cloned() {
            let step = match self.backend.fetch_question(&id).await {
                Ok(Some(question)) => {
                    debug!(question_id = %id, "question loaded");
                    session.question_loaded(question)
                }
                Ok(None) => {
                    warn!(question_id = %id, "question not found; skipping");
                    session.question_missing()
                }
                Err(err) => {
                    warn!(%err, question_id = %id, "failed to load question");
                    session.load_failed(format!("Could not load question: {err}"))
                }
            };
            // Only reachable while `Loading`, so every step above is valid.
            if let Err(err) = step {
                warn!(%err, "unexpected session transition");
                break;
            }
        }

        if let SessionPhase::Complete { skipped_to_end } = session.phase() {
            info!(skipped_to_end, "review session complete");
        }
    }

    /// Submit the current selection and show its verdict.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when nothing is selected and
    /// `SessionError::InvalidTransition` outside `Presenting`. The evaluator
    /// itself never fails.
    pub async fn submit_answer(
        &self,
        session: &mut ReviewSession,
    ) -> Result<Evaluation, SessionError> {
        let (question, selected) = session.pending_submission()?;
        let evaluation = self
            .evaluator
            .evaluate(question, selected, session.user_id())
            .await;
        session.record_result(evaluation)?;
        Ok(evaluation)
    }

    /// Move past the shown result and load the next question, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `ShowingResult`.
    pub async fn next(&self, session: &mut ReviewSession) -> Result<(), SessionError> {
        session.advance()?;
        self.load_current(session).await;
        Ok(())
    }
}
