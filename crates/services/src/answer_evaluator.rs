use std::sync::Arc;

use tracing::{debug, warn};

use exam_core::model::{Question, UserId};

use crate::progress_log::ProgressLog;
use crate::remote::{AnswerSubmission, ExamBackend};

/// Which tier produced a correctness verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The backend's `POST /answers` verdict.
    Remote,
    /// Local comparison against the question's correct index after the
    /// backend could not be reached.
    LocalFallback,
}

/// Outcome of evaluating one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub resolution: Resolution,
}

/// Resolves "was this answer correct?" and writes the outcome locally.
#[derive(Clone)]
pub struct AnswerEvaluator {
    backend: Arc<dyn ExamBackend>,
    progress: ProgressLog,
}

impl AnswerEvaluator {
    #[must_use]
    pub fn new(backend: Arc<dyn ExamBackend>, progress: ProgressLog) -> Self {
        Self { backend, progress }
    }

    /// Judge `selected_index` for `question`.
    ///
    /// The backend verdict is authoritative when the submission succeeds; any
    /// failure (timeout, network, server error) falls back silently to local
    /// judgment. Either way exactly one record is appended to the progress log.
    pub async fn evaluate(
        &self,
        question: &Question,
        selected_index: usize,
        user_id: &UserId,
    ) -> Evaluation {
        let submission = AnswerSubmission {
            question_id: question.id.clone(),
            user_id: user_id.clone(),
            selected_answer: selected_index,
        };

        let evaluation = match self.backend.submit_answer(&submission).await {
            Ok(verdict) => Evaluation {
                is_correct: verdict.is_correct,
                resolution: Resolution::Remote,
            },
            Err(err) => {
                warn!(%err, question_id = %question.id, "answer submission failed; judging locally");
                Evaluation {
                    is_correct: question.is_correct_choice(selected_index),
                    resolution: Resolution::LocalFallback,
                }
            }
        };
        debug!(
            question_id = %question.id,
            is_correct = evaluation.is_correct,
            resolution = ?evaluation.resolution,
            "answer evaluated"
        );

        self.progress
            .record_answer(&question.id, evaluation.is_correct)
            .await;
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedBackend;
    use exam_core::model::QuestionId;
    use exam_core::time::fixed_clock;
    use storage::InMemoryStore;

    fn question() -> Question {
        Question::new(
            QuestionId::new("q1"),
            "Pick C",
            vec!["A".into(), "B".into(), "C".into()],
            2,
        )
    }

    fn evaluator(backend: ScriptedBackend) -> (AnswerEvaluator, ProgressLog, ScriptedBackend) {
        let progress = ProgressLog::new(Arc::new(InMemoryStore::new()), fixed_clock());
        let evaluator = AnswerEvaluator::new(Arc::new(backend.clone()), progress.clone());
        (evaluator, progress, backend)
    }

    #[tokio::test]
    async fn remote_verdict_is_authoritative() {
        // Backend disagrees with the local key; its verdict must win.
        let (evaluator, progress, backend) =
            evaluator(ScriptedBackend::new().with_verdict(true));

        let eval = evaluator.evaluate(&question(), 0, &UserId::new("u1")).await;
        assert_eq!(
            eval,
            Evaluation {
                is_correct: true,
                resolution: Resolution::Remote
            }
        );

        let records = progress.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question_id, QuestionId::new("q1"));
        assert!(records[0].is_correct);

        let sent = backend.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].selected_answer, 0);
        assert_eq!(sent[0].user_id, UserId::new("u1"));
    }

    #[tokio::test]
    async fn failed_submission_falls_back_to_local_judgment() {
        let (evaluator, progress, _) = evaluator(ScriptedBackend::new().failing_answers());

        let right = evaluator.evaluate(&question(), 2, &UserId::new("u1")).await;
        assert!(right.is_correct);
        assert_eq!(right.resolution, Resolution::LocalFallback);

        let wrong = evaluator.evaluate(&question(), 1, &UserId::new("u1")).await;
        assert!(!wrong.is_correct);
        assert_eq!(wrong.resolution, Resolution::LocalFallback);

        let records = progress.records().await;
        assert_eq!(records.len(), 2);
        assert!(records[0].is_correct);
        assert!(!records[1].is_correct);
        assert_eq!(
            progress.incorrect_question_ids().await,
            vec![QuestionId::new("q1")]
        );
    }

    #[tokio::test]
    async fn exactly_one_record_per_evaluation_on_both_paths() {
        let (remote, remote_log, _) = evaluator(ScriptedBackend::new().with_verdict(false));
        let (local, local_log, _) = evaluator(ScriptedBackend::new().failing_answers());

        for _ in 0..3 {
            remote.evaluate(&question(), 2, &UserId::new("u1")).await;
            local.evaluate(&question(), 2, &UserId::new("u1")).await;
        }
        assert_eq!(remote_log.stats().await.total_answered, 3);
        assert_eq!(remote_log.stats().await.correct_count, 0);
        assert_eq!(local_log.stats().await.total_answered, 3);
        assert_eq!(local_log.stats().await.correct_count, 3);
    }
}
