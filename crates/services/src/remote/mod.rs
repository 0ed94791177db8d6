//! Client side of the exam backend API.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use exam_core::model::{Question, QuestionId, RemoteReviewItem, UserId};

use crate::error::RemoteError;

pub use http::HttpBackend;

/// Body of `POST /answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub selected_answer: usize,
}

/// Authoritative verdict returned by `POST /answers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVerdict {
    pub is_correct: bool,
}

/// The three backend endpoints the review engine depends on.
#[async_trait]
pub trait ExamBackend: Send + Sync {
    /// `GET /review-items?userId=`. An empty list is a valid answer, distinct
    /// from an error.
    async fn list_review_items(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RemoteReviewItem>, RemoteError>;

    /// `GET /questions/{id}`. Returns `Ok(None)` when the backend reports the
    /// question as not found.
    async fn fetch_question(&self, id: &QuestionId) -> Result<Option<Question>, RemoteError>;

    /// `POST /answers`, bounded by the answer timeout.
    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerVerdict, RemoteError>;
}
