use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{QuestionId, ReviewItemId, UserId};

/// Server-determined mastery status of a review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    #[default]
    Active,
    Mastered,
}

/// A server-tracked record that a question is due for review for a user.
///
/// Read-only to this engine: `correct_count` and `status` are computed by the
/// backend and only displayed or filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReviewItem {
    pub id: ReviewItemId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub status: MasteryStatus,
    #[serde(default)]
    pub first_wrong_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_answered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mastered_at: Option<DateTime<Utc>>,
}

impl RemoteReviewItem {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MasteryStatus::Active
    }
}
