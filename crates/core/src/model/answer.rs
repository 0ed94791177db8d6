use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::QuestionId;

//
// ─── ANSWER RECORD ────────────────────────────────────────────────────────────
//

/// One answered question in the local, append-only progress log.
///
/// Records are ordered by append position; `answered_at` is informational and
/// may be missing in logs written before it existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(question_id: QuestionId, is_correct: bool, answered_at: DateTime<Utc>) -> Self {
        Self {
            question_id,
            is_correct,
            answered_at: Some(answered_at),
        }
    }
}

//
// ─── LOCAL STATS ──────────────────────────────────────────────────────────────
//

/// Aggregate counts over every record in the log, including superseded ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalStats {
    pub total_answered: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Percentage in `0.0..=100.0`; `0.0` for an empty log.
    pub accuracy: f64,
}

impl LocalStats {
    #[must_use]
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        let total_answered = records.len();
        let correct_count = records.iter().filter(|r| r.is_correct).count();
        let incorrect_count = total_answered - correct_count;

        // Counts are bounded by what fits in a local log; f64 is exact here.
        #[allow(clippy::cast_precision_loss)]
        let accuracy = if total_answered == 0 {
            0.0
        } else {
            correct_count as f64 / total_answered as f64 * 100.0
        };

        Self {
            total_answered,
            correct_count,
            incorrect_count,
            accuracy,
        }
    }

    /// Accuracy rounded to a whole percent for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn accuracy_percent(&self) -> u32 {
        self.accuracy.round() as u32
    }
}

//
// ─── INCORRECT SET ────────────────────────────────────────────────────────────
//

/// Ids whose most recent record is incorrect, in first-appearance order.
///
/// A question answered wrong and later answered right is excluded even though
/// its incorrect record is still in the log.
#[must_use]
pub fn incorrect_question_ids(records: &[AnswerRecord]) -> Vec<QuestionId> {
    let mut order: Vec<&QuestionId> = Vec::new();
    let mut latest: HashMap<&QuestionId, bool> = HashMap::new();

    for record in records {
        if latest.insert(&record.question_id, record.is_correct).is_none() {
            order.push(&record.question_id);
        }
    }

    order
        .into_iter()
        .filter(|id| latest.get(id) == Some(&false))
        .cloned()
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
