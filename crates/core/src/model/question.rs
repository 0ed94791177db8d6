use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised when a question body is structurally unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {0} has no answer choices")]
    NoChoices(QuestionId),

    #[error("question {id} marks choice {index} as correct but only has {len} choices")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question body as served by `GET /questions/{id}`.
///
/// The correct index travels with the body so that a correctness verdict can
/// still be computed locally when answer submission fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub choices: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        choices: Vec<String>,
        correct_answer_index: usize,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            choices,
            correct_answer_index,
            explanation: None,
            category: None,
        }
    }

    /// Check the body is answerable.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if there are no choices or the correct index
    /// points past the end of the choice list.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.choices.is_empty() {
            return Err(QuestionError::NoChoices(self.id.clone()));
        }
        if self.correct_answer_index >= self.choices.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id: self.id.clone(),
                index: self.correct_answer_index,
                len: self.choices.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Local correctness judgment for a selected choice.
    #[must_use]
    pub fn is_correct_choice(&self, selected_index: usize) -> bool {
        selected_index == self.correct_answer_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
