//! In-memory backend used by unit tests across the crate.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use exam_core::model::{
    MasteryStatus, Question, QuestionId, RemoteReviewItem, ReviewItemId, UserId,
};

use crate::error::RemoteError;
use crate::remote::{AnswerSubmission, AnswerVerdict, ExamBackend};

#[derive(Default)]
struct Script {
    review_items: Option<Vec<RemoteReviewItem>>,
    questions: HashMap<QuestionId, Question>,
    broken_questions: HashSet<QuestionId>,
    verdict: Option<bool>,
    submissions: Vec<AnswerSubmission>,
    fetched: Vec<QuestionId>,
}

/// Backend whose responses are set up front. Missing questions are 404s;
/// review listing and answer submission fail unless scripted.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_review_items(self, items: Vec<RemoteReviewItem>) -> Self {
        self.script.lock().unwrap().review_items = Some(items);
        self
    }

    pub(crate) fn with_question(self, question: Question) -> Self {
        self.script
            .lock()
            .unwrap()
            .questions
            .insert(question.id.clone(), question);
        self
    }

    pub(crate) fn with_broken_question(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .broken_questions
            .insert(QuestionId::new(id));
        self
    }

    pub(crate) fn with_verdict(self, is_correct: bool) -> Self {
        self.script.lock().unwrap().verdict = Some(is_correct);
        self
    }

    pub(crate) fn failing_answers(self) -> Self {
        self.script.lock().unwrap().verdict = None;
        self
    }

    pub(crate) fn submissions(&self) -> Vec<AnswerSubmission> {
        self.script.lock().unwrap().submissions.clone()
    }

    pub(crate) fn fetched(&self) -> Vec<QuestionId> {
        self.script.lock().unwrap().fetched.clone()
    }
}

#[async_trait]
impl ExamBackend for ScriptedBackend {
    async fn list_review_items(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<RemoteReviewItem>, RemoteError> {
        self.script
            .lock()
            .unwrap()
            .review_items
            .clone()
            .ok_or_else(|| RemoteError::Network("connection refused".into()))
    }

    async fn fetch_question(&self, id: &QuestionId) -> Result<Option<Question>, RemoteError> {
        let mut script = self.script.lock().unwrap();
        script.fetched.push(id.clone());
        if script.broken_questions.contains(id) {
            return Err(RemoteError::Network("connection reset".into()));
        }
        Ok(script.questions.get(id).cloned())
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerVerdict, RemoteError> {
        let mut script = self.script.lock().unwrap();
        script.submissions.push(submission.clone());
        script
            .verdict
            .map(|is_correct| AnswerVerdict { is_correct })
            .ok_or(RemoteError::Timeout)
    }
}

pub(crate) fn review_item(question_id: &str, status: MasteryStatus) -> RemoteReviewItem {
    RemoteReviewItem {
        id: ReviewItemId::new(format!("ri-{question_id}")),
        question_id: QuestionId::new(question_id),
        user_id: UserId::new("u1"),
        correct_count: 0,
        status,
        first_wrong_at: None,
        last_answered_at: None,
        mastered_at: None,
    }
}

pub(crate) fn question(id: &str, correct: usize) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}"),
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct,
    )
}
