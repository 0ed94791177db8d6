use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use exam_core::model::{ClientSettings, Question, QuestionId, RemoteReviewItem, UserId};

use super::{AnswerSubmission, AnswerVerdict, ExamBackend};
use crate::error::RemoteError;

/// `reqwest`-based backend client.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    settings: ClientSettings,
}

impl HttpBackend {
    /// Build a client whose default per-request timeout is the settings'
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the TLS backend cannot be initialized.
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.settings.api_base_url().clone();
        url.path_segments_mut()
            .map_err(|()| {
                RemoteError::Network(format!("{} cannot be a base URL", self.settings.api_base()))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ExamBackend for HttpBackend {
    #[instrument(skip(self), level = "debug")]
    async fn list_review_items(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RemoteReviewItem>, RemoteError> {
        let url = self.endpoint(&["review-items"])?;
        let response = self
            .client
            .get(url)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_question(&self, id: &QuestionId) -> Result<Option<Question>, RemoteError> {
        let url = self.endpoint(&["questions", id.as_str()])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let question: Question = response.json().await?;
        question
            .validate()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(Some(question))
    }

    #[instrument(skip(self), level = "debug")]
    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerVerdict, RemoteError> {
        let url = self.endpoint(&["answers"])?;
        let response = self
            .client
            .post(url)
            .timeout(self.settings.answer_timeout())
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }
        Ok(response.json().await?)
    }
}
