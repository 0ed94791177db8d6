mod answer;
mod client_settings;
mod ids;
mod question;
mod queue;
mod review_item;

pub use answer::{AnswerRecord, LocalStats, incorrect_question_ids};
pub use client_settings::{
    ClientSettings, ClientSettingsDraft, ClientSettingsError, DEFAULT_ANSWER_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use ids::{ParseIdError, QuestionId, ReviewItemId, UserId};
pub use question::{Question, QuestionError};
pub use queue::{QueueSource, ReviewQueue};
pub use review_item::{MasteryStatus, RemoteReviewItem};
