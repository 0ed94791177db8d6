#![forbid(unsafe_code)]

pub mod answer_evaluator;
pub mod app_services;
pub mod error;
pub mod identity_service;
pub mod progress_log;
pub mod remote;
pub mod sessions;

#[cfg(test)]
mod test_support;

pub use exam_core::Clock;
pub use sessions as session;

pub use answer_evaluator::{AnswerEvaluator, Evaluation, Resolution};
pub use app_services::AppServices;
pub use error::{AppServicesError, RemoteError, SessionError};
pub use identity_service::IdentityService;
pub use progress_log::ProgressLog;
pub use remote::{AnswerSubmission, AnswerVerdict, ExamBackend, HttpBackend};
pub use sessions::{
    ReviewLoopService, ReviewQueueBuilder, ReviewSession, SessionPhase, SessionProgress,
    SessionView,
};
