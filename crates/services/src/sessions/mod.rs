mod progress;
mod queue;
mod session;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use queue::ReviewQueueBuilder;
pub use session::{ReviewSession, SessionPhase, SessionPhaseKind};
pub use view::SessionView;
pub use workflow::ReviewLoopService;
