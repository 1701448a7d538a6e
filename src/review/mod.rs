//! Review Flow
//!
//! - [`matching`]: local answer checking
//! - [`session`]: the review-session state machine
//! - `driver`: backend orchestration (native builds)

pub mod matching;
pub mod session;

#[cfg(feature = "native")]
pub mod driver;

pub use matching::{check_answer, AnswerCheck, AnswerMatch};
pub use session::{GradeCommand, Phase, ReviewError, ReviewSession, Reveal, SessionStats};

#[cfg(feature = "native")]
pub use driver::{ReviewBackend, ReviewDriver, UndoOutcome};
