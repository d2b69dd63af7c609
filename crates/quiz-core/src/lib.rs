//! Core logic for the multiple-choice quiz runner.
//!
//! This crate contains:
//! - Questions: validated question records and sets loaded from JSON
//! - Scoring: answer comparison, success rate and verdicts
//! - Sessions: the state machine for one run through a question list
//! - Quiz: the owned handle pairing a session with its elapsed-time clock

pub mod clock;
pub mod question;
mod quiz;
pub mod scoring;
pub mod session;

pub use clock::{Clock, ClockState, format_elapsed};
pub use question::{AnswerKey, Question, QuestionError, QuestionId, QuestionSet, QuestionSetError};
pub use quiz::{MissedQuestion, Quiz, QuizSnapshot, ResultsSummary};
pub use scoring::{Percentage, RecordedAnswer, Verdict, is_correct, success_rate};
pub use session::{Advance, AnswerStatus, Phase, Progress, SessionError, SessionState};
