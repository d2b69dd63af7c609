//! Session state machine.
//!
//! A [`SessionState`] is one run through a question list. It starts
//! `InProgress`, records answers per position and ends `Completed`, at
//! which point the incorrect positions are fixed. A completed state is
//! never reopened: restarting or entering practice mode builds a new one.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::question::{Question, QuestionSet};
use crate::scoring::{self, Percentage, RecordedAnswer};

/// Lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    InProgress,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// A command was issued that the session cannot accept in its current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is {actual}, command needs it {expected}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("option {option} out of range for {count} options")]
    OptionOutOfRange { option: usize, count: usize },
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("question {} needs an answer before moving on", .position + 1)]
    AnswerRequired { position: usize },
    #[error("no incorrect questions to practice")]
    NothingToPractice,
}

/// Outcome of [`SessionState::go_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given position.
    Moved { to: usize },
    /// The last question was passed and the session is now completed.
    Completed,
}

/// 1-based position within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(self) -> Percentage {
        Percentage::of(self.position, self.total)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question {} of {}", self.position, self.total)
    }
}

/// Short description of what is recorded for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Unanswered,
    /// Single-answer question, 0-based option.
    Answered(usize),
    /// Multi-answer question, number of options selected.
    Selected(usize),
}

impl fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unanswered => write!(f, "No answer selected"),
            Self::Answered(option) => write!(f, "Answer: {}", option + 1),
            Self::Selected(count) => write!(f, "Selected: {count} option(s)"),
        }
    }
}

/// One run through a list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    questions: Arc<[Question]>,
    current_index: usize,
    answers: Vec<Option<RecordedAnswer>>,
    phase: Phase,
    is_practice_run: bool,
    incorrect_positions: Vec<usize>,
}

impl SessionState {
    /// Fresh ordinary session over a full question set.
    pub fn new(set: &QuestionSet) -> Self {
        Self::fresh(set.shared(), false)
    }

    fn fresh(questions: Arc<[Question]>, is_practice_run: bool) -> Self {
        debug_assert!(!questions.is_empty(), "session needs at least one question");
        Self {
            answers: vec![None; questions.len()],
            questions,
            current_index: 0,
            phase: Phase::InProgress,
            is_practice_run,
            incorrect_positions: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn answers(&self) -> &[Option<RecordedAnswer>] {
        &self.answers
    }

    /// Answer recorded at `position`, if any.
    pub fn answer(&self, position: usize) -> Option<&RecordedAnswer> {
        self.answers.get(position).and_then(Option::as_ref)
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_practice_run(&self) -> bool {
        self.is_practice_run
    }

    /// Wrong or unanswered positions, ascending. Empty until completed.
    pub fn incorrect_positions(&self) -> &[usize] {
        &self.incorrect_positions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.current_index + 1,
            total: self.questions.len(),
        }
    }

    pub fn answer_status(&self) -> AnswerStatus {
        match self.answer(self.current_index) {
            None => AnswerStatus::Unanswered,
            Some(RecordedAnswer::Single(option)) => AnswerStatus::Answered(*option),
            Some(RecordedAnswer::Multiple(set)) => AnswerStatus::Selected(set.len()),
        }
    }

    /// Whether `option` is selected on the current question.
    pub fn is_selected(&self, option: usize) -> bool {
        self.answer(self.current_index)
            .is_some_and(|answer| answer.contains(option))
    }

    /// Whether the current question may be left.
    ///
    /// Practice runs may always move on; ordinary runs need a recorded answer.
    pub fn can_advance(&self) -> bool {
        self.is_practice_run || self.answer(self.current_index).is_some()
    }

    /// Records a selection on the current question.
    ///
    /// Single-answer questions are overwritten; multi-answer questions toggle
    /// the option in their set.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.require_phase(Phase::InProgress)?;

        let question = &self.questions[self.current_index];
        let count = question.options().len();
        if option >= count {
            return Err(SessionError::OptionOutOfRange { option, count });
        }

        let slot = &mut self.answers[self.current_index];
        if question.is_multiple() {
            let mut selected = match slot.take() {
                Some(RecordedAnswer::Multiple(set)) => set,
                _ => BTreeSet::new(),
            };
            if !selected.remove(&option) {
                selected.insert(option);
            }
            *slot = (!selected.is_empty()).then_some(RecordedAnswer::Multiple(selected));
        } else {
            *slot = Some(RecordedAnswer::Single(option));
        }

        tracing::debug!(position = self.current_index, option, "option selected");
        Ok(())
    }

    /// Moves to the next question, or completes the session from the last one.
    pub fn go_next(&mut self) -> Result<Advance, SessionError> {
        self.require_phase(Phase::InProgress)?;
        if !self.can_advance() {
            return Err(SessionError::AnswerRequired {
                position: self.current_index,
            });
        }

        if self.is_last() {
            self.complete()?;
            return Ok(Advance::Completed);
        }

        self.current_index += 1;
        tracing::debug!(position = self.current_index, "moved to next question");
        Ok(Advance::Moved {
            to: self.current_index,
        })
    }

    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        self.require_phase(Phase::InProgress)?;
        if self.current_index == 0 {
            return Err(SessionError::AtFirstQuestion);
        }

        self.current_index -= 1;
        tracing::debug!(position = self.current_index, "moved to previous question");
        Ok(())
    }

    /// Scores every position and ends the session.
    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.require_phase(Phase::InProgress)?;

        self.incorrect_positions = scoring::incorrect_positions(&self.questions, &self.answers);
        self.phase = Phase::Completed;

        tracing::debug!(
            total = self.questions.len(),
            incorrect = self.incorrect_positions.len(),
            "session completed"
        );
        Ok(())
    }

    /// Builds a practice session from the questions missed in this one.
    ///
    /// Each copy carries its position in the full question set.
    pub fn practice_session(&self) -> Result<Self, SessionError> {
        self.require_phase(Phase::Completed)?;
        if self.incorrect_positions.is_empty() {
            return Err(SessionError::NothingToPractice);
        }

        let questions: Arc<[Question]> = self
            .incorrect_positions
            .iter()
            .map(|&position| self.questions[position].practice_copy(position))
            .collect();
        Ok(Self::fresh(questions, true))
    }

    fn require_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
