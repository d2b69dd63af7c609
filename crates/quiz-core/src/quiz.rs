//! The owned quiz handle.
//!
//! [`Quiz`] pairs the current [`SessionState`] with its [`Clock`] and the
//! full question set. Restart and practice transitions replace both the
//! state and the clock wholesale.

use crate::clock::{Clock, ClockState};
use crate::question::{QuestionId, QuestionSet};
use crate::scoring::{self, Percentage, Verdict};
use crate::session::{Advance, Phase, SessionError, SessionState};

/// Immutable view of a quiz, taken after each command for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub state: SessionState,
    pub clock: ClockState,
}

/// A question that was answered wrongly or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedQuestion {
    /// Position within the finished session.
    pub position: usize,
    /// Position within the full set, for practice runs.
    pub original_index: Option<usize>,
    pub id: QuestionId,
    pub prompt: String,
    pub explanation: String,
    pub answered: bool,
}

/// Results of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub success_rate: Percentage,
    pub verdict: Verdict,
    pub elapsed_seconds: u64,
    pub is_practice_run: bool,
    pub missed: Vec<MissedQuestion>,
}

impl ResultsSummary {
    fn from_state(state: &SessionState, elapsed_seconds: u64) -> Self {
        let total = state.len();
        let incorrect = state.incorrect_positions().len();
        let correct = total - incorrect;

        let missed = state
            .incorrect_positions()
            .iter()
            .map(|&position| {
                let question = &state.questions()[position];
                MissedQuestion {
                    position,
                    original_index: question.original_index(),
                    id: question.id().clone(),
                    prompt: question.prompt().to_string(),
                    explanation: question.explanation().to_string(),
                    answered: state.answer(position).is_some(),
                }
            })
            .collect();

        Self {
            total,
            correct,
            incorrect,
            success_rate: scoring::success_rate(correct, total),
            verdict: Verdict::for_score(correct, total),
            elapsed_seconds,
            is_practice_run: state.is_practice_run(),
            missed,
        }
    }

    /// Whether practice mode can be entered from these results.
    pub const fn can_practice(&self) -> bool {
        self.incorrect > 0
    }
}

/// A running quiz over one question set.
#[derive(Debug)]
pub struct Quiz {
    questions: QuestionSet,
    state: SessionState,
    clock: Clock,
}

impl Quiz {
    /// Starts an ordinary session over the full set.
    ///
    /// Must be called from within a Tokio runtime, as it starts the clock.
    pub fn new(questions: QuestionSet) -> Self {
        let state = SessionState::new(&questions);
        let mut quiz = Self {
            questions,
            state,
            clock: Clock::new(),
        };
        quiz.clock.start();
        quiz.log_started();
        quiz
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            state: self.state.clone(),
            clock: self.clock.state(),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.state.can_advance()
    }

    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.state.select_option(option)
    }

    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        self.state.go_previous()
    }

    pub fn go_next(&mut self) -> Result<Advance, SessionError> {
        let advance = self.state.go_next()?;
        if advance == Advance::Completed {
            self.finish();
        }
        Ok(advance)
    }

    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.state.complete()?;
        self.finish();
        Ok(())
    }

    /// Throws the current session away and starts over on the full set.
    ///
    /// Allowed from any phase, including practice runs.
    pub fn restart(&mut self) {
        self.replace(SessionState::new(&self.questions));
    }

    /// Starts a practice session over the questions missed in this one.
    pub fn enter_practice_mode(&mut self) -> Result<(), SessionError> {
        let practice = self.state.practice_session()?;
        self.replace(practice);
        Ok(())
    }

    /// Results of the completed session.
    pub fn summary(&self) -> Result<ResultsSummary, SessionError> {
        if self.state.phase() != Phase::Completed {
            return Err(SessionError::WrongPhase {
                expected: Phase::Completed,
                actual: self.state.phase(),
            });
        }
        Ok(ResultsSummary::from_state(&self.state, self.clock.elapsed_seconds()))
    }

    fn finish(&mut self) {
        self.clock.stop();
        tracing::info!(
            total = self.state.len(),
            incorrect = self.state.incorrect_positions().len(),
            elapsed = self.clock.elapsed_seconds(),
            practice = self.state.is_practice_run(),
            "quiz completed"
        );
    }

    fn replace(&mut self, state: SessionState) {
        self.clock.stop();
        self.state = state;
        self.clock = Clock::new();
        self.clock.start();
        self.log_started();
    }

    fn log_started(&self) {
        tracing::info!(
            questions = self.state.len(),
            practice = self.state.is_practice_run(),
            "quiz started"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::time::sleep;

    use crate::session::tests::{five_single, multi, single};

    #[tokio::test(start_paused = true)]
    async fn completing_stops_the_clock() {
        let mut quiz = Quiz::new(five_single());
        sleep(Duration::from_millis(2500)).await;

        quiz.complete().unwrap();
        sleep(Duration::from_secs(3)).await;

        let snapshot = quiz.snapshot();
        assert_eq!(snapshot.state.phase(), Phase::Completed);
        assert_eq!(
            snapshot.clock,
            ClockState {
                elapsed_seconds: 2,
                is_running: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn final_next_stops_the_clock() {
        let set = QuestionSet::new(None, vec![single("a", 0)]).unwrap();
        let mut quiz = Quiz::new(set);
        quiz.select_option(0).unwrap();
        sleep(Duration::from_millis(1500)).await;

        assert_eq!(quiz.go_next().unwrap(), Advance::Completed);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(quiz.elapsed_seconds(), 1);
        assert!(!quiz.snapshot().clock.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn summary_reports_score_and_misses() {
        let mut quiz = Quiz::new(five_single());
        for option in [0, 1, 9, 3] {
            quiz.select_option(option).unwrap();
            quiz.go_next().unwrap();
        }
        sleep(Duration::from_millis(1200)).await;
        quiz.complete().unwrap();

        let summary = quiz.summary().unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.success_rate.to_string(), "60%");
        assert_eq!(summary.verdict, Verdict::Good);
        assert_eq!(summary.elapsed_seconds, 1);
        assert!(!summary.is_practice_run);
        assert!(summary.can_practice());

        let missed: Vec<_> = summary
            .missed
            .iter()
            .map(|m| (m.position, m.id.as_str(), m.answered))
            .collect();
        assert_eq!(missed, vec![(2, "q2", true), (4, "q4", false)]);
    }

    #[tokio::test(start_paused = true)]
    async fn summary_requires_completion() {
        let quiz = Quiz::new(five_single());
        assert!(matches!(
            quiz.summary().unwrap_err(),
            SessionError::WrongPhase {
                expected: Phase::Completed,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn practice_mode_gets_a_fresh_clock() {
        let mut quiz = Quiz::new(five_single());
        sleep(Duration::from_millis(4200)).await;
        quiz.complete().unwrap();
        assert_eq!(quiz.elapsed_seconds(), 4);

        quiz.enter_practice_mode().unwrap();
        let snapshot = quiz.snapshot();
        assert!(snapshot.state.is_practice_run());
        assert_eq!(snapshot.state.len(), 5);
        assert_eq!(
            snapshot.clock,
            ClockState {
                elapsed_seconds: 0,
                is_running: true
            }
        );

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(quiz.elapsed_seconds(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_from_any_phase_returns_to_full_set() {
        let set = five_single();
        let fresh = SessionState::new(&set);
        let mut quiz = Quiz::new(set);

        // In progress, with answers recorded.
        quiz.select_option(0).unwrap();
        quiz.go_next().unwrap();
        quiz.restart();
        assert_eq!(quiz.state(), &fresh);

        // Completed.
        quiz.complete().unwrap();
        quiz.restart();
        assert_eq!(quiz.state(), &fresh);

        // Practice run.
        quiz.complete().unwrap();
        quiz.enter_practice_mode().unwrap();
        assert!(quiz.state().is_practice_run());
        quiz.restart();
        assert_eq!(quiz.state(), &fresh);
        assert!(quiz.snapshot().clock.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn practice_mode_rejected_without_misses() {
        let set = QuestionSet::new(None, vec![multi("m", &[1, 2])]).unwrap();
        let mut quiz = Quiz::new(set);
        quiz.select_option(2).unwrap();
        quiz.select_option(1).unwrap();
        quiz.go_next().unwrap();

        let summary = quiz.summary().unwrap();
        assert_eq!(summary.verdict, Verdict::Perfect);
        assert!(!summary.can_practice());

        let before = quiz.snapshot();
        assert_eq!(
            quiz.enter_practice_mode().unwrap_err(),
            SessionError::NothingToPractice
        );
        assert_eq!(quiz.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn practice_summary_carries_original_positions() {
        let mut quiz = Quiz::new(five_single());
        quiz.complete().unwrap();
        quiz.enter_practice_mode().unwrap();
        quiz.go_next().unwrap();
        quiz.select_option(1).unwrap();
        quiz.complete().unwrap();

        let summary = quiz.summary().unwrap();
        assert!(summary.is_practice_run);
        let back_refs: Vec<_> = summary.missed.iter().map(|m| m.original_index).collect();
        assert_eq!(back_refs, vec![Some(0), Some(2), Some(3), Some(4)]);
    }
}
