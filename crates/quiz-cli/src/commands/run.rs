//! Interactive quiz loop.
//!
//! Each input line becomes one command on the [`Quiz`]; after every command
//! the loop takes a fresh snapshot and redraws. Rejected commands print a
//! notice and never end the run.

use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use quiz_core::{Phase, Quiz, QuestionSet, SessionError};

use crate::Config;
use crate::input::{self, QuestionCommand, ResultsCommand};
use crate::render::{self, ScreenOptions};

/// Question set used when no file is configured.
const SAMPLE_QUESTIONS: &str = include_str!("../../data/geometry.json");

/// Title used when the question file has none.
const DEFAULT_TITLE: &str = "Quiz";

/// Loads the question set from `path`, or the built-in sample.
pub fn load_question_set(path: Option<&Path>) -> Result<QuestionSet> {
    match path {
        Some(path) => QuestionSet::load(path)
            .with_context(|| format!("failed to load questions from {}", path.display())),
        None => QuestionSet::from_json_str(SAMPLE_QUESTIONS)
            .context("built-in question set is invalid"),
    }
}

/// Why an input line was not applied.
#[derive(Debug)]
enum Notice {
    Unrecognized(String),
    NotLastQuestion,
    AnswerRequired,
    Rejected(SessionError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(line) => write!(f, "unrecognized input: {line:?}"),
            Self::NotLastQuestion => write!(f, "finish is only available on the last question"),
            Self::AnswerRequired => write!(f, "answer this question before moving on"),
            Self::Rejected(SessionError::NothingToPractice) => {
                write!(f, "no mistakes to practice, congratulations!")
            }
            Self::Rejected(err) => write!(f, "{err}"),
        }
    }
}

impl From<SessionError> for Notice {
    fn from(err: SessionError) -> Self {
        Self::Rejected(err)
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Runs the quiz until the user quits or input ends.
pub async fn run<R, W>(input: R, out: &mut W, questions: QuestionSet, config: &Config) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let title = questions.title().unwrap_or(DEFAULT_TITLE).to_string();
    let options = ScreenOptions {
        title: &title,
        show_timer: config.show_timer,
        show_explanations: config.show_explanations,
    };

    let mut quiz = Quiz::new(questions);
    let mut lines = input.lines();

    loop {
        let snapshot = quiz.snapshot();
        match snapshot.state.phase() {
            Phase::InProgress => {
                render::question_screen(out, options, &snapshot.state, snapshot.clock)?;
            }
            Phase::Completed => render::results_screen(out, options, &quiz.summary()?)?,
        }
        out.flush()?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            tracing::debug!("input closed");
            break;
        };

        let outcome = match snapshot.state.phase() {
            Phase::InProgress => handle_question_input(&mut quiz, &line),
            Phase::Completed => handle_results_input(&mut quiz, &line),
        };
        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(notice) => {
                tracing::debug!(%notice, "input rejected");
                writeln!(out, "! {notice}")?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

fn handle_question_input(quiz: &mut Quiz, line: &str) -> Result<Flow, Notice> {
    let command =
        input::parse_question_input(line).ok_or_else(|| Notice::Unrecognized(line.to_string()))?;

    match command {
        QuestionCommand::Select(option) => quiz.select_option(option)?,
        QuestionCommand::Next => {
            if !quiz.can_advance() {
                return Err(Notice::AnswerRequired);
            }
            quiz.go_next()?;
        }
        QuestionCommand::Previous => quiz.go_previous()?,
        QuestionCommand::Finish => {
            if !quiz.state().is_last() {
                return Err(Notice::NotLastQuestion);
            }
            if !quiz.can_advance() {
                return Err(Notice::AnswerRequired);
            }
            quiz.go_next()?;
        }
        QuestionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn handle_results_input(quiz: &mut Quiz, line: &str) -> Result<Flow, Notice> {
    let command =
        input::parse_results_input(line).ok_or_else(|| Notice::Unrecognized(line.to_string()))?;

    match command {
        ResultsCommand::Restart => quiz.restart(),
        ResultsCommand::Practice => quiz.enter_practice_mode()?,
        ResultsCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
