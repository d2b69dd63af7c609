//! Plain-text rendering of question and results screens.

use std::io::{self, Write};

use quiz_core::{ClockState, ResultsSummary, SessionState, format_elapsed};

/// Options a screen needs beyond the quiz state.
#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions<'a> {
    pub title: &'a str,
    pub show_timer: bool,
    pub show_explanations: bool,
}

/// Renders the current question.
pub fn question_screen<W: Write>(
    out: &mut W,
    options: ScreenOptions<'_>,
    state: &SessionState,
    clock: ClockState,
) -> io::Result<()> {
    let question = state.current_question();
    let progress = state.progress();

    if state.is_practice_run() {
        writeln!(out, "== {} (practice) ==", options.title)?;
    } else {
        writeln!(out, "== {} ==", options.title)?;
    }

    write!(out, "{progress} ({}) | id: {}", progress.percent(), question.id())?;
    if options.show_timer {
        write!(out, " | {}", format_elapsed(clock.elapsed_seconds))?;
    }
    writeln!(out)?;

    if let Some(original) = question.original_index() {
        writeln!(out, "Original question {}", original + 1)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", question.prompt())?;
    if question.is_multiple() {
        writeln!(out, "(select one or more options)")?;
    }

    for (index, label) in question.options().iter().enumerate() {
        let marker = match (question.is_multiple(), state.is_selected(index)) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(*)",
            (false, false) => "( )",
        };
        writeln!(out, "  {marker} {}. {label}", index + 1)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", state.answer_status())?;
    let next = if state.is_last() { "finish" } else { "next" };
    let gate = if state.can_advance() { "" } else { " (answer first)" };
    writeln!(
        out,
        "[1-{}] select  [n] {next}{gate}  [p] back  [q] quit",
        question.options().len()
    )
}

/// Renders the results of a completed session.
pub fn results_screen<W: Write>(
    out: &mut W,
    options: ScreenOptions<'_>,
    summary: &ResultsSummary,
) -> io::Result<()> {
    if summary.is_practice_run {
        writeln!(out, "== {} practice results ==", options.title)?;
    } else {
        writeln!(out, "== {} results ==", options.title)?;
    }

    writeln!(
        out,
        "Score: {}/{} ({})",
        summary.correct, summary.total, summary.success_rate
    )?;
    writeln!(out, "{}", summary.verdict)?;
    writeln!(
        out,
        "Correct: {} | Incorrect: {} | Time: {}",
        summary.correct,
        summary.incorrect,
        format_elapsed(summary.elapsed_seconds)
    )?;

    if !summary.missed.is_empty() {
        writeln!(out)?;
        writeln!(out, "Missed questions:")?;
        for missed in &summary.missed {
            let number = missed.original_index.unwrap_or(missed.position) + 1;
            let unanswered = if missed.answered { "" } else { " (unanswered)" };
            writeln!(out, "  {number}. [{}] {}{unanswered}", missed.id, missed.prompt)?;
            if options.show_explanations && !missed.explanation.is_empty() {
                writeln!(out, "     {}", missed.explanation)?;
            }
        }
    }

    writeln!(out)?;
    if summary.can_practice() {
        writeln!(out, "[r] restart  [t] practice mistakes  [q] quit")
    } else {
        writeln!(out, "[r] restart  [q] quit")
    }
}
