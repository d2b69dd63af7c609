//! Translation of typed lines into quiz commands.

/// Commands accepted while a question is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCommand {
    /// Select (or toggle) the 0-based option.
    Select(usize),
    Next,
    Previous,
    Finish,
    Quit,
}

/// Commands accepted on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsCommand {
    Restart,
    Practice,
    Quit,
}

/// Parses a line typed on a question screen.
///
/// Options are numbered from 1. An empty line means "next", like Enter.
pub fn parse_question_input(line: &str) -> Option<QuestionCommand> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "" | "n" | "next" | ">" => Some(QuestionCommand::Next),
        "p" | "prev" | "back" | "<" => Some(QuestionCommand::Previous),
        "f" | "finish" => Some(QuestionCommand::Finish),
        "q" | "quit" => Some(QuestionCommand::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(QuestionCommand::Select),
    }
}

/// Parses a line typed on the results screen.
pub fn parse_results_input(line: &str) -> Option<ResultsCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "restart" => Some(ResultsCommand::Restart),
        "t" | "practice" => Some(ResultsCommand::Practice),
        "q" | "quit" => Some(ResultsCommand::Quit),
        _ => None,
    }
}
