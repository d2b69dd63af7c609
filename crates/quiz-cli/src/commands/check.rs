//! Check command for validating a question file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use quiz_core::QuestionSet;

pub fn run<W: Write>(writer: &mut W, path: &Path) -> Result<()> {
    let set = QuestionSet::load(path)
        .with_context(|| format!("invalid question file {}", path.display()))?;

    let multiple = set.questions().iter().filter(|q| q.is_multiple()).count();
    writeln!(writer, "{}", set.title().unwrap_or("Untitled question set"))?;
    writeln!(
        writer,
        "{} questions ({} single-answer, {multiple} multi-answer)",
        set.len(),
        set.len() - multiple
    )?;

    for (position, question) in set.questions().iter().enumerate() {
        let kind = if question.is_multiple() { "multi" } else { "single" };
        writeln!(
            writer,
            "{:>3}. {} [{kind}, {} options] {}",
            position + 1,
            question.id(),
            question.options().len(),
            question.prompt()
        )?;
    }

    Ok(())
}
