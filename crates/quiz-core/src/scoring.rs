//! Answer comparison and score reporting.

use std::collections::BTreeSet;
use std::fmt;

use crate::question::{AnswerKey, Question};

/// What the user has selected for one question.
///
/// "No answer" is represented by `None` at the call sites, never by an
/// empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAnswer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl RecordedAnswer {
    /// Whether `option` is part of this answer.
    pub fn contains(&self, option: usize) -> bool {
        match self {
            Self::Single(index) => *index == option,
            Self::Multiple(set) => set.contains(&option),
        }
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns true iff `recorded` matches the question's answer key.
///
/// Multi-answer keys are compared as sets; an absent or empty answer is
/// never correct.
pub fn is_correct(question: &Question, recorded: Option<&RecordedAnswer>) -> bool {
    match (question.answer_key(), recorded) {
        (AnswerKey::Single(key), Some(RecordedAnswer::Single(answer))) => key == answer,
        (AnswerKey::Multiple(key), Some(RecordedAnswer::Multiple(answer))) => {
            !answer.is_empty() && key == answer
        }
        _ => false,
    }
}

/// Positions whose answer is wrong or missing, in ascending order.
pub fn incorrect_positions(questions: &[Question], answers: &[Option<RecordedAnswer>]) -> Vec<usize> {
    questions
        .iter()
        .enumerate()
        .filter(|(position, question)| {
            !is_correct(question, answers.get(*position).and_then(Option::as_ref))
        })
        .map(|(position, _)| position)
        .collect()
}

/// Whole-number percentage, displayed as `60%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentage(usize);

impl Percentage {
    /// `part / total * 100`, rounded to the nearest integer (halves round up).
    ///
    /// `total` must be non-zero.
    pub fn of(part: usize, total: usize) -> Self {
        debug_assert!(total > 0, "percentage of an empty total");
        Self((part * 200 + total) / (2 * total))
    }

    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Share of correct answers. `total` must be non-zero.
pub fn success_rate(correct: usize, total: usize) -> Percentage {
    Percentage::of(correct, total)
}

/// Overall judgement shown with the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every question correct.
    Perfect,
    /// At least 80% correct.
    Excellent,
    /// At least 60% correct.
    Good,
    NeedsPractice,
}

impl Verdict {
    pub const fn for_score(correct: usize, total: usize) -> Self {
        if correct >= total {
            Self::Perfect
        } else if correct * 5 >= total * 4 {
            Self::Excellent
        } else if correct * 5 >= total * 3 {
            Self::Good
        } else {
            Self::NeedsPractice
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect score!",
            Self::Excellent => "Excellent result, almost perfect.",
            Self::Good => "Good result, with room to grow.",
            Self::NeedsPractice => "Keep working at it. Try practice mode.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(key: usize) -> Question {
        Question::new("s", "?", ["a", "b", "c", "d"], AnswerKey::Single(key), "").unwrap()
    }

    fn multi(key: &[usize]) -> Question {
        Question::new(
            "m",
            "?",
            ["a", "b", "c", "d"],
            AnswerKey::multiple(key.iter().copied()),
            "",
        )
        .unwrap()
    }

    fn selected(options: &[usize]) -> RecordedAnswer {
        RecordedAnswer::Multiple(options.iter().copied().collect())
    }

    #[test]
    fn single_answer_requires_exact_match() {
        let question = single(2);
        assert!(is_correct(&question, Some(&RecordedAnswer::Single(2))));
        assert!(!is_correct(&question, Some(&RecordedAnswer::Single(1))));
        assert!(!is_correct(&question, None));
    }

    #[test]
    fn multi_answer_ignores_order_and_duplicates() {
        let question = multi(&[0, 2]);
        assert!(is_correct(&question, Some(&selected(&[2, 0]))));
        assert!(is_correct(&question, Some(&selected(&[0, 2, 0, 2]))));
        assert!(!is_correct(&question, Some(&selected(&[0]))));
        assert!(!is_correct(&question, Some(&selected(&[0, 1, 2]))));
        assert!(!is_correct(&question, Some(&selected(&[]))));
        assert!(!is_correct(&question, None));
    }

    #[test]
    fn mismatched_shape_is_incorrect() {
        assert!(!is_correct(&single(0), Some(&selected(&[0]))));
        assert!(!is_correct(&multi(&[1]), Some(&RecordedAnswer::Single(1))));
    }

    #[test]
    fn incorrect_positions_lists_wrong_and_missing() {
        let questions: Vec<_> = (0..4).map(single).collect();
        let answers = vec![
            Some(RecordedAnswer::Single(0)),
            Some(RecordedAnswer::Single(0)),
            Some(RecordedAnswer::Single(2)),
            None,
        ];
        assert_eq!(incorrect_positions(&questions, &answers), vec![1, 3]);
    }

    #[test]
    fn success_rate_rounds_to_nearest() {
        assert_eq!(success_rate(3, 5).to_string(), "60%");
        assert_eq!(success_rate(1, 3).value(), 33);
        assert_eq!(success_rate(2, 3).value(), 67);
        assert_eq!(success_rate(1, 8).value(), 13);
        assert_eq!(success_rate(0, 4).value(), 0);
        assert_eq!(success_rate(7, 7).value(), 100);
    }

    #[test]
    fn percentage_of_rounds_half_up() {
        assert_eq!(Percentage::of(1, 2).value(), 50);
        assert_eq!(Percentage::of(1, 6).to_string(), "17%");
        assert_eq!(Percentage::of(5, 6).value(), 83);
        assert_eq!(Percentage::of(3, 3).value(), 100);
    }

    #[test]
    fn verdict_tiers() {
        assert_eq!(Verdict::for_score(10, 10), Verdict::Perfect);
        assert_eq!(Verdict::for_score(8, 10), Verdict::Excellent);
        assert_eq!(Verdict::for_score(6, 10), Verdict::Good);
        assert_eq!(Verdict::for_score(5, 10), Verdict::NeedsPractice);
        assert_eq!(Verdict::for_score(0, 3), Verdict::NeedsPractice);
    }

    #[test]
    fn recorded_answer_membership() {
        let answer = selected(&[1, 3]);
        assert!(answer.contains(3));
        assert!(!answer.contains(0));
        assert_eq!(answer.len(), 2);
        assert!(RecordedAnswer::Single(0).contains(0));
    }
}
