//! Question records and validated question sets.
//!
//! A [`QuestionSet`] is loaded once (usually from JSON) and shared for the
//! lifetime of the process. Every question in a set satisfies:
//! - at least two options
//! - every answer-key index is a valid option index
//! - a multi-answer key is non-empty
//! - ids are non-empty and unique within the set

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Validation errors for identifier types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Why a single question is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error(transparent)]
    InvalidId(#[from] ValidationError),

    #[error("question {id}: needs at least two options, got {count}")]
    TooFewOptions { id: String, count: usize },

    #[error("question {id}: answer index {index} out of range for {count} options")]
    KeyOutOfRange {
        id: String,
        index: usize,
        count: usize,
    },

    #[error("question {id}: multi-answer key is empty")]
    EmptyKey { id: String },

    #[error("question {id}: `multiple` is {multiple} but `correct` does not match")]
    KindMismatch { id: String, multiple: bool },
}

/// Errors raised while building or loading a question set.
#[derive(Debug, Error)]
pub enum QuestionSetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question set contains no questions")]
    Empty,
    #[error("duplicate question id: {id}")]
    DuplicateId { id: String },
    #[error("question at position {position} is invalid")]
    Invalid {
        position: usize,
        #[source]
        source: QuestionError,
    },
    #[error("expected a list of questions or an object with a `questions` list")]
    UnexpectedShape,
}

/// A validated question identifier.
///
/// Ids are opaque non-empty strings, unique within a loaded set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "question ID",
            });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QuestionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The correct response to a question.
///
/// The variant fixes the question's kind for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Exactly one option is correct.
    Single(usize),
    /// The correct response is this exact set of options.
    Multiple(BTreeSet<usize>),
}

impl AnswerKey {
    /// Builds a multi-answer key from any collection of indices.
    pub fn multiple(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::Multiple(indices.into_iter().collect())
    }

    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    fn max_index(&self) -> Option<usize> {
        match self {
            Self::Single(index) => Some(*index),
            Self::Multiple(set) => set.last().copied(),
        }
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    answer_key: AnswerKey,
    explanation: String,
    original_index: Option<usize>,
}

impl Question {
    /// Creates a question, checking options and answer key.
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        answer_key: AnswerKey,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let id = QuestionId::new(id)?;
        let options: Vec<String> = options.into_iter().map(Into::into).collect();

        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id: id.to_string(),
                count: options.len(),
            });
        }
        let Some(max_index) = answer_key.max_index() else {
            return Err(QuestionError::EmptyKey { id: id.to_string() });
        };
        if max_index >= options.len() {
            return Err(QuestionError::KeyOutOfRange {
                id: id.to_string(),
                index: max_index,
                count: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            answer_key,
            explanation: explanation.into(),
            original_index: None,
        })
    }

    pub const fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub const fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    /// Whether more than one option may be selected.
    pub const fn is_multiple(&self) -> bool {
        self.answer_key.is_multiple()
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Position of this question in the full set, for practice copies only.
    pub const fn original_index(&self) -> Option<usize> {
        self.original_index
    }

    /// Copies this question into a practice subset.
    ///
    /// A question that is already a practice copy keeps its existing
    /// back-reference, so the index always points into the full set.
    pub(crate) fn practice_copy(&self, position: usize) -> Self {
        Self {
            original_index: Some(self.original_index.unwrap_or(position)),
            ..self.clone()
        }
    }
}

/// Answer field in the input format: one index or a list of indices.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorrectField {
    One(usize),
    Many(Vec<usize>),
}

/// Question as it appears in a question file.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: String,
    question: String,
    options: Vec<String>,
    correct: CorrectField,
    #[serde(default)]
    multiple: Option<bool>,
    #[serde(default)]
    explanation: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let answer_key = match (record.correct, record.multiple) {
            (CorrectField::One(index), None | Some(false)) => AnswerKey::Single(index),
            (CorrectField::Many(indices), None | Some(true)) => AnswerKey::multiple(indices),
            (_, Some(multiple)) => {
                return Err(QuestionError::KindMismatch {
                    id: record.id,
                    multiple,
                });
            }
        };
        Self::new(
            record.id,
            record.question,
            record.options,
            answer_key,
            record.explanation,
        )
    }
}

/// Titled question file: `{ "title": ..., "questions": [...] }`.
#[derive(Debug, Deserialize)]
struct TitledFile {
    #[serde(default)]
    title: Option<String>,
    questions: Vec<QuestionRecord>,
}

/// A validated, non-empty, immutable sequence of questions.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    title: Option<String>,
    questions: Arc<[Question]>,
}

impl QuestionSet {
    /// Builds a set, rejecting empty sets and duplicate ids.
    pub fn new(title: Option<String>, questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId {
                    id: question.id().to_string(),
                });
            }
        }

        Ok(Self {
            title,
            questions: questions.into(),
        })
    }

    /// Parses a question file.
    ///
    /// Accepts either a bare JSON array of questions or an object with an
    /// optional `title` and a `questions` array.
    pub fn from_json_str(json: &str) -> Result<Self, QuestionSetError> {
        let value: Value = serde_json::from_str(json)?;
        let (title, records) = match value {
            Value::Array(_) => (None, serde_json::from_value::<Vec<QuestionRecord>>(value)?),
            Value::Object(_) => {
                let file: TitledFile = serde_json::from_value(value)?;
                (file.title, file.questions)
            }
            _ => return Err(QuestionSetError::UnexpectedShape),
        };

        let questions = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                Question::try_from(record)
                    .map_err(|source| QuestionSetError::Invalid { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(title, questions)
    }

    /// Reads and parses a question file from disk.
    pub fn load(path: &Path) -> Result<Self, QuestionSetError> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), count = set.len(), "loaded question set");
        Ok(set)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Shared handle to the questions, cheap to clone.
    pub fn shared(&self) -> Arc<[Question]> {
        Arc::clone(&self.questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "Shapes",
        "questions": [
            {
                "id": "q1",
                "question": "How many sides does a triangle have?",
                "options": ["2", "3", "4"],
                "correct": 1,
                "explanation": "Tri means three."
            },
            {
                "id": "q2",
                "question": "Which are quadrilaterals?",
                "options": ["square", "circle", "rhombus"],
                "correct": [2, 0],
                "multiple": true,
                "explanation": "Four sides each."
            }
        ]
    }"#;

    #[test]
    fn parses_titled_file() {
        let set = QuestionSet::from_json_str(SAMPLE).unwrap();
        assert_eq!(set.title(), Some("Shapes"));
        assert_eq!(set.len(), 2);

        let q2 = &set.questions()[1];
        assert!(q2.is_multiple());
        assert_eq!(q2.answer_key(), &AnswerKey::multiple([0, 2]));
        assert_eq!(q2.original_index(), None);
    }

    #[test]
    fn parses_bare_array_and_infers_kind() {
        let json = r#"[
            {"id": "a", "question": "?", "options": ["x", "y"], "correct": [0, 1]},
            {"id": "b", "question": "?", "options": ["x", "y"], "correct": 1}
        ]"#;
        let set = QuestionSet::from_json_str(json).unwrap();
        assert_eq!(set.title(), None);
        assert!(set.questions()[0].is_multiple());
        assert_eq!(set.questions()[1].answer_key(), &AnswerKey::Single(1));
        assert_eq!(set.questions()[1].explanation(), "");
    }

    #[test]
    fn rejects_key_out_of_range() {
        let json = r#"[{"id": "a", "question": "?", "options": ["x", "y"], "correct": 2}]"#;
        let err = QuestionSet::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            QuestionSetError::Invalid {
                position: 0,
                source: QuestionError::KeyOutOfRange { index: 2, count: 2, .. }
            }
        ));
    }

    #[test]
    fn rejects_kind_mismatch() {
        let json = r#"[{"id": "a", "question": "?", "options": ["x", "y"], "correct": 1, "multiple": true}]"#;
        let err = QuestionSet::from_json_str(json).unwrap_err();
        assert_eq!(err.to_string(), "question at position 0 is invalid");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(
            source.to_string(),
            "question a: `multiple` is true but `correct` does not match"
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[
            {"id": "a", "question": "?", "options": ["x", "y"], "correct": 0},
            {"id": "a", "question": "?", "options": ["x", "y"], "correct": 1}
        ]"#;
        let err = QuestionSet::from_json_str(json).unwrap_err();
        assert!(matches!(err, QuestionSetError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn rejects_empty_set_and_bad_shape() {
        assert!(matches!(
            QuestionSet::from_json_str("[]").unwrap_err(),
            QuestionSetError::Empty
        ));
        assert!(matches!(
            QuestionSet::from_json_str("42").unwrap_err(),
            QuestionSetError::UnexpectedShape
        ));
    }

    #[test]
    fn question_new_validates() {
        let err = Question::new("q", "?", ["only"], AnswerKey::Single(0), "").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { id: "q".into(), count: 1 });

        let err = Question::new("q", "?", ["a", "b"], AnswerKey::multiple([]), "").unwrap_err();
        assert_eq!(err, QuestionError::EmptyKey { id: "q".into() });

        let err = Question::new("  ", "?", ["a", "b"], AnswerKey::Single(0), "").unwrap_err();
        assert_eq!(err.to_string(), "question ID cannot be empty");
    }

    #[test]
    fn practice_copy_keeps_first_back_reference() {
        let question = Question::new("q", "?", ["a", "b"], AnswerKey::Single(0), "").unwrap();
        let first = question.practice_copy(4);
        assert_eq!(first.original_index(), Some(4));

        let second = first.practice_copy(0);
        assert_eq!(second.original_index(), Some(4));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let set = QuestionSet::load(&path).unwrap();
        assert_eq!(set.questions()[0].id().as_str(), "q1");

        let missing = QuestionSet::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, QuestionSetError::Io(_)));
    }
}
