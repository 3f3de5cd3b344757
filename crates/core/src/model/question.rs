use serde::{Deserialize, Serialize};

/// Stem used when a question document carries no usable text.
pub const UNTITLED_QUESTION: &str = "Untitled question";

/// One selectable answer. Its position in [`Question::choices`] is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    label: String,
}

impl Choice {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Canonical multiple-choice question.
///
/// Built once from a raw document and immutable afterwards. A `correct_index`
/// of `None` means the source did not say which choice is right; such a
/// question can be answered but never scored correct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    stem: String,
    choices: Vec<Choice>,
    correct_index: Option<usize>,
    explanation: String,
    display_number: String,
}

impl Question {
    /// Build a question. An out-of-range `correct_index` is treated as unresolved.
    #[must_use]
    pub fn new(
        stem: impl Into<String>,
        choices: Vec<Choice>,
        correct_index: Option<usize>,
        explanation: impl Into<String>,
        display_number: impl Into<String>,
    ) -> Self {
        let correct_index = correct_index.filter(|idx| *idx < choices.len());
        Self {
            stem: stem.into(),
            choices,
            correct_index,
            explanation: explanation.into(),
            display_number: display_number.into(),
        }
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn display_number(&self) -> &str {
        &self.display_number
    }

    /// Whether picking `choice` would score a point.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_index == Some(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_correct_index_is_unresolved() {
        let q = Question::new(
            "Capital?",
            vec![Choice::new("Paris"), Choice::new("Lyon")],
            Some(2),
            "",
            "",
        );
        assert_eq!(q.correct_index(), None);
        assert!(!q.is_correct(2));
    }

    #[test]
    fn is_correct_matches_only_resolved_index() {
        let q = Question::new(
            "Capital?",
            vec![Choice::new("Paris"), Choice::new("Lyon")],
            Some(0),
            "Paris is the capital.",
            "7",
        );
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
        assert_eq!(q.display_number(), "7");
    }
}
