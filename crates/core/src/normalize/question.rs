use serde_json::Value;

use crate::model::{Choice, Question, UNTITLED_QUESTION};

use super::rules::{Rule, array_field, field_rule, first_match, index_field, text_field};

pub const STEM_RULES: &[Rule<String>] = &[
    field_rule!(text_field, "main_question"),
    field_rule!(text_field, "question"),
    field_rule!(text_field, "title"),
    field_rule!(text_field, "text"),
    field_rule!(text_field, "prompt"),
];

pub const CHOICE_RULES: &[Rule<Vec<Value>>] = &[
    field_rule!(array_field, "possible_answers"),
    field_rule!(array_field, "options"),
    field_rule!(array_field, "choices"),
    field_rule!(array_field, "answers"),
    field_rule!(array_field, "alternatives"),
];

pub const EXPLANATION_RULES: &[Rule<String>] = &[
    field_rule!(text_field, "explanatory_sentence"),
    field_rule!(text_field, "explanation"),
    field_rule!(text_field, "explanatory"),
    field_rule!(text_field, "note"),
];

pub const DISPLAY_NUMBER_RULES: &[Rule<String>] = &[
    field_rule!(text_field, "question_number"),
    field_rule!(text_field, "number"),
    field_rule!(text_field, "id"),
];

/// Raw choice elements and their derived labels, as seen by correct-answer rules.
#[derive(Debug)]
pub struct ChoiceSet<'a> {
    pub raw: &'a [Value],
    pub labels: &'a [String],
}

/// A named step that tries to locate the correct choice.
#[derive(Clone, Copy)]
pub struct CorrectRule {
    pub name: &'static str,
    pub resolve: fn(&Value, &ChoiceSet<'_>) -> Option<usize>,
}

pub const CORRECT_RULES: &[CorrectRule] = &[
    CorrectRule {
        name: "correct_index",
        resolve: |doc, set| explicit_index(doc, "correct_index", set),
    },
    CorrectRule {
        name: "correctIdx",
        resolve: |doc, set| explicit_index(doc, "correctIdx", set),
    },
    CorrectRule {
        name: "correct",
        resolve: |doc, set| explicit_index(doc, "correct", set),
    },
    CorrectRule {
        name: "correct_answer letter",
        resolve: |doc, set| letter_index(doc.get("correct_answer")?.as_str()?, set.labels.len()),
    },
    CorrectRule {
        name: "correct_answer text",
        resolve: |doc, set| match_label(doc.get("correct_answer")?.as_str()?, set.labels),
    },
    CorrectRule {
        name: "answer text",
        resolve: |doc, set| match_label(doc.get("answer")?.as_str()?, set.labels),
    },
    CorrectRule {
        name: "choice flag",
        resolve: |_, set| set.raw.iter().position(is_flagged_correct),
    },
];

/// Normalize a raw question document into a canonical [`Question`].
///
/// Absent or wrong-typed fields degrade to defaults; this never fails and is
/// deterministic for a given input.
#[must_use]
pub fn normalize_question(raw: &Value) -> Question {
    let stem = first_match(STEM_RULES, raw).unwrap_or_else(|| UNTITLED_QUESTION.to_string());
    let raw_choices = first_match(CHOICE_RULES, raw).unwrap_or_default();
    let labels: Vec<String> = raw_choices.iter().map(choice_label).collect();

    let set = ChoiceSet {
        raw: &raw_choices,
        labels: &labels,
    };
    let correct_index = resolve_correct_index(raw, &set);

    let explanation = first_match(EXPLANATION_RULES, raw).unwrap_or_default();
    let display_number = first_match(DISPLAY_NUMBER_RULES, raw).unwrap_or_default();
    let choices = labels.into_iter().map(Choice::new).collect();

    Question::new(stem, choices, correct_index, explanation, display_number)
}

/// Run [`CORRECT_RULES`] in order; the first in-range index wins.
#[must_use]
pub fn resolve_correct_index(raw: &Value, set: &ChoiceSet<'_>) -> Option<usize> {
    CORRECT_RULES
        .iter()
        .filter_map(|rule| (rule.resolve)(raw, set))
        .find(|idx| *idx < set.labels.len())
}

/// Display label for one raw choice element.
#[must_use]
pub fn choice_label(choice: &Value) -> String {
    match choice {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["label", "text"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(
                || serde_json::to_string_pretty(choice).unwrap_or_default(),
                str::to_string,
            ),
        other => other.to_string(),
    }
}

/// Strip a leading `"A)"`, `"A."` or `"A-"` marker and surrounding whitespace.
#[must_use]
pub fn strip_letter_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(first) = trimmed.chars().next() else {
        return trimmed;
    };
    if !first.is_ascii_alphabetic() {
        return trimmed;
    }
    let rest = trimmed[first.len_utf8()..].trim_start();
    match rest.strip_prefix(['.', ')', '-']) {
        Some(body) => body.trim(),
        None => trimmed,
    }
}

fn explicit_index(doc: &Value, field: &str, set: &ChoiceSet<'_>) -> Option<usize> {
    index_field(doc, field).filter(|idx| *idx < set.labels.len())
}

/// `"B"` → 1, case-insensitive, single ASCII letter, range-checked.
fn letter_index(letter: &str, choice_count: usize) -> Option<usize> {
    let mut chars = letter.trim().chars();
    let ch = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !ch.is_ascii_uppercase() {
        return None;
    }
    let idx = usize::from(ch as u8 - b'A');
    (idx < choice_count).then_some(idx)
}

/// Exact (trimmed, case-insensitive) label match, then prefix-stripped match.
fn match_label(needle: &str, labels: &[String]) -> Option<usize> {
    let needle_full = needle.trim().to_lowercase();
    if let Some(idx) = labels
        .iter()
        .position(|label| label.trim().to_lowercase() == needle_full)
    {
        return Some(idx);
    }
    let needle_body = strip_letter_prefix(needle).to_lowercase();
    labels
        .iter()
        .position(|label| strip_letter_prefix(label).to_lowercase() == needle_body)
}

fn is_flagged_correct(choice: &Value) -> bool {
    ["correct", "isCorrect"]
        .iter()
        .any(|key| choice.get(*key).and_then(Value::as_bool) == Some(true))
}
