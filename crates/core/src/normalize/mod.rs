//! Tolerant normalization of externally supplied test-set and question documents.

mod question;
mod reference;
pub mod rules;
mod test_set;

pub use question::{
    CHOICE_RULES, CORRECT_RULES, ChoiceSet, CorrectRule, DISPLAY_NUMBER_RULES, EXPLANATION_RULES,
    STEM_RULES, choice_label, normalize_question, resolve_correct_index, strip_letter_prefix,
};
pub use reference::{JSON_SUFFIX, has_json_suffix, question_file_name};
pub use test_set::{ENTRY_FILE_RULES, normalize_entry, normalize_test_set};
