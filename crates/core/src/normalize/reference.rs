/// Suffix shared by every test-set and question document.
pub const JSON_SUFFIX: &str = ".json";

/// Resolve a question reference to a question file name.
///
/// `"7"` becomes `question_7.json`, names already ending in `.json` are kept,
/// and other names ending in digits (`"q7"`) are mapped by their trailing
/// number. Anything else is used as given. Blank references resolve to `None`.
#[must_use]
pub fn question_file_name(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("question_{reference}{JSON_SUFFIX}"));
    }
    if has_json_suffix(reference) {
        return Some(reference.to_string());
    }
    let digits_start = reference
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, _)| idx);
    match digits_start {
        Some(start) => Some(format!("question_{}{JSON_SUFFIX}", &reference[start..])),
        None => Some(reference.to_string()),
    }
}

/// Case-insensitive check for the `.json` suffix.
#[must_use]
pub fn has_json_suffix(name: &str) -> bool {
    name.len() >= JSON_SUFFIX.len()
        && name.is_char_boundary(name.len() - JSON_SUFFIX.len())
        && name[name.len() - JSON_SUFFIX.len()..].eq_ignore_ascii_case(JSON_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_reference_maps_to_question_file() {
        assert_eq!(question_file_name(" 12 ").as_deref(), Some("question_12.json"));
    }

    #[test]
    fn json_names_are_kept() {
        assert_eq!(question_file_name("intro.JSON").as_deref(), Some("intro.JSON"));
    }

    #[test]
    fn trailing_number_is_extracted() {
        assert_eq!(question_file_name("q-42").as_deref(), Some("question_42.json"));
    }

    #[test]
    fn other_references_pass_through() {
        assert_eq!(question_file_name("intro").as_deref(), Some("intro"));
        assert_eq!(question_file_name("   "), None);
    }

    #[test]
    fn suffix_check_handles_short_and_multibyte_names() {
        assert!(!has_json_suffix("json"));
        assert!(!has_json_suffix("éjson"));
        assert!(has_json_suffix("a.json"));
    }
}
