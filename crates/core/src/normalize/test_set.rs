use serde_json::Value;

use crate::model::{EntryId, TestSet, TestSetEntry, UNTITLED_TEST};

use super::rules::{Rule, field_rule, first_match, scalar_text, string_field, text_field};

/// Object fields that may hold the entry list, in priority order.
const LIST_FIELDS: &[&str] = &["questions", "items", "tests"];

/// Keys that describe the test set itself rather than an entry.
const METADATA_FIELDS: &[&str] = &["title", "name"];

const TITLE_RULES: &[Rule<String>] = &[
    field_rule!(string_field, "title"),
    field_rule!(string_field, "name"),
];

/// How an entry names its question resource, in priority order.
pub const ENTRY_FILE_RULES: &[Rule<String>] = &[
    Rule {
        name: "plain string",
        extract: |doc| match doc {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        },
    },
    field_rule!(text_field, "filename"),
    field_rule!(text_field, "file"),
    field_rule!(text_field, "path"),
    field_rule!(text_field, "question_file"),
    field_rule!(text_field, "id"),
    field_rule!(string_field, "question"),
];

/// Normalize a raw test-set document.
///
/// Accepts a bare array, an object with a `questions`/`items`/`tests` array,
/// or a generic object whose values are the entries. For the generic form the
/// entry order follows key order and carries no meaning. Elements that name
/// no question resource are dropped. Never fails.
#[must_use]
pub fn normalize_test_set(raw: &Value, name: &str) -> TestSet {
    let title = first_match(TITLE_RULES, raw)
        .or_else(|| (!name.is_empty()).then(|| name.to_string()))
        .unwrap_or_else(|| UNTITLED_TEST.to_string());

    let entries = entry_values(raw)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| normalize_entry(element, idx))
        .collect();

    TestSet { title, entries }
}

/// Normalize one test-set element, or `None` when it names no resource.
#[must_use]
pub fn normalize_entry(element: &Value, position: usize) -> Option<TestSetEntry> {
    let file = first_match(ENTRY_FILE_RULES, element)?;
    let id = element
        .get("id")
        .and_then(|value| match value {
            Value::Number(n) => Some(EntryId::Number(n.clone())),
            Value::String(_) => scalar_text(value).map(EntryId::Text),
            _ => None,
        })
        .unwrap_or(EntryId::Position(position));
    Some(TestSetEntry { file, id })
}

fn entry_values(raw: &Value) -> Vec<&Value> {
    match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            if let Some(list) = LIST_FIELDS
                .iter()
                .find_map(|field| map.get(*field).and_then(Value::as_array))
            {
                return list.iter().collect();
            }
            map.iter()
                .filter(|(key, _)| !METADATA_FIELDS.contains(&key.as_str()))
                .map(|(_, value)| value)
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn files(set: &TestSet) -> Vec<String> {
        set.entries.iter().map(|e| e.file.clone()).collect()
    }

    #[test]
    fn array_and_wrapped_shapes_agree() {
        let array = json!(["q1.json", { "file": "q2.json" }, { "path": "q3.json" }]);
        let wrapped = json!({ "questions": ["q1.json", { "file": "q2.json" }, { "path": "q3.json" }] });
        let items = json!({ "items": ["q1.json", { "file": "q2.json" }, { "path": "q3.json" }] });

        let expected = vec!["q1.json", "q2.json", "q3.json"];
        assert_eq!(files(&normalize_test_set(&array, "t")), expected);
        assert_eq!(files(&normalize_test_set(&wrapped, "t")), expected);
        assert_eq!(files(&normalize_test_set(&items, "t")), expected);
    }

    #[test]
    fn generic_object_contains_same_files() {
        let generic = json!({ "b": "q2.json", "a": { "filename": "q1.json" }, "title": "Set A" });
        let set = normalize_test_set(&generic, "set_a.json");

        let mut got = files(&set);
        got.sort();
        assert_eq!(got, vec!["q1.json", "q2.json"]);
        assert_eq!(set.title, "Set A");
    }

    #[test]
    fn field_priority_prefers_filename() {
        let element = json!({ "path": "p.json", "file": "f.json", "filename": "n.json" });
        let entry = normalize_entry(&element, 3).unwrap();
        assert_eq!(entry.file, "n.json");
        assert_eq!(entry.id, EntryId::Position(3));
    }

    #[test]
    fn id_and_question_fields_are_fallbacks() {
        let set = normalize_test_set(
            &json!([{ "id": 12 }, { "question": "question_4.json" }, { "question": 5 }, {}, 7, null]),
            "t",
        );
        assert_eq!(files(&set), vec!["12", "question_4.json"]);
        assert_eq!(set.entries[0].id, EntryId::Number(12.into()));
        assert_eq!(set.entries[1].id, EntryId::Position(1));
    }

    #[test]
    fn title_falls_back_to_name_then_sentinel() {
        assert_eq!(normalize_test_set(&json!([]), "set.json").title, "set.json");
        assert_eq!(normalize_test_set(&json!([]), "").title, UNTITLED_TEST);
        assert_eq!(
            normalize_test_set(&json!({ "name": "Named", "tests": [] }), "x").title,
            "Named"
        );
    }

    #[test]
    fn scalars_normalize_to_empty_set() {
        assert!(normalize_test_set(&json!("nope"), "t").is_empty());
        assert!(normalize_test_set(&Value::Null, "t").is_empty());
    }
}
