//! Named extraction rules.
//!
//! Every canonical field is filled by the first rule in its table that yields
//! a value. Rules are plain functions over the raw document, so each one can
//! be exercised on its own and the tables read as the priority order.

use serde_json::Value;

/// A named, pure extraction step.
#[derive(Clone, Copy)]
pub struct Rule<T> {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<T>,
}

impl<T> Rule<T> {
    #[must_use]
    pub fn apply(&self, doc: &Value) -> Option<T> {
        (self.extract)(doc)
    }
}

impl<T> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Apply `rules` in order and return the first value produced.
pub fn first_match<T>(rules: &[Rule<T>], doc: &Value) -> Option<T> {
    rules.iter().find_map(|rule| rule.apply(doc))
}

/// Name of the first rule that produces a value. Handy for diagnostics.
#[must_use]
pub fn matching_rule<T>(rules: &[Rule<T>], doc: &Value) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| rule.apply(doc).is_some())
        .map(|rule| rule.name)
}

/// Builds a `Rule` that probes a single object field with `$probe`.
macro_rules! field_rule {
    ($probe:path, $field:literal) => {
        $crate::normalize::rules::Rule {
            name: $field,
            extract: |doc| $probe(doc, $field),
        }
    };
}
pub(crate) use field_rule;

/// Non-empty text at `field`. Numbers count and are rendered as text.
pub(crate) fn text_field(doc: &Value, field: &str) -> Option<String> {
    scalar_text(doc.get(field)?)
}

/// Non-empty string at `field`. Numbers do not count.
pub(crate) fn string_field(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Array at `field`, cloned.
pub(crate) fn array_field(doc: &Value, field: &str) -> Option<Vec<Value>> {
    doc.get(field)?.as_array().cloned()
}

/// Non-negative integer at `field`. Integral floats such as `1.0` are accepted.
pub(crate) fn index_field(doc: &Value, field: &str) -> Option<usize> {
    let Value::Number(n) = doc.get(field)? else {
        return None;
    };
    if let Some(v) = n.as_u64() {
        return usize::try_from(v).ok();
    }
    let f = n.as_f64()?;
    if f < 0.0 || f.fract() != 0.0 || f > f64::from(u32::MAX) {
        return None;
    }
    // Bounded above, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = f as usize;
    Some(idx)
}

/// Text of a string or number value, if non-empty.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[Rule<String>] = &[
        field_rule!(text_field, "first"),
        field_rule!(text_field, "second"),
    ];

    #[test]
    fn first_match_respects_priority() {
        let doc = json!({ "second": "b", "first": "a" });
        assert_eq!(first_match(RULES, &doc).as_deref(), Some("a"));
        assert_eq!(matching_rule(RULES, &doc), Some("first"));
    }

    #[test]
    fn empty_strings_fall_through() {
        let doc = json!({ "first": "", "second": 7 });
        assert_eq!(first_match(RULES, &doc).as_deref(), Some("7"));
    }

    #[test]
    fn index_field_rejects_negative_and_fractional() {
        assert_eq!(index_field(&json!({ "i": -1 }), "i"), None);
        assert_eq!(index_field(&json!({ "i": 1.5 }), "i"), None);
        assert_eq!(index_field(&json!({ "i": 2.0 }), "i"), Some(2));
        assert_eq!(index_field(&json!({ "i": "2" }), "i"), None);
    }

    #[test]
    fn non_objects_yield_nothing() {
        assert_eq!(first_match(RULES, &json!([1, 2])), None);
        assert_eq!(first_match(RULES, &Value::Null), None);
    }
}
