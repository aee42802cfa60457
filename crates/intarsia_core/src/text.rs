//! Small text helpers shared by the prompt layer and the rule set.

use serde_json::Value;

/// Remove markup tags from a text, keeping the character data.
///
/// Angle brackets that never close are dropped to the end of input, which
/// matches how host platforms sanitize truncated markup.
///
/// # Examples
///
/// ```
/// use intarsia_core::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(strip_tags("no markup"), "no markup");
/// ```
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// The textual content of a field delta.
///
/// Scalar deltas return their display form; compound deltas return their
/// `value` element when present, falling back to the serialized object.
///
/// # Examples
///
/// ```
/// use intarsia_core::value_text;
/// use serde_json::json;
///
/// assert_eq!(value_text(&json!("plain")), "plain");
/// assert_eq!(value_text(&json!({"value": "wrapped"})), "wrapped");
/// ```
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("value") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(map.clone()).to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_nested_tags() {
        assert_eq!(
            strip_tags("<div class=\"x\">a<br/>b</div>"),
            "ab"
        );
    }

    #[test]
    fn unclosed_tag_drops_remainder() {
        assert_eq!(strip_tags("before <unclosed"), "before ");
    }

    #[test]
    fn numbers_render_as_display_form() {
        assert_eq!(value_text(&json!(42)), "42");
    }
}
