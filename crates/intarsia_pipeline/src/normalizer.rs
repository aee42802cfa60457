//! Best-effort normalization of backend output into candidate values.

use serde_json::Value;

/// Converts a backend's raw text into an ordered list of candidate values.
///
/// The backend is asked for a JSON array of `{"value": ...}` objects but is
/// not contractually guaranteed to produce one; models wrap answers in
/// prose, drop the enclosing array, or use the wrong key. The normalizer
/// applies a fixed sequence of recovery heuristics and never fails: when
/// nothing parses, the raw text itself becomes the single candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Normalize one raw response.
    ///
    /// # Examples
    ///
    /// ```
    /// use intarsia_pipeline::ResponseNormalizer;
    /// use serde_json::json;
    ///
    /// let values = ResponseNormalizer::normalize(r#"[{"value":"a"},{"value":"b"}]"#);
    /// assert_eq!(values, vec![json!("a"), json!("b")]);
    /// ```
    pub fn normalize(raw: &str) -> Vec<Value> {
        let candidate = Self::extract_json(raw).unwrap_or(raw);
        match Self::parse(candidate) {
            Some(parsed) => Self::values_of(parsed)
                .unwrap_or_else(|| vec![Value::String(raw.to_string())]),
            None => vec![Value::String(raw.to_string())],
        }
    }

    /// The substring between the first `[`/`{` and the last matching
    /// `]`/`}`, discarding any prose around the JSON body.
    fn extract_json(raw: &str) -> Option<&str> {
        let start = raw.find(['[', '{'])?;
        let close = match raw.as_bytes()[start] {
            b'[' => ']',
            _ => '}',
        };
        let end = raw.rfind(close)?;
        if end <= start {
            return None;
        }
        Some(&raw[start..=end])
    }

    /// Full parse, falling back to line-by-line fragments.
    fn parse(text: &str) -> Option<Value> {
        if let Ok(parsed) = serde_json::from_str(text) {
            return Some(parsed);
        }
        let fragments: Vec<Value> = text
            .lines()
            .filter_map(|line| {
                let line = line.trim().trim_end_matches(',');
                if line.is_empty() {
                    return None;
                }
                serde_json::from_str(line).ok()
            })
            .collect();
        if fragments.is_empty() {
            None
        } else {
            Some(Value::Array(fragments))
        }
    }

    /// Map a parsed structure onto an ordered value list.
    ///
    /// `None` means the shape is unrecognized and the caller falls back to
    /// the raw text.
    fn values_of(parsed: Value) -> Option<Vec<Value>> {
        match parsed {
            Value::Array(items) => {
                if items.is_empty() {
                    return Some(Vec::new());
                }
                if items
                    .iter()
                    .all(|item| matches!(item, Value::Object(o) if o.contains_key("value")))
                {
                    return Some(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::Object(mut o) => o.remove("value"),
                                _ => None,
                            })
                            .collect(),
                    );
                }
                if items.iter().all(|item| item.is_object()) {
                    // Wrong key name from the model; take each object's
                    // first value.
                    return Some(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::Object(o) => o.into_iter().next().map(|(_, v)| v),
                                _ => None,
                            })
                            .collect(),
                    );
                }
                if items.iter().all(|item| item.is_array()) {
                    return Some(
                        items
                            .into_iter()
                            .flat_map(|item| match item {
                                Value::Array(inner) => inner,
                                _ => Vec::new(),
                            })
                            .filter(|v| !v.is_array() && !v.is_object())
                            .collect(),
                    );
                }
                if items.iter().all(|item| !item.is_array() && !item.is_object()) {
                    return Some(items);
                }
                None
            }
            Value::Object(mut o) => o.remove("value").map(|v| vec![v]),
            _ => None,
        }
    }
}
