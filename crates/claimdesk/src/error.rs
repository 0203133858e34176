use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_yml::Error),
}

/// Field-keyed validation messages as returned by the server, e.g.
/// `{"email": ["The email field is required."]}`. Operation-level
/// failures land under the `general` key. Every store operation
/// replaces the whole set, success leaves it empty. Keys iterate in
/// sorted order, so rendering the set is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorSet(pub BTreeMap<String, Vec<String>>);

impl ErrorSet {
    pub fn general(message: impl Into<String>) -> Self {
        Self::field("general", message)
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), vec![message.into()]);
        Self(map)
    }

    /// Pulls the `errors` map out of a response body, falling back to a
    /// `general` message when the body has none.
    pub fn from_body(body: &serde_json::Value, fallback: &str) -> Self {
        body.get("errors")
            .and_then(|errors| serde_json::from_value(errors.clone()).ok())
            .unwrap_or_else(|| Self::general(fallback))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errors_from_body() {
        let body = json!({"message": "invalid", "errors": {"amount": ["The amount field is required."]}});
        let errors = ErrorSet::from_body(&body, "Something went wrong");
        assert_eq!(errors.messages("amount"), ["The amount field is required."]);
    }

    #[test]
    fn test_errors_fallback_when_body_has_none() {
        let errors = ErrorSet::from_body(&json!({"message": "boom"}), "Something went wrong");
        assert_eq!(errors.messages("general"), ["Something went wrong"]);
    }

    #[test]
    fn test_fields_iterate_in_sorted_order() {
        let body = json!({"errors": {
            "relation": ["The relation field is required."],
            "amount": ["The amount field is required."],
            "document": ["The document must be a file."],
        }});
        let errors = ErrorSet::from_body(&body, "Something went wrong");

        let fields = errors.0.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(fields, ["amount", "document", "relation"]);
    }
}
