//! Serialized templating state handed over by a host

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// The variables of a dashboard plus the built-in pseudo-variable texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatingDocument {
    /// Variable records, in dashboard order.
    #[serde(default)]
    pub list: Vec<Variable>,

    /// Display texts of reserved values such as `$__auto_interval_period`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub builtins: BTreeMap<String, String>,
}

impl TemplatingDocument {
    /// Creates a document from variables only.
    #[must_use]
    pub const fn new(list: Vec<Variable>) -> Self {
        Self {
            list,
            builtins: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::variable::VariableKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "list": [
                {
                    "type": "query",
                    "name": "server",
                    "current": { "value": "{asd,asd2}", "text": "All" }
                },
                {
                    "type": "interval",
                    "name": "period",
                    "current": { "value": "$__auto_interval_interval", "text": "auto" }
                }
            ],
            "builtins": { "$__auto_interval_interval": "13m" }
        }"#;

        let doc: TemplatingDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.list.len(), 2);
        assert_eq!(doc.list[1].kind, VariableKind::Interval);
        assert_eq!(
            doc.builtins.get("$__auto_interval_interval").map(String::as_str),
            Some("13m")
        );
    }

    #[test]
    fn test_empty_document() {
        let doc: TemplatingDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, TemplatingDocument::default());
    }
}
