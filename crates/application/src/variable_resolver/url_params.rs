//! URL query parameter serialization of variable values

use templar_domain::{ScopedVars, UrlParams, Variable, VariableKind, VariableValue};
use url::Url;

use super::registry::VariableRegistry;

/// Prefix of the query parameter holding a variable's value.
pub const URL_PARAM_PREFIX: &str = "var-";

const FILTER_DELIMITER: char = '|';
const ESCAPED_FILTER_DELIMITER: &str = "__gfp__";

/// Capability of values that can be written into a URL.
pub trait HasUrlValue {
    /// Returns the value to put in the URL, or `None` if the value never
    /// takes part in URL synchronization.
    fn url_value(&self) -> Option<VariableValue>;
}

impl HasUrlValue for Variable {
    fn url_value(&self) -> Option<VariableValue> {
        match &self.kind {
            VariableKind::Query
            | VariableKind::Custom
            | VariableKind::Interval
            | VariableKind::Datasource
            | VariableKind::Textbox => Some(selection_url_value(&self.kind, &self.current.value)),
            VariableKind::Adhoc { filters, .. } => Some(VariableValue::Multi(
                filters
                    .iter()
                    .map(|filter| {
                        [&filter.key, &filter.operator, &filter.value]
                            .map(|part| escape_delimiter(part))
                            .join("|")
                    })
                    .collect(),
            )),
            VariableKind::Constant => None,
        }
    }
}

/// The all sentinel is written as `All` for kinds offering an "all" option.
fn selection_url_value(kind: &VariableKind, value: &VariableValue) -> VariableValue {
    match kind {
        VariableKind::Query | VariableKind::Custom if value.is_all() => VariableValue::from("All"),
        _ => value.clone(),
    }
}

fn escape_delimiter(value: &str) -> String {
    value.replace(FILTER_DELIMITER, ESCAPED_FILTER_DELIMITER)
}

/// Writes variable values into URL query parameters.
#[derive(Debug, Clone, Copy)]
pub struct UrlParamSerializer<'r> {
    registry: &'r VariableRegistry,
}

impl<'r> UrlParamSerializer<'r> {
    /// Creates a serializer over a borrowed registry.
    #[must_use]
    pub const fn new(registry: &'r VariableRegistry) -> Self {
        Self { registry }
    }

    /// Writes `var-<name>` for every variable taking part in URL sync.
    ///
    /// A variable is skipped when it is flagged `skip_url_sync`, when its
    /// scoped override is, or when its kind has no URL value. A scoped
    /// override's value replaces the variable's own.
    pub fn fill_variable_values_for_url(
        &self,
        params: &mut UrlParams,
        scoped: Option<&ScopedVars>,
    ) {
        for variable in self.registry.variables() {
            if variable.skip_url_sync {
                continue;
            }

            let scoped_value = scoped.and_then(|vars| vars.get(&variable.name));
            if scoped_value.is_some_and(|s| s.skip_url_sync) {
                continue;
            }

            let Some(own) = variable.url_value() else {
                continue;
            };

            let value = match scoped_value {
                Some(scoped) => selection_url_value(&variable.kind, &scoped.value),
                None => own,
            };
            params.insert(format!("{URL_PARAM_PREFIX}{}", variable.name), value);
        }
    }

    /// Returns the URL parameters of the registry.
    #[must_use]
    pub fn url_params(&self, scoped: Option<&ScopedVars>) -> UrlParams {
        let mut params = UrlParams::new();
        self.fill_variable_values_for_url(&mut params, scoped);
        params
    }
}

/// Appends `params` to the query of `url`, one pair per value.
pub fn append_to_url(params: &UrlParams, url: &mut Url) {
    let mut pairs = url.query_pairs_mut();
    for (key, value) in params {
        for v in value.values() {
            pairs.append_pair(key, v);
        }
    }
}

/// Encodes `params` as an `application/x-www-form-urlencoded` query string.
#[must_use]
pub fn to_query_string(params: &UrlParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        for v in value.values() {
            serializer.append_pair(key, v);
        }
    }
    serializer.finish()
}
