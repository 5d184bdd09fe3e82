//! Variable registry
//!
//! Owns the variable records, the built-in pseudo-variable table and the
//! indices derived from them.

use std::collections::{HashMap, HashSet};

use templar_domain::{AdhocFilter, TemplatingDocument, Variable, VariableKind, VariableValue};
use tracing::{debug, warn};

use super::builtins::BuiltinVariables;
use super::parser::{Token, tokenize};
use crate::error::{ApplicationError, ApplicationResult};

/// Which adhoc variables apply to which data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AdhocIndex {
    /// Adhoc variable positions keyed by resolved data source name.
    by_datasource: HashMap<String, Vec<usize>>,
    /// Adhoc variables targeting the default data source.
    default: Vec<usize>,
}

/// The set of known variables.
///
/// Lookups by name always see the current records. The adhoc data source
/// index is derived from mutable fields and is only refreshed by
/// [`VariableRegistry::init`] and [`VariableRegistry::update`].
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
    adhoc: AdhocIndex,
    builtins: BuiltinVariables,
}

impl VariableRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `variables`.
    ///
    /// # Errors
    /// Returns [`ApplicationError::DuplicateVariable`] if two variables share a name.
    pub fn from_variables(variables: Vec<Variable>) -> ApplicationResult<Self> {
        let mut registry = Self::new();
        registry.init(variables)?;
        Ok(registry)
    }

    /// Creates a registry from a templating document, including its built-ins.
    ///
    /// # Errors
    /// Returns [`ApplicationError::DuplicateVariable`] if two variables share a name.
    pub fn from_document(document: TemplatingDocument) -> ApplicationResult<Self> {
        let mut registry = Self::from_variables(document.list)?;
        registry.builtins = document.builtins.into_iter().collect();
        Ok(registry)
    }

    /// Replaces every known variable and rebuilds all indices.
    ///
    /// Built-in texts are kept. On error the registry is left unchanged.
    ///
    /// # Errors
    /// Returns [`ApplicationError::DuplicateVariable`] if two variables share a name.
    pub fn init(&mut self, variables: Vec<Variable>) -> ApplicationResult<()> {
        let mut index = HashMap::with_capacity(variables.len());
        for (position, variable) in variables.iter().enumerate() {
            if index.insert(variable.name.clone(), position).is_some() {
                warn!(name = %variable.name, "rejecting variables with a duplicate name");
                return Err(ApplicationError::DuplicateVariable(variable.name.clone()));
            }
        }

        self.variables = variables;
        self.index = index;
        self.adhoc = self.build_adhoc_index();

        debug!(
            variables = self.variables.len(),
            adhoc_datasources = self.adhoc.by_datasource.len(),
            "variable registry initialised"
        );
        Ok(())
    }

    /// Recomputes the derived indices after records were mutated in place.
    pub fn update(&mut self) {
        let mut index = HashMap::with_capacity(self.variables.len());
        for (position, variable) in self.variables.iter().enumerate() {
            if index.contains_key(&variable.name) {
                warn!(name = %variable.name, "duplicate variable name, keeping the first");
                continue;
            }
            index.insert(variable.name.clone(), position);
        }
        self.index = index;
        self.adhoc = self.build_adhoc_index();

        debug!(
            variables = self.variables.len(),
            adhoc_datasources = self.adhoc.by_datasource.len(),
            "variable registry updated"
        );
    }

    /// Looks a variable up by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).and_then(|&i| self.variables.get(i))
    }

    /// Returns true if a variable named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns a mutable record. Call [`Self::update`] afterwards if the
    /// change affects data source matching.
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let position = *self.index.get(name)?;
        self.variables.get_mut(position)
    }

    /// Sets the current selection of a variable. Returns false if unknown.
    pub fn set_current(
        &mut self,
        name: &str,
        value: impl Into<VariableValue>,
        text: Option<VariableValue>,
    ) -> bool {
        let Some(variable) = self.variable_mut(name) else {
            return false;
        };
        variable.current.value = value.into();
        variable.current.text = text;
        true
    }

    /// All variables, in registration order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if no variable is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Inserts or replaces a built-in pseudo-variable text.
    pub fn set_builtin(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.builtins.set(name, text);
    }

    /// Returns the text of a built-in pseudo-variable.
    #[must_use]
    pub fn builtin(&self, name: &str) -> Option<&str> {
        self.builtins.text(name)
    }

    /// Returns the built-in table.
    #[must_use]
    pub const fn builtins(&self) -> &BuiltinVariables {
        &self.builtins
    }

    /// Returns the filters of every adhoc variable applying to `datasource`.
    ///
    /// An adhoc variable applies when its data source is `datasource`
    /// literally, when it references a data source variable whose current
    /// value was `datasource` at the last [`Self::update`], or when it has
    /// no data source (the default one).
    #[must_use]
    pub fn get_adhoc_filters(&self, datasource: &str) -> Vec<AdhocFilter> {
        let mut positions: Vec<usize> = self
            .adhoc
            .by_datasource
            .get(datasource)
            .into_iter()
            .flatten()
            .chain(&self.adhoc.default)
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();

        positions
            .into_iter()
            .filter_map(|i| self.variables.get(i))
            .flat_map(|variable| variable.filters().iter().cloned())
            .collect()
    }

    fn build_adhoc_index(&self) -> AdhocIndex {
        let mut adhoc = AdhocIndex::default();

        for (position, variable) in self.variables.iter().enumerate() {
            let VariableKind::Adhoc { datasource, .. } = &variable.kind else {
                continue;
            };

            match datasource {
                None => adhoc.default.push(position),
                Some(reference) => {
                    let mut targets = HashSet::new();
                    targets.insert(reference.clone());
                    if let Some(resolved) = self.resolve_datasource(reference) {
                        targets.insert(resolved);
                    }
                    for target in targets {
                        adhoc.by_datasource.entry(target).or_default().push(position);
                    }
                }
            }
        }

        adhoc
    }

    /// Resolves a data source written as a single reference (`$ds`,
    /// `${ds}`, `[[ds]]`) to the current value of the referenced data
    /// source variable.
    fn resolve_datasource(&self, reference: &str) -> Option<String> {
        let tokens = tokenize(reference);
        let [Token::Reference(reference)] = tokens.as_slice() else {
            return None;
        };
        self.lookup(&reference.name)
            .filter(|v| matches!(v.kind, VariableKind::Datasource))
            .and_then(|variable| variable.current.value.as_single())
            .map(str::to_string)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filter(value: &str) -> AdhocFilter {
        AdhocFilter::new("key", "=", value)
    }

    fn adhoc_registry() -> VariableRegistry {
        VariableRegistry::from_variables(vec![
            Variable::new("ds", VariableKind::Datasource, "logstash").with_text("logstash"),
            Variable::adhoc("test", Some("oogle"), vec![filter("1")]),
            Variable::adhoc("test2", Some("$ds"), vec![filter("2")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let registry =
            VariableRegistry::from_variables(vec![Variable::query("test", "oogle")]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("test"));
        assert_eq!(
            registry.lookup("test").map(|v| &v.current.value),
            Some(&VariableValue::from("oogle"))
        );
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_init_rejects_duplicates() {
        let mut registry =
            VariableRegistry::from_variables(vec![Variable::query("keep", "1")]).unwrap();

        let result = registry.init(vec![Variable::query("a", "1"), Variable::query("a", "2")]);
        let expected = ApplicationError::DuplicateVariable("a".to_string());
        assert_eq!(result, Err(expected));

        // The previous variables are still there
        assert!(registry.contains("keep"));
        assert!(!registry.contains("a"));
    }

    #[test]
    fn test_init_replaces_everything() {
        let mut registry =
            VariableRegistry::from_variables(vec![Variable::query("old", "1")]).unwrap();
        registry.init(vec![Variable::query("new", "2")]).unwrap();

        assert!(!registry.contains("old"));
        assert!(registry.contains("new"));
    }

    #[test]
    fn test_init_keeps_builtins() {
        let mut registry = VariableRegistry::new();
        registry.set_builtin("$__auto_interval_interval", "13m");
        registry.init(Vec::new()).unwrap();
        assert_eq!(registry.builtin("$__auto_interval_interval"), Some("13m"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_adhoc_filters_literal_datasource() {
        let filters = adhoc_registry().get_adhoc_filters("oogle");
        assert_eq!(filters, vec![filter("1")]);
    }

    #[test]
    fn test_adhoc_filters_no_match() {
        assert!(adhoc_registry().get_adhoc_filters("oogleasdasd").is_empty());
    }

    #[test]
    fn test_adhoc_filters_via_datasource_variable() {
        let filters = adhoc_registry().get_adhoc_filters("logstash");
        assert_eq!(filters, vec![filter("2")]);
    }

    #[test]
    fn test_adhoc_filters_ignore_non_datasource_reference() {
        let registry = VariableRegistry::from_variables(vec![
            Variable::query("server", "logstash"),
            Variable::adhoc("test", Some("$server"), vec![filter("1")]),
        ])
        .unwrap();

        assert!(registry.get_adhoc_filters("logstash").is_empty());
        assert_eq!(registry.get_adhoc_filters("$server"), vec![filter("1")]);
    }

    #[test]
    fn test_adhoc_filters_default_datasource() {
        let registry = VariableRegistry::from_variables(vec![
            Variable::adhoc("a", None, vec![filter("default")]),
            Variable::adhoc("b", Some("influx"), vec![filter("influx")]),
        ])
        .unwrap();

        assert_eq!(
            registry.get_adhoc_filters("influx"),
            vec![filter("default"), filter("influx")]
        );
        assert_eq!(registry.get_adhoc_filters("other"), vec![filter("default")]);
    }

    #[test]
    fn test_datasource_change_visible_after_update() {
        let mut registry = adhoc_registry();
        assert!(registry.set_current("ds", "elastic", None));

        // Derived index is stale until update
        assert_eq!(registry.get_adhoc_filters("logstash"), vec![filter("2")]);
        assert!(registry.get_adhoc_filters("elastic").is_empty());

        registry.update();
        assert!(registry.get_adhoc_filters("logstash").is_empty());
        assert_eq!(registry.get_adhoc_filters("elastic"), vec![filter("2")]);
    }

    #[test]
    fn test_set_current_unknown() {
        let mut registry = VariableRegistry::new();
        assert!(!registry.set_current("missing", "x", None));
    }

    #[test]
    fn test_from_document() {
        let mut document = TemplatingDocument::new(vec![Variable::query("a", "1")]);
        document
            .builtins
            .insert("$__auto_interval_interval".to_string(), "13m".to_string());

        let registry = VariableRegistry::from_document(document).unwrap();
        assert!(registry.contains("a"));
        assert_eq!(registry.builtins().len(), 1);
    }
}
