//! Evaluation configuration.
//!
//! A [`Configuration`] holds what an evaluation run reads but never changes:
//! the tree access layer, the function registry, and the options that shape
//! what `read` returns. Its collaborators sit behind `Arc`s. Late bindings
//! capture a clone, so sub-paths evaluate with the same settings as the path
//! that owns them.

use std::collections::HashSet;
use std::sync::Arc;

use atrius_jsonpath_support::{JsonProvider, SerdeJsonProvider};

use crate::function_registry::{FunctionRegistry, standard_registry};

/// Options changing how results are returned from [`crate::CompiledPath::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationOption {
    /// Wrap the result of a definite path in a one-element array.
    AlwaysReturnList,
    /// Return the normalized path(s) of the result instead of the value.
    AsPathList,
    /// Return `null` (or an empty list) instead of an error.
    SuppressExceptions,
}

/// Settings shared by every evaluation run of a path.
///
/// # Examples
///
/// ```rust
/// use atrius_json_path::{Configuration, EvaluationOption};
///
/// let config = Configuration::builder()
///     .option(EvaluationOption::AlwaysReturnList)
///     .build();
/// assert!(config.contains_option(EvaluationOption::AlwaysReturnList));
/// assert!(config.function_registry().contains("sum"));
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    json_provider: Arc<dyn JsonProvider>,
    function_registry: Arc<FunctionRegistry>,
    options: HashSet<EvaluationOption>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            json_provider: Arc::new(SerdeJsonProvider::new()),
            function_registry: standard_registry(),
            options: HashSet::new(),
        }
    }
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn json_provider(&self) -> &dyn JsonProvider {
        self.json_provider.as_ref()
    }

    pub fn function_registry(&self) -> &FunctionRegistry {
        self.function_registry.as_ref()
    }

    pub fn options(&self) -> &HashSet<EvaluationOption> {
        &self.options
    }

    pub fn contains_option(&self, option: EvaluationOption) -> bool {
        self.options.contains(&option)
    }

    /// Returns a copy of this configuration with an extra option set.
    pub fn add_option(&self, option: EvaluationOption) -> Self {
        let mut config = self.clone();
        config.options.insert(option);
        config
    }
}

/// Builder for [`Configuration`]. Unset parts fall back to the defaults.
#[derive(Default)]
pub struct ConfigurationBuilder {
    json_provider: Option<Arc<dyn JsonProvider>>,
    function_registry: Option<Arc<FunctionRegistry>>,
    options: HashSet<EvaluationOption>,
}

impl ConfigurationBuilder {
    pub fn json_provider(mut self, provider: Arc<dyn JsonProvider>) -> Self {
        self.json_provider = Some(provider);
        self
    }

    pub fn function_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.function_registry = Some(registry);
        self
    }

    pub fn option(mut self, option: EvaluationOption) -> Self {
        self.options.insert(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = EvaluationOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn build(self) -> Configuration {
        let defaults = Configuration::default();
        Configuration {
            json_provider: self.json_provider.unwrap_or(defaults.json_provider),
            function_registry: self.function_registry.unwrap_or(defaults.function_registry),
            options: self.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert!(config.options().is_empty());
        assert!(config.function_registry().contains("sum"));
        assert!(config.json_provider().is_array(&serde_json::json!([])));
    }

    #[test]
    fn test_add_option_leaves_original_untouched() {
        let config = Configuration::default();
        let with_list = config.add_option(EvaluationOption::AsPathList);
        assert!(with_list.contains_option(EvaluationOption::AsPathList));
        assert!(!config.contains_option(EvaluationOption::AsPathList));
    }

    #[test]
    fn test_builder_custom_registry() {
        let registry = Arc::new(FunctionRegistry::new());
        let config = Configuration::builder()
            .function_registry(registry)
            .options([
                EvaluationOption::SuppressExceptions,
                EvaluationOption::AlwaysReturnList,
            ])
            .build();
        assert!(!config.function_registry().contains("sum"));
        assert_eq!(config.options().len(), 2);
    }
}
