//! Named plugin factories. A plugin row's `module_path` is the key a factory is looked up by.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use storage::Database;

use super::{Plugin, PluginError};
use crate::content::ContentEngine;

/// Module path prefix of the plugins compiled into this binary.
pub const BUILTIN_PREFIX: &str = "builtin::";

/// Shared services plugins may use.
#[derive(Clone)]
pub struct PluginServices {
    pub db: Database,
    pub content: Arc<ContentEngine>,
    pub http: reqwest::Client,
}

/// Everything a factory needs to build one named instance.
#[derive(Clone)]
pub struct PluginInit {
    pub name: String,
    /// The row's (or manifest's) JSON config; an empty object when unset.
    pub config: JsonValue,
    pub services: PluginServices,
}

impl PluginInit {
    /// String config value, falling back to the given env var.
    pub fn config_str(&self, key: &str, env_var: &str) -> Option<String> {
        self.config
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| crate::config::env_opt(env_var))
    }
}

pub type PluginFactory =
    Arc<dyn Fn(PluginInit) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, PluginFactory>,
    /// Built-in plugin names, discovered automatically.
    builtins: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in plugin.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::register_builtins(&mut registry);
        registry
    }

    /// Registers a factory under an arbitrary module path (e.g. `custom::greeter`).
    pub fn register<F>(&mut self, module_path: &str, factory: F)
    where
        F: Fn(PluginInit) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.factories
            .insert(module_path.to_string(), Arc::new(factory));
    }

    /// Registers `builtin::<name>` and marks it for automatic discovery.
    pub fn register_builtin<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(PluginInit) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.register(&builtin_path(name), factory);
        if !self.builtins.iter().any(|n| n == name) {
            self.builtins.push(name.to_string());
        }
    }

    pub fn contains(&self, module_path: &str) -> bool {
        self.factories.contains_key(module_path)
    }

    pub fn builtins(&self) -> &[String] {
        &self.builtins
    }

    pub fn create(
        &self,
        module_path: &str,
        init: PluginInit,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let factory = self
            .factories
            .get(module_path)
            .ok_or_else(|| PluginError::UnknownFactory(module_path.to_string()))?;
        factory(init)
    }
}

pub fn builtin_path(name: &str) -> String {
    format!("{}{}", BUILTIN_PREFIX, name)
}
