//! # Plugins
//!
//! A plugin contributes bot commands. Plugins are built from named factories in a
//! [`PluginRegistry`] (built-ins plus any registered by the embedding binary), optionally
//! configured by TOML manifests, and managed at runtime by [`PluginManager`].

mod builtin;
mod manager;
mod manifest;
mod registry;

pub use builtin::{register_builtins, AnalyticsPlugin, ContentSuggestionsPlugin, ExamplePlugin};
pub use manager::{ActivePlugin, PluginManager, PluginStatus, RESERVED_COMMANDS};
pub use manifest::{load_manifests, PluginManifest};
pub use registry::{PluginFactory, PluginInit, PluginRegistry, PluginServices, BUILTIN_PREFIX};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::core::{Chat, User};

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin not found: {0}")]
    NotFound(String),

    #[error("Unknown plugin factory: {0}")]
    UnknownFactory(String),

    #[error("Plugin is disabled: {0}")]
    Disabled(String),

    #[error("Plugin init failed: {0}")]
    Init(String),

    #[error("Plugin command failed: {0}")]
    Execution(String),

    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// A command a plugin answers, without the leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginCommand {
    pub command: String,
    pub description: String,
}

impl PluginCommand {
    pub fn new(command: &str, description: &str) -> Self {
        Self {
            command: command.to_string(),
            description: description.to_string(),
        }
    }
}

/// Invocation context handed to [`Plugin::execute`].
#[derive(Debug, Clone)]
pub struct PluginContext {
    pub user: User,
    pub chat: Chat,
    /// Whitespace-separated words after the command.
    pub args: Vec<String>,
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn description(&self) -> &str;
    fn commands(&self) -> Vec<PluginCommand>;

    /// Runs one of this plugin's commands. `Ok(None)` means nothing to reply.
    async fn execute(
        &self,
        command: &str,
        ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError>;
}
