//! [`PluginManager`]: the `plugins` table is the source of truth for what is installed and
//! enabled; the in-memory table holds the live instances and the command → plugin map.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use storage::{Database, NewPlugin, PluginRecord};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use super::manifest::load_manifests;
use super::registry::{builtin_path, PluginInit, PluginRegistry, PluginServices};
use super::{Plugin, PluginCommand, PluginContext, PluginError};

/// Commands owned by the bot core; plugins cannot claim them.
pub const RESERVED_COMMANDS: &[&str] = &["start", "status", "help"];

/// A loaded plugin as shown to users and the admin panel.
#[derive(Debug, Clone, Serialize)]
pub struct ActivePlugin {
    pub name: String,
    pub version: String,
    pub description: String,
    pub commands: Vec<PluginCommand>,
}

/// A `plugins` row plus whether an instance is currently loaded.
#[derive(Debug, Clone, Serialize)]
pub struct PluginStatus {
    #[serde(flatten)]
    pub record: PluginRecord,
    pub loaded: bool,
}

#[derive(Default)]
struct PluginTable {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
    /// Load order; earlier plugins win command conflicts.
    order: Vec<String>,
    /// command → (plugin name, description)
    commands: BTreeMap<String, (String, String)>,
}

impl PluginTable {
    fn insert(&mut self, name: &str, plugin: Arc<dyn Plugin>) {
        self.remove(name);
        self.plugins.insert(name.to_string(), plugin);
        self.order.push(name.to_string());
        self.rebuild_commands();
    }

    fn remove(&mut self, name: &str) -> bool {
        let removed = self.plugins.remove(name).is_some();
        self.order.retain(|n| n != name);
        if removed {
            self.rebuild_commands();
        }
        removed
    }

    fn rebuild_commands(&mut self) {
        self.commands.clear();
        for name in &self.order {
            let Some(plugin) = self.plugins.get(name) else {
                continue;
            };
            for cmd in plugin.commands() {
                let command = cmd.command.to_ascii_lowercase();
                if RESERVED_COMMANDS.contains(&command.as_str()) {
                    warn!(plugin = %name, command = %command, "Plugin tried to claim a core command, ignored");
                    continue;
                }
                match self.commands.get(&command) {
                    Some((owner, _)) => {
                        warn!(plugin = %name, owner = %owner, command = %command, "Command already claimed, ignored");
                    }
                    None => {
                        self.commands
                            .insert(command, (name.clone(), cmd.description.clone()));
                    }
                }
            }
        }
    }
}

pub struct PluginManager {
    db: Database,
    registry: PluginRegistry,
    services: PluginServices,
    plugin_dir: Option<PathBuf>,
    table: RwLock<PluginTable>,
}

impl PluginManager {
    pub fn new(
        db: Database,
        registry: PluginRegistry,
        services: PluginServices,
        plugin_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            db,
            registry,
            services,
            plugin_dir,
            table: RwLock::new(PluginTable::default()),
        }
    }

    /// Loads every enabled row, then discovers plugins not yet installed.
    /// Returns the number of plugins loaded afterwards.
    #[instrument(skip(self))]
    pub async fn load_all_plugins(&self) -> Result<usize, PluginError> {
        for record in self.db.plugins().list_enabled().await? {
            if let Err(e) = self.load_plugin(&record).await {
                error!(plugin = %record.name, error = %e, "Failed to load plugin, skipped");
            }
        }

        let discovered = self.discover_new_plugins().await?;
        let loaded = self.table.read().await.plugins.len();
        info!(loaded = loaded, discovered = discovered.len(), "Plugins loaded");
        Ok(loaded)
    }

    /// Instantiates the plugin described by `record` and registers its commands.
    /// Replaces an already loaded instance of the same name.
    pub async fn load_plugin(&self, record: &PluginRecord) -> Result<(), PluginError> {
        let init = PluginInit {
            name: record.name.clone(),
            config: record.config_json(),
            services: self.services.clone(),
        };
        let plugin = self.registry.create(&record.module_path, init)?;

        if plugin.version() != record.version {
            self.db
                .plugins()
                .set_version(&record.name, plugin.version())
                .await?;
        }

        info!(
            plugin = %record.name,
            version = %plugin.version(),
            commands = plugin.commands().len(),
            "Plugin loaded"
        );
        self.table.write().await.insert(&record.name, plugin);
        Ok(())
    }

    /// Inserts built-ins and manifests that have no `plugins` row yet, loading the enabled
    /// ones. Returns the names of newly installed plugins.
    #[instrument(skip(self))]
    pub async fn discover_new_plugins(&self) -> Result<Vec<String>, PluginError> {
        let mut candidates: Vec<(NewPlugin, String)> = self
            .registry
            .builtins()
            .iter()
            .map(|name| {
                (
                    NewPlugin {
                        name: name.clone(),
                        version: "1.0.0".to_string(),
                        enabled: true,
                        module_path: builtin_path(name),
                        config: None,
                    },
                    "builtin".to_string(),
                )
            })
            .collect();

        if let Some(ref dir) = self.plugin_dir {
            for manifest in load_manifests(dir).await {
                if !self.registry.contains(&manifest.factory) {
                    warn!(plugin = %manifest.name, factory = %manifest.factory, "Manifest references unknown factory, skipped");
                    continue;
                }
                let config = manifest.config_json();
                candidates.push((
                    NewPlugin {
                        name: manifest.name.clone(),
                        version: manifest.version.clone().unwrap_or_else(|| "1.0.0".to_string()),
                        enabled: manifest.enabled,
                        module_path: manifest.factory.clone(),
                        config,
                    },
                    "manifest".to_string(),
                ));
            }
        }

        let repo = self.db.plugins();
        let mut discovered = Vec::new();
        for (plugin, source) in candidates {
            if repo.find_by_name(&plugin.name).await?.is_some() {
                continue;
            }
            let record = repo.insert(&plugin).await?;
            info!(plugin = %record.name, source = %source, "Discovered new plugin");
            if record.enabled {
                if let Err(e) = self.load_plugin(&record).await {
                    error!(plugin = %record.name, error = %e, "Failed to load discovered plugin");
                }
            }
            discovered.push(record.name);
        }
        Ok(discovered)
    }

    /// Drops the live instance and builds a fresh one from the current row.
    #[instrument(skip(self))]
    pub async fn reload_plugin(&self, name: &str) -> Result<(), PluginError> {
        let record = self.find(name).await?;
        if !record.enabled {
            return Err(PluginError::Disabled(name.to_string()));
        }
        self.table.write().await.remove(name);
        self.load_plugin(&record).await?;
        info!(plugin = %name, "Plugin reloaded");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn enable_plugin(&self, name: &str) -> Result<(), PluginError> {
        if !self.db.plugins().set_enabled(name, true).await? {
            return Err(PluginError::NotFound(name.to_string()));
        }
        if !self.is_loaded(name).await {
            let record = self.find(name).await?;
            self.load_plugin(&record).await?;
        }
        info!(plugin = %name, "Plugin enabled");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn disable_plugin(&self, name: &str) -> Result<(), PluginError> {
        if !self.db.plugins().set_enabled(name, false).await? {
            return Err(PluginError::NotFound(name.to_string()));
        }
        self.table.write().await.remove(name);
        info!(plugin = %name, "Plugin disabled");
        Ok(())
    }

    /// Flips the enabled flag; returns the new state.
    pub async fn toggle_plugin(&self, name: &str) -> Result<bool, PluginError> {
        let record = self.find(name).await?;
        if record.enabled {
            self.disable_plugin(name).await?;
        } else {
            self.enable_plugin(name).await?;
        }
        Ok(!record.enabled)
    }

    /// Drops every live instance and loads again from the table (after a code update).
    pub async fn reload_all(&self) -> Result<usize, PluginError> {
        *self.table.write().await = PluginTable::default();
        self.load_all_plugins().await
    }

    pub async fn is_loaded(&self, name: &str) -> bool {
        self.table.read().await.plugins.contains_key(name)
    }

    pub async fn get_active_plugins(&self) -> Vec<ActivePlugin> {
        let table = self.table.read().await;
        table
            .plugins
            .iter()
            .map(|(name, plugin)| ActivePlugin {
                name: name.clone(),
                version: plugin.version().to_string(),
                description: plugin.description().to_string(),
                commands: plugin.commands(),
            })
            .collect()
    }

    /// Every claimed command, sorted.
    pub async fn get_plugin_commands(&self) -> Vec<PluginCommand> {
        let table = self.table.read().await;
        table
            .commands
            .iter()
            .map(|(command, (_, description))| PluginCommand {
                command: command.clone(),
                description: description.clone(),
            })
            .collect()
    }

    /// All `plugins` rows with their loaded state, for the admin panel and CLI.
    pub async fn list_plugins(&self) -> Result<Vec<PluginStatus>, PluginError> {
        let records = self.db.plugins().list().await?;
        let table = self.table.read().await;
        Ok(records
            .into_iter()
            .map(|record| {
                let loaded = table.plugins.contains_key(&record.name);
                PluginStatus { record, loaded }
            })
            .collect())
    }

    /// Runs `command` on the plugin that claimed it. `Ok(None)` when no plugin claims it.
    pub async fn dispatch(
        &self,
        command: &str,
        ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError> {
        let command = command.to_ascii_lowercase();
        let plugin = {
            let table = self.table.read().await;
            match table.commands.get(&command) {
                Some((owner, _)) => table.plugins.get(owner).cloned(),
                None => None,
            }
        };
        let Some(plugin) = plugin else {
            return Ok(None);
        };

        info!(plugin = %plugin.name(), command = %command, user_id = ctx.user.id, "Dispatching plugin command");
        plugin.execute(&command, ctx).await
    }

    async fn find(&self, name: &str) -> Result<PluginRecord, PluginError> {
        self.db
            .plugins()
            .find_by_name(name)
            .await?
            .ok_or_else(|| PluginError::NotFound(name.to_string()))
    }
}
