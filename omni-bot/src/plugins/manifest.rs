//! Plugin manifests: `*.toml` files in the plugin directory that install extra named
//! instances of registered factories.
//!
//! ```toml
//! name = "weather_eu"
//! factory = "builtin::example"
//! description = "Weather for European cities"
//! enabled = true
//!
//! [config]
//! weather_api_key = "..."
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use super::PluginError;

#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    /// Module path of a registered factory.
    pub factory: String,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub config: Option<toml::Table>,
}

fn default_enabled() -> bool {
    true
}

impl PluginManifest {
    pub fn parse(text: &str, path: &str) -> Result<Self, PluginError> {
        let manifest: PluginManifest = toml::from_str(text).map_err(|e| PluginError::Manifest {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        if manifest.name.trim().is_empty() {
            return Err(PluginError::Manifest {
                path: path.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        Ok(manifest)
    }

    /// The `[config]` table as JSON, if present.
    pub fn config_json(&self) -> Option<JsonValue> {
        self.config
            .as_ref()
            .and_then(|table| serde_json::to_value(table).ok())
    }
}

/// Reads every `*.toml` manifest in `dir`, sorted by file name. A missing directory yields
/// nothing; unreadable or invalid files are logged and skipped.
pub async fn load_manifests(dir: &Path) -> Vec<PluginManifest> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut paths = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    paths.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, dir = %dir.display(), "Failed to read plugin directory entry");
                break;
            }
        }
    }
    paths.sort();

    let mut manifests = Vec::new();
    for path in paths {
        let source = path.display().to_string();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, path = %source, "Failed to read plugin manifest");
                continue;
            }
        };
        match PluginManifest::parse(&text, &source) {
            Ok(manifest) => {
                info!(name = %manifest.name, factory = %manifest.factory, path = %source, "Found plugin manifest");
                manifests.push(manifest);
            }
            Err(e) => warn!(error = %e, "Skipping plugin manifest"),
        }
    }
    manifests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_with_config() {
        let manifest = PluginManifest::parse(
            r#"
            name = "weather_eu"
            factory = "builtin::example"

            [config]
            weather_api_key = "abc"
            "#,
            "weather_eu.toml",
        )
        .unwrap();

        assert!(manifest.enabled);
        assert!(manifest.version.is_none());
        assert_eq!(manifest.config_json().unwrap()["weather_api_key"], "abc");
    }

    #[test]
    fn test_parse_manifest_requires_factory() {
        assert!(PluginManifest::parse("name = \"x\"", "x.toml").is_err());
        assert!(PluginManifest::parse("name = \"\"\nfactory = \"builtin::example\"", "x.toml").is_err());
    }

    #[tokio::test]
    async fn test_load_manifests_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            "name = \"a\"\nfactory = \"builtin::example\"\nenabled = false\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b.toml"), "not toml at all [").unwrap();
        std::fs::write(dir.path().join("readme.md"), "ignored").unwrap();

        let manifests = load_manifests(dir.path()).await;

        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].name, "a");
        assert!(!manifests[0].enabled);
    }

    #[tokio::test]
    async fn test_load_manifests_missing_dir() {
        let manifests = load_manifests(Path::new("/nonexistent/plugins")).await;
        assert!(manifests.is_empty());
    }
}
