//! Plugins compiled into the binary.

mod analytics;
mod content_suggestions;
mod example;

use std::sync::Arc;

pub use analytics::AnalyticsPlugin;
pub use content_suggestions::ContentSuggestionsPlugin;
pub use example::ExamplePlugin;

use super::{Plugin, PluginRegistry};

/// Registers `builtin::example`, `builtin::content_suggestions` and `builtin::analytics`.
pub fn register_builtins(registry: &mut PluginRegistry) {
    registry.register_builtin("example", |init| {
        Ok(Arc::new(ExamplePlugin::new(init)) as Arc<dyn Plugin>)
    });
    registry.register_builtin("content_suggestions", |init| {
        Ok(Arc::new(ContentSuggestionsPlugin::new(init)) as Arc<dyn Plugin>)
    });
    registry.register_builtin("analytics", |init| {
        Ok(Arc::new(AnalyticsPlugin::new(init)) as Arc<dyn Plugin>)
    });
}
