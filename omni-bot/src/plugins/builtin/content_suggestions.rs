//! `/suggest [goal]` and `/optimize <text>` on top of the content engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::content::{ContentEngine, SuggestionRequest};
use crate::plugins::{Plugin, PluginCommand, PluginContext, PluginError, PluginInit};

const GOALS: &[&str] = &[
    "lead_generation",
    "sales_conversion",
    "brand_awareness",
    "engagement",
    "retargeting",
];

pub struct ContentSuggestionsPlugin {
    name: String,
    engine: Arc<ContentEngine>,
    target_audience: String,
}

impl ContentSuggestionsPlugin {
    pub fn new(init: PluginInit) -> Self {
        Self {
            target_audience: init
                .config
                .get("target_audience")
                .and_then(|v| v.as_str())
                .unwrap_or("entrepreneurs")
                .to_string(),
            engine: init.services.content,
            name: init.name,
        }
    }

    fn suggest(&self, args: &[String]) -> String {
        let goal = args
            .first()
            .map(|g| g.to_ascii_lowercase())
            .unwrap_or_else(|| "lead_generation".to_string());
        if !GOALS.contains(&goal.as_str()) {
            return format!("Unknown goal '{}'. Try one of: {}", goal, GOALS.join(", "));
        }

        let request = SuggestionRequest {
            campaign_goal: goal.clone(),
            target_audience: self.target_audience.clone(),
            count: 1,
            ..SuggestionRequest::default()
        };
        let Some(s) = self.engine.suggestions(&request).into_iter().next() else {
            return "No suggestion available right now.".to_string();
        };

        format!(
            "💡 Content idea ({}):\n\n{}\n\n📊 Engagement score: {}\n📱 Platforms: {}\n🏷️ {}\n👉 {}",
            goal,
            s.generated_content,
            s.predicted_performance.engagement_score,
            s.target_platforms.join(", "),
            s.hashtags.join(" "),
            s.call_to_action
        )
    }

    fn optimize(&self, args: &[String]) -> String {
        let text = args.join(" ");
        match self.engine.optimize(&text, "social_media", "engagement") {
            Ok(report) => {
                let mut out = format!("🛠️ Optimization score: {}\n", report.optimization_score);
                for hint in &report.suggestions {
                    out.push_str(&format!("• {} ({})\n", hint.suggestion, hint.impact));
                }
                for version in &report.optimized_versions {
                    out.push_str(&format!(
                        "\nVersion {} ({}):\n{}\n",
                        version.version, version.predicted_improvement, version.content
                    ));
                }
                out
            }
            Err(_) => "Usage: /optimize <your post text>".to_string(),
        }
    }
}

#[async_trait]
impl Plugin for ContentSuggestionsPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "Marketing content suggestions and optimization"
    }

    fn commands(&self) -> Vec<PluginCommand> {
        vec![
            PluginCommand::new("suggest", "Get a content idea for a campaign goal"),
            PluginCommand::new("optimize", "Get optimization tips for a post"),
        ]
    }

    async fn execute(
        &self,
        command: &str,
        ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError> {
        match command {
            "suggest" => Ok(Some(self.suggest(&ctx.args))),
            "optimize" => Ok(Some(self.optimize(&ctx.args))),
            other => Err(PluginError::Execution(format!("unknown command {}", other))),
        }
    }
}
