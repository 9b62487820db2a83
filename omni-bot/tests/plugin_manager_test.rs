//! Integration tests for [`PluginManager`]: discovery of built-ins and manifests, toggling,
//! command claims, and the example plugin against a mockito HTTP server.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use omni_bot::content::ContentEngine;
use omni_bot::plugins::{
    Plugin, PluginCommand, PluginContext, PluginError, PluginInit, PluginManager, PluginRegistry,
    PluginServices,
};
use omni_bot::{Chat, User};
use storage::Database;
use tempfile::TempDir;

mod common;
use common::memory_db;

/// Answers `/greet` with its configured greeting; also tries to claim `/start` and `/joke`.
struct Greeter {
    name: String,
    greeting: String,
}

#[async_trait]
impl Plugin for Greeter {
    fn name(&self) -> &str {
        &self.name
    }
    fn version(&self) -> &str {
        "0.1.0"
    }
    fn description(&self) -> &str {
        "Greets"
    }
    fn commands(&self) -> Vec<PluginCommand> {
        vec![
            PluginCommand::new("greet", "Say hello"),
            PluginCommand::new("start", "Hijack start"),
            PluginCommand::new("joke", "Hijack joke"),
        ]
    }
    async fn execute(
        &self,
        _command: &str,
        ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError> {
        Ok(Some(format!("{}, {}!", self.greeting, ctx.user.display_name())))
    }
}

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    registry.register("custom::greeter", |init: PluginInit| {
        let greeting = init
            .config
            .get("greeting")
            .and_then(|v| v.as_str())
            .unwrap_or("Hello")
            .to_string();
        Ok(Arc::new(Greeter {
            name: init.name,
            greeting,
        }) as Arc<dyn Plugin>)
    });
    registry
}

fn manager(db: &Database, plugin_dir: Option<&Path>) -> PluginManager {
    let services = PluginServices {
        db: db.clone(),
        content: Arc::new(ContentEngine::with_seed(3)),
        http: reqwest::Client::new(),
    };
    PluginManager::new(db.clone(), registry(), services, plugin_dir.map(Path::to_path_buf))
}

fn ctx(args: &[&str]) -> PluginContext {
    PluginContext {
        user: User {
            id: 1,
            username: Some("ann".to_string()),
            first_name: None,
            last_name: None,
        },
        chat: Chat {
            id: 1,
            chat_type: "private".to_string(),
        },
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

fn write_manifest(dir: &Path, file: &str, body: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(file), body).unwrap();
}

/// **Test: Built-ins are installed once and their versions come from the plugin.**
#[tokio::test]
async fn test_builtins_discovered_once() {
    let db = memory_db().await;
    let plugins = manager(&db, None);

    assert_eq!(plugins.load_all_plugins().await.unwrap(), 3);
    assert_eq!(plugins.load_all_plugins().await.unwrap(), 3);
    assert_eq!(db.plugins().count().await.unwrap(), 3);

    let example = db.plugins().find_by_name("example").await.unwrap().unwrap();
    assert_eq!(example.version, "1.0.1");
    assert_eq!(example.module_path, "builtin::example");
}

/// **Test: Manifests install named instances; unknown factories and bad files are skipped.**
#[tokio::test]
async fn test_manifest_discovery() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        tmp.path(),
        "a_greeter.toml",
        "name = \"greeter\"\nfactory = \"custom::greeter\"\n\n[config]\ngreeting = \"Ahoy\"\n",
    );
    write_manifest(
        tmp.path(),
        "b_unknown.toml",
        "name = \"ghost\"\nfactory = \"custom::missing\"\n",
    );
    write_manifest(tmp.path(), "c_broken.toml", "name = ");
    write_manifest(
        tmp.path(),
        "d_off.toml",
        "name = \"quiet\"\nfactory = \"custom::greeter\"\nenabled = false\n",
    );

    let db = memory_db().await;
    let plugins = manager(&db, Some(tmp.path()));
    plugins.load_all_plugins().await.unwrap();

    assert!(plugins.is_loaded("greeter").await);
    assert!(!plugins.is_loaded("quiet").await);
    assert!(db.plugins().find_by_name("ghost").await.unwrap().is_none());
    assert!(!db.plugins().find_by_name("quiet").await.unwrap().unwrap().enabled);

    let reply = plugins.dispatch("greet", &ctx(&[])).await.unwrap();
    assert_eq!(reply.as_deref(), Some("Ahoy, ann!"));
}

/// **Test: Core commands cannot be claimed and the first loaded plugin wins conflicts.**
#[tokio::test]
async fn test_command_claims() {
    let tmp = TempDir::new().unwrap();
    write_manifest(
        tmp.path(),
        "greeter.toml",
        "name = \"greeter\"\nfactory = \"custom::greeter\"\n",
    );
    let db = memory_db().await;
    let plugins = manager(&db, Some(tmp.path()));
    plugins.load_all_plugins().await.unwrap();

    let commands: Vec<String> = plugins
        .get_plugin_commands()
        .await
        .into_iter()
        .map(|c| c.command)
        .collect();
    assert!(commands.contains(&"greet".to_string()));
    assert!(!commands.contains(&"start".to_string()));
    assert_eq!(commands.iter().filter(|c| *c == "joke").count(), 1);

    assert!(plugins.dispatch("start", &ctx(&[])).await.unwrap().is_none());
    assert!(plugins.dispatch("nothing", &ctx(&[])).await.unwrap().is_none());
}

/// **Test: Toggle flips the row and the live command table.**
#[tokio::test]
async fn test_toggle_plugin() {
    let db = memory_db().await;
    let plugins = manager(&db, None);
    plugins.load_all_plugins().await.unwrap();

    assert!(!plugins.toggle_plugin("analytics").await.unwrap());
    assert!(!plugins.is_loaded("analytics").await);
    assert!(plugins.dispatch("metrics", &ctx(&[])).await.unwrap().is_none());
    assert_eq!(plugins.get_active_plugins().await.len(), 2);

    assert!(plugins.toggle_plugin("analytics").await.unwrap());
    assert!(plugins.is_loaded("analytics").await);
    let reply = plugins.dispatch("metrics", &ctx(&[])).await.unwrap().unwrap();
    assert!(reply.contains("Payments"), "unexpected reply: {}", reply);

    assert!(matches!(
        plugins.toggle_plugin("missing").await,
        Err(PluginError::NotFound(_))
    ));

    let statuses = plugins.list_plugins().await.unwrap();
    assert!(statuses.iter().all(|s| s.loaded == s.record.enabled));
}

/// **Test: A disabled plugin stays off across reload_all; reload_plugin refuses it.**
#[tokio::test]
async fn test_reload_keeps_disabled_plugins_off() {
    let db = memory_db().await;
    let plugins = manager(&db, None);
    plugins.load_all_plugins().await.unwrap();
    plugins.disable_plugin("example").await.unwrap();

    assert_eq!(plugins.reload_all().await.unwrap(), 2);
    assert!(!plugins.is_loaded("example").await);
    assert!(matches!(
        plugins.reload_plugin("example").await,
        Err(PluginError::Disabled(_))
    ));
    plugins.reload_plugin("analytics").await.unwrap();
    assert!(plugins.is_loaded("analytics").await);
}

/// Manager whose `example` instance talks to `base_url`, configured through a manifest.
async fn example_against(base_url: &str, tmp: &TempDir, weather_key: Option<&str>) -> PluginManager {
    let mut body = format!(
        "name = \"example_mock\"\nfactory = \"builtin::example\"\n\n[config]\n\
         joke_api_url = \"{0}/joke\"\nquote_api_url = \"{0}/quote\"\nweather_api_url = \"{0}/weather\"\n",
        base_url
    );
    if let Some(key) = weather_key {
        body.push_str(&format!("weather_api_key = \"{}\"\n", key));
    }
    write_manifest(tmp.path(), "example_mock.toml", &body);

    let db = memory_db().await;
    let plugins = manager(&db, Some(tmp.path()));
    plugins.load_all_plugins().await.unwrap();
    // The built-in instance owns the commands; drop it so the mock-backed one answers.
    plugins.disable_plugin("example").await.unwrap();
    plugins
}

/// **Test: /joke and /quote use the API response, and fall back when it fails.**
#[tokio::test]
async fn test_example_joke_and_quote() {
    let mut server = mockito::Server::new_async().await;
    let joke = server
        .mock("GET", "/joke")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"setup":"Why?","punchline":"Because."}"#)
        .create_async()
        .await;
    let quote = server
        .mock("GET", "/quote")
        .with_status(500)
        .create_async()
        .await;

    let tmp = TempDir::new().unwrap();
    let plugins = example_against(&server.url(), &tmp, None).await;

    let reply = plugins.dispatch("joke", &ctx(&[])).await.unwrap().unwrap();
    assert_eq!(reply, "😂 Random Joke:\n\nWhy?\n\nBecause.");

    let reply = plugins.dispatch("quote", &ctx(&[])).await.unwrap().unwrap();
    assert!(reply.starts_with("✨ Inspirational Quote:"));

    joke.assert_async().await;
    quote.assert_async().await;
}

/// **Test: /weather needs a key; with one it formats the API answer or reports a bad city.**
#[tokio::test]
async fn test_example_weather() {
    let mut server = mockito::Server::new_async().await;
    let london = server
        .mock("GET", "/weather")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("q".into(), "London".into()),
            mockito::Matcher::UrlEncoded("appid".into(), "k123".into()),
            mockito::Matcher::UrlEncoded("units".into(), "metric".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"name":"London","main":{"temp":12.5,"humidity":81},
                "weather":[{"description":"light rain"}],"sys":{"country":"GB"}}"#,
        )
        .create_async()
        .await;
    let missing = server
        .mock("GET", "/weather")
        .match_query(mockito::Matcher::UrlEncoded("q".into(), "Atlantis".into()))
        .with_status(404)
        .create_async()
        .await;

    let tmp = TempDir::new().unwrap();
    let plugins = example_against(&server.url(), &tmp, Some("k123")).await;

    let reply = plugins.dispatch("weather", &ctx(&["London"])).await.unwrap().unwrap();
    assert!(reply.contains("Weather in London, GB"));
    assert!(reply.contains("12.5°C"));
    assert!(reply.contains("light rain"));

    let reply = plugins.dispatch("weather", &ctx(&["Atlantis"])).await.unwrap().unwrap();
    assert_eq!(reply, "🤷 Sorry, couldn't get weather for 'Atlantis'");

    london.assert_async().await;
    missing.assert_async().await;

    let tmp = TempDir::new().unwrap();
    let plugins = example_against(&server.url(), &tmp, None).await;
    let reply = plugins.dispatch("weather", &ctx(&[])).await.unwrap().unwrap();
    assert!(reply.contains("temporarily unavailable"));
}
