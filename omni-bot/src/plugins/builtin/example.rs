//! Example plugin: `/joke`, `/quote`, `/weather [city]` from public APIs, with offline
//! fallbacks when a request fails.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::warn;

use crate::plugins::{Plugin, PluginCommand, PluginContext, PluginError, PluginInit};

const DEFAULT_JOKE_URL: &str = "https://official-joke-api.appspot.com/random_joke";
const DEFAULT_QUOTE_URL: &str = "https://api.quotable.io/random";
const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const FALLBACK_JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "Why did the bot go to therapy? It had too many bugs!",
    "How do you comfort a JavaScript bug? You console it!",
];

const FALLBACK_QUOTES: &[&str] = &[
    "\"The only way to do great work is to love what you do.\" — Steve Jobs",
    "\"Innovation distinguishes between a leader and a follower.\" — Steve Jobs",
    "\"The future belongs to those who believe in the beauty of their dreams.\" — Eleanor Roosevelt",
];

#[derive(Deserialize)]
struct Joke {
    setup: String,
    punchline: String,
}

#[derive(Deserialize)]
struct Quote {
    content: String,
    author: String,
}

#[derive(Deserialize)]
struct Weather {
    name: String,
    main: WeatherMain,
    weather: Vec<WeatherDescription>,
    sys: WeatherSys,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct WeatherDescription {
    description: String,
}

#[derive(Deserialize)]
struct WeatherSys {
    country: String,
}

pub struct ExamplePlugin {
    name: String,
    http: reqwest::Client,
    joke_url: String,
    quote_url: String,
    weather_url: String,
    weather_api_key: Option<String>,
}

impl ExamplePlugin {
    pub fn new(init: PluginInit) -> Self {
        Self {
            joke_url: init
                .config_str("joke_api_url", "JOKE_API_URL")
                .unwrap_or_else(|| DEFAULT_JOKE_URL.to_string()),
            quote_url: init
                .config_str("quote_api_url", "QUOTE_API_URL")
                .unwrap_or_else(|| DEFAULT_QUOTE_URL.to_string()),
            weather_url: init
                .config_str("weather_api_url", "WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            weather_api_key: init.config_str("weather_api_key", "WEATHER_API_KEY"),
            http: init.services.http,
            name: init.name,
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> reqwest::Result<T> {
        request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }

    async fn joke(&self) -> String {
        match self.fetch::<Joke>(self.http.get(&self.joke_url)).await {
            Ok(joke) => format!("😂 Random Joke:\n\n{}\n\n{}", joke.setup, joke.punchline),
            Err(e) => {
                warn!(error = %e, "Joke API failed, using fallback");
                format!("😂 Fallback Joke:\n\n{}", pick(FALLBACK_JOKES))
            }
        }
    }

    async fn quote(&self) -> String {
        match self.fetch::<Quote>(self.http.get(&self.quote_url)).await {
            Ok(quote) => format!(
                "✨ Inspirational Quote:\n\n\"{}\"\n\n— {}",
                quote.content, quote.author
            ),
            Err(e) => {
                warn!(error = %e, "Quote API failed, using fallback");
                format!("✨ Inspirational Quote:\n\n{}", pick(FALLBACK_QUOTES))
            }
        }
    }

    async fn weather(&self, args: &[String]) -> String {
        let location = if args.is_empty() {
            "New York".to_string()
        } else {
            args.join(" ")
        };
        let unavailable = "☁️ Weather service temporarily unavailable.\n\n\
            Usage: /weather [city name]\nExample: /weather London"
            .to_string();

        let Some(ref api_key) = self.weather_api_key else {
            return unavailable;
        };

        let request = self.http.get(&self.weather_url).query(&[
            ("q", location.as_str()),
            ("appid", api_key.as_str()),
            ("units", "metric"),
        ]);
        match self.fetch::<Weather>(request).await {
            Ok(w) => {
                let conditions = w
                    .weather
                    .first()
                    .map(|d| d.description.clone())
                    .unwrap_or_default();
                format!(
                    "🌤️ Weather in {}, {}:\n\n🌡️ Temperature: {}°C\n📝 Conditions: {}\n💨 Humidity: {}%",
                    w.name, w.sys.country, w.main.temp, conditions, w.main.humidity
                )
            }
            Err(e) if e.status().is_some() => {
                format!("🤷 Sorry, couldn't get weather for '{}'", location)
            }
            Err(e) => {
                warn!(error = %e, "Weather API failed");
                unavailable
            }
        }
    }
}

fn pick(options: &[&str]) -> String {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Plugin for ExamplePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "1.0.1"
    }

    fn description(&self) -> &str {
        "Example plugin with various commands"
    }

    fn commands(&self) -> Vec<PluginCommand> {
        vec![
            PluginCommand::new("joke", "Get a random joke"),
            PluginCommand::new("quote", "Get an inspirational quote"),
            PluginCommand::new("weather", "Get weather information"),
        ]
    }

    async fn execute(
        &self,
        command: &str,
        ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError> {
        let reply = match command {
            "joke" => self.joke().await,
            "quote" => self.quote().await,
            "weather" => self.weather(&ctx.args).await,
            other => return Err(PluginError::Execution(format!("unknown command {}", other))),
        };
        Ok(Some(reply))
    }
}
