use amap_weather_core::{Config, WeatherResult, client_from_config};
use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "AMap weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the AMap API key (and an optional timeout) in the config file.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name or adcode, e.g. "济南" or "370100".
        city: String,

        /// "base" for live weather, "all" for the forecast.
        #[arg(long = "type", default_value = "base")]
        kind: String,

        /// Response format: "json" or "xml".
        #[arg(long, default_value = "json")]
        format: String,

        /// Request timeout in milliseconds; overrides the config file.
        #[arg(long)]
        timeout: Option<u64>,

        /// API key; overrides the config file.
        #[arg(long, env = "AMAP_WEATHER_KEY", hide_env_values = true)]
        key: Option<String>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, kind, format, timeout, key } => {
                show(&city, &kind, &format, timeout, key).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("AMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(key.trim().to_string());

    let timeout = CustomType::<u64>::new("Request timeout in milliseconds (leave empty for none):")
        .with_error_message("Please enter a whole number of milliseconds")
        .prompt_skippable()
        .context("Failed to read timeout")?;
    cfg.transport.timeout = timeout;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    city: &str,
    kind: &str,
    format: &str,
    timeout: Option<u64>,
    key: Option<String>,
) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    if let Some(key) = key {
        cfg.set_api_key(key);
    }
    if timeout.is_some() {
        cfg.transport.timeout = timeout;
    }

    let client = client_from_config(&cfg)?;
    debug!(endpoint = client.endpoint(), "Client ready");

    let result = client
        .get_weather(city, kind, format)
        .await
        .with_context(|| format!("Weather lookup for '{city}' failed"))?;

    match result {
        WeatherResult::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        WeatherResult::Raw(body) => println!("{body}"),
    }

    Ok(())
}
