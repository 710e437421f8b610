//! Karmabot - Main Entry Point
//!
//! A Telegram group bot that tracks peer-granted karma and serves
//! daily restaurant menus.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use karmabot::commands::{CommandRouter, PageMenu, Restaurant};
use karmabot::config::{BotSettings, RestaurantConfig};
use karmabot::fetch::PageFetcher;
use karmabot::storage::SqliteUserStore;
use karmabot::telegram::{BotApiClient, Messenger};

/// Telegram group bot for karma tracking and daily menus.
#[derive(Parser, Debug)]
#[command(name = "karmabot")]
#[command(about = "Track peer-granted karma and serve daily restaurant menus")]
#[command(version)]
struct Args {
    /// Path to the restaurants JSON file (overrides RESTAURANTS_PATH).
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Generate an example restaurants file and exit.
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if args.generate_config {
        return generate_example_config();
    }

    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let mut settings = BotSettings::from_env().context("Failed to load settings from environment")?;
    if let Some(config) = args.config {
        settings.restaurants_path = config.into();
    }

    let restaurant_config = RestaurantConfig::load_from_file(&settings.restaurants_path)
        .context("Failed to load restaurants configuration")?;
    restaurant_config
        .validate()
        .context("Restaurant configuration validation failed")?;

    info!("Loaded {} restaurant(s)", restaurant_config.len());

    let store = SqliteUserStore::connect(&settings.database_path)
        .await
        .context("Failed to open user database")?;

    let fetcher = PageFetcher::new().context("Failed to build page fetcher")?;

    let restaurants: HashMap<String, Box<dyn Restaurant>> = restaurant_config
        .restaurants
        .into_iter()
        .map(|entry| {
            let menu: Box<dyn Restaurant> = Box::new(PageMenu::new(entry.url, fetcher.clone()));
            (entry.name, menu)
        })
        .collect();

    let client = Arc::new(
        BotApiClient::new(&settings.bot_token, settings.poll_timeout_secs)
            .context("Failed to build Bot API client")?,
    );

    let router = CommandRouter::new(
        Arc::new(store),
        Arc::clone(&client) as Arc<dyn Messenger>,
        restaurants,
        settings.karma_update_delay_mins,
    );

    info!(
        "Starting karmabot (karma delay: {} min)...",
        settings.karma_update_delay_mins
    );
    info!("Bot is running. Use Ctrl+C to stop.");

    run_poll_loop(&client, &router).await;

    info!("Shutting down...");
    Ok(())
}

/// Long-polls for updates and feeds messages to the router until
/// Ctrl+C.
async fn run_poll_loop(client: &BotApiClient, router: &CommandRouter) {
    let mut offset = 0;

    loop {
        let updates = tokio::select! {
            updates = client.get_updates(offset) => updates,
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                return;
            }
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                warn!("Failed to fetch updates: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            if let Some(message) = update.message {
                router.handle(&message).await;
            }
        }
    }
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example restaurants file.
fn generate_example_config() -> Result<()> {
    let example = RestaurantConfig::example();
    example.save_to_file("restaurants.example.json")?;

    println!("✓ Example configuration written to: restaurants.example.json");
    println!("\nTo use this bot:");
    println!("1. Copy restaurants.example.json to restaurants.json");
    println!("2. Point each entry at a real menu page");
    println!("3. Create a .env file with BOT_TOKEN");
    println!("4. Run: karmabot");

    Ok(())
}
