mod achievements;
mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use momentum_channels::telegram::TelegramChannel;
use momentum_core::config;
use momentum_store::Store;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "momentum",
    version,
    about = "Momentum — personal productivity assistant"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the assistant.
    Start,
    /// Check configuration and channel state.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.assistant.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            // Build channels.
            let mut channels: HashMap<String, Arc<dyn momentum_core::traits::Channel>> =
                HashMap::new();

            if let Some(ref tg) = cfg.channel.telegram {
                if tg.enabled {
                    if tg.bot_token.is_empty() {
                        anyhow::bail!(
                            "Telegram is enabled but bot_token is empty. Set it in config.toml."
                        );
                    }
                    let channel = TelegramChannel::new(tg.clone());
                    channels.insert("telegram".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            let store = Store::new(&cfg.store).await?;

            println!("⚡ {} — starting...", cfg.assistant.name);
            let gw = gateway::Gateway::new(channels, store, cfg.admin.clone());
            gw.run().await?;
        }
        Commands::Status => {
            println!("⚡ {} — status check\n", cfg.assistant.name);
            println!("Config: {}", cli.config);
            println!("Database: {}", cfg.store.db_path);

            if let Some(ref tg) = cfg.channel.telegram {
                println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                );
            } else {
                println!("  telegram: not configured");
            }

            println!(
                "  admins: {}",
                if cfg.admin.user_ids.is_empty() {
                    "none".to_string()
                } else {
                    cfg.admin.user_ids.len().to_string()
                }
            );
        }
    }

    Ok(())
}
