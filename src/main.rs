mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use contextos::api::today_local;
use contextos::logging::init_logging;
use contextos::{
    ApiClient, AppConfig, Backend, KeyValueStore, MemoryStore, SettingsResolver, SettingsUpdate,
    SqliteStore,
};
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let _logger = init_logging(&config.log_spec, cli.verbose)?;

    let store: Arc<dyn KeyValueStore> = match SqliteStore::open(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!(
                "local storage at {} unavailable ({}), settings will not persist",
                config.db_path.display(),
                e
            );
            Arc::new(MemoryStore::new())
        }
    };
    let backend = Backend::new().context("Failed to build HTTP client")?;
    let resolver = SettingsResolver::new(store, backend, config.default_server_url.clone());
    let api = ApiClient::new(Arc::new(resolver));
    let settings = api.settings();

    match cli.command {
        Some(Commands::Capture { content }) => {
            let result = api.capture_context(&content).await;
            print_json(&result)?;
        }
        Some(Commands::Plan { date }) => {
            let date = date.unwrap_or_else(today_local);
            print_or_missing(&api.get_daily_plan(&date).await, "Daily plan")?;
        }
        Some(Commands::Today) | None => {
            print_or_missing(&api.get_today_plan().await, "Today's plan")?;
        }
        Some(Commands::Generate { date }) => {
            let date = date.unwrap_or_else(today_local);
            print_or_missing(&api.generate_daily_plan(&date).await, "Generated plan")?;
        }
        Some(Commands::Dates) => {
            print_or_missing(&api.get_available_dates().await, "Available dates")?;
        }
        Some(Commands::GenerateMissing) => {
            print_or_missing(&api.generate_missing_plans().await, "Generated plans")?;
        }
        Some(Commands::Toggle { task_id, date, undo }) => {
            let date = date.unwrap_or_else(today_local);
            let plan = api.toggle_task_completion(&task_id, !undo, &date).await;
            if let Some(plan) = &plan {
                let (done, total) = plan.progress();
                println!("{}/{} tasks completed", done, total);
            }
            print_or_missing(&plan, "Updated plan")?;
        }
        Some(Commands::Settings) => {
            let loaded = settings.load_settings().await;
            print_json(&loaded)?;
        }
        Some(Commands::SetSettings {
            server_url,
            together_key,
            groq_key,
        }) => {
            let update = SettingsUpdate {
                together_api_key: together_key,
                groq_api_key: groq_key,
                server_url,
            };
            let saved = settings
                .save_settings(update)
                .await
                .context("Failed to save settings")?;
            print_json(&saved)?;
        }
        Some(Commands::ServerUrl) => {
            println!("{}", settings.resolve_server_url());
        }
        Some(Commands::ResetServerUrl) => {
            settings.reset_server_url();
            println!("Server URL reset to {}", settings.default_url());
        }
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "contextos", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_or_missing<T: Serialize>(value: &Option<T>, what: &str) -> Result<()> {
    match value {
        Some(value) => print_json(value),
        None => {
            println!("{} not available (see log for details)", what);
            Ok(())
        }
    }
}
