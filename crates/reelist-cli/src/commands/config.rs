use super::context::AppContext;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use dialoguer::Password;
use reelist_config::{CredentialStore, TMDB_API_KEY_ENV};
use serde_json::json;

pub async fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::Path => show_paths(ctx, output),
        ConfigCommands::Tmdb { api_key } => configure_tmdb(ctx, api_key, output),
    }
}

fn api_key_display(ctx: &AppContext, full: bool) -> Result<String> {
    let key = ctx.credentials()?.resolve_tmdb_api_key();
    Ok(match key {
        Some(key) if full => key,
        Some(key) => CredentialStore::mask(&key),
        None => "not configured".to_string(),
    })
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let api_key = api_key_display(ctx, full)?;
    let store_dir = config.store_dir(ctx.paths.store_dir());

    if !output.is_human() {
        output.json(&json!({
            "config_file": ctx.paths.config_file(),
            "tmdb": {
                "api_base_url": config.tmdb.api_base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
                "timeout_seconds": config.tmdb.timeout_seconds,
                "trending_window": config.tmdb.trending_window.to_string(),
                "api_key": api_key,
            },
            "storage": {
                "collection": config.storage.collection,
                "directory": store_dir,
            },
        }));
        return Ok(());
    }

    if !ctx.paths.config_file().exists() {
        output.info(format!(
            "No config file at {}; using defaults",
            ctx.paths.config_file().display()
        ));
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Configuration").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![Cell::new("API base URL"), Cell::new(&config.tmdb.api_base_url)]);
    table.add_row(vec![Cell::new("Image base URL"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
    table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.tmdb.timeout_seconds))]);
    table.add_row(vec![Cell::new("Trending window"), Cell::new(config.tmdb.trending_window)]);
    table.add_row(vec![Cell::new("TMDB API key"), Cell::new(api_key)]);
    table.add_row(vec![Cell::new("Collection"), Cell::new(&config.storage.collection)]);
    table.add_row(vec![Cell::new("Snapshot directory"), Cell::new(store_dir.display())]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.block(table);
    Ok(())
}

fn show_paths(ctx: &AppContext, output: &Output) -> Result<()> {
    let store_dir = ctx.config.store_dir(ctx.paths.store_dir());
    let snapshot = store_dir.join(format!("{}.json", ctx.config.storage.collection));
    if output.is_human() {
        output.info(format!("Config:      {}", ctx.paths.config_file().display()));
        output.info(format!("Credentials: {}", ctx.paths.credentials_file().display()));
        output.info(format!("Data:        {}", ctx.paths.data_dir().display()));
        output.info(format!("Watchlist:   {}", snapshot.display()));
    } else {
        output.json(&json!({
            "config": ctx.paths.config_file(),
            "credentials": ctx.paths.credentials_file(),
            "data": ctx.paths.data_dir(),
            "watchlist": snapshot,
        }));
    }
    Ok(())
}

fn configure_tmdb(ctx: &AppContext, api_key: Option<String>, output: &Output) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => Password::new()
            .with_prompt("TMDB API key")
            .interact()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read API key: {}", e))?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }

    let mut credentials = ctx.credentials()?;
    credentials.set_tmdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "TMDB API key saved to {}",
        ctx.paths.credentials_file().display()
    ));
    if std::env::var(TMDB_API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", TMDB_API_KEY_ENV));
    }
    Ok(())
}
