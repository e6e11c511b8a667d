use super::context::AppContext;
use super::render;
use crate::output::Output;
use crate::WatchlistCommands;
use color_eyre::Result;
use dialoguer::Confirm;
use reelist_core::{DetailController, DetailState, StoreError, WatchlistController};
use reelist_models::MovieId;
use serde_json::json;

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    match cmd {
        WatchlistCommands::List => list(ctx, output).await,
        WatchlistCommands::Add { id } => add(ctx, id, output).await,
        WatchlistCommands::Remove { id } => remove(ctx, id, output).await,
        WatchlistCommands::Clear { yes } => clear(ctx, yes, output).await,
        WatchlistCommands::Verify => verify(ctx, output).await,
    }
}

fn store_error(e: StoreError) -> color_eyre::Report {
    if e.is_write_failure() {
        color_eyre::eyre::eyre!("Watchlist storage failed, nothing was changed: {}", e)
    } else {
        color_eyre::eyre::eyre!("Watchlist storage failed: {}", e)
    }
}

async fn list(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut screen = WatchlistController::new(ctx.store.clone());
    screen.on_visible().await.map_err(store_error)?;
    render_list(ctx, &screen, output);
    Ok(())
}

fn render_list(ctx: &AppContext, screen: &WatchlistController, output: &Output) {
    if !output.is_human() {
        output.json(&json!({ "count": screen.count(), "movies": screen.entries() }));
        return;
    }

    if screen.is_empty() {
        output.info("Your watchlist is empty");
        output.info("Add movies to watch them later: reelist watchlist add <id>");
        return;
    }

    output.block(render::heading("My Watchlist"));
    output.info(format!("{} movies", screen.count()));
    output.block(render::entries_table(screen.entries(), &ctx.images()));
}

async fn add(ctx: &AppContext, id: MovieId, output: &Output) -> Result<()> {
    let mut detail = DetailController::new(ctx.catalog()?, ctx.store.clone(), id);
    detail.open().await;

    match detail.state() {
        DetailState::NotFound => {
            return Err(color_eyre::eyre::eyre!("No movie with id {} in the catalog", id));
        }
        DetailState::Unavailable(reason) => {
            output.warn(format!("Movie {} is unavailable, nothing was added: {}", id, reason));
            return Ok(());
        }
        DetailState::Loading | DetailState::Loaded(_) => {}
    }

    let title = detail.record().map(|r| r.title.clone()).unwrap_or_default();
    if detail.in_watchlist() {
        output.info(format!("\"{}\" is already in your watchlist", title));
        return Ok(());
    }

    detail
        .toggle()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Could not add \"{}\": {}", title, e))?;
    output.success(format!("Added \"{}\" to your watchlist", title));
    Ok(())
}

async fn remove(ctx: &AppContext, id: MovieId, output: &Output) -> Result<()> {
    let mut screen = WatchlistController::new(ctx.store.clone());
    let removed = screen.remove(id).await.map_err(store_error)?;
    if removed {
        output.success(format!("Removed movie {} from your watchlist", id));
    } else {
        output.info(format!("Movie {} was not in your watchlist", id));
    }
    if screen.is_stale() {
        output.warn("Could not reload the watchlist; run `reelist watchlist list` to see it");
        return Ok(());
    }
    render_list(ctx, &screen, output);
    Ok(())
}

async fn clear(ctx: &AppContext, yes: bool, output: &Output) -> Result<()> {
    let count = ctx.store.len().await.map_err(store_error)?;
    if !yes && count > 0 {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} movies from your watchlist?", count))
            .default(false)
            .interact()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            output.info("Cancelled");
            return Ok(());
        }
    }

    if ctx.store.clear().await.map_err(store_error)? {
        output.success("Watchlist cleared");
    } else {
        output.info("Watchlist was already empty");
    }
    Ok(())
}

async fn verify(ctx: &AppContext, output: &Output) -> Result<()> {
    match ctx.store.try_load().await {
        Ok(collection) => {
            output.success(format!(
                "Watchlist '{}' is readable ({} movies)",
                ctx.store.collection_name(),
                collection.len()
            ));
            Ok(())
        }
        Err(e) if e.is_corrupt_state() => {
            output.error(format!("{}", e));
            output.info("The next change to the watchlist replaces it; the unreadable file is kept as a .bak copy.");
            Err(color_eyre::eyre::eyre!("watchlist snapshot is corrupt"))
        }
        Err(e) => Err(store_error(e)),
    }
}
