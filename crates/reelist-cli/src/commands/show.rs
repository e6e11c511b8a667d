use super::context::AppContext;
use super::render;
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use reelist_core::{DetailController, DetailState};
use reelist_models::MovieId;
use serde_json::json;

pub async fn run_show(ctx: &AppContext, id: MovieId, toggle: bool, output: &Output) -> Result<()> {
    let mut detail = DetailController::new(ctx.catalog()?, ctx.store.clone(), id);

    let spinner = Spinner::start("Loading movie...", output.is_human());
    detail.open().await;
    spinner.finish();

    if detail.state() == &DetailState::NotFound {
        return Err(color_eyre::eyre::eyre!("No movie with id {} in the catalog", id));
    }

    if let DetailState::Unavailable(reason) = detail.state() {
        if output.is_human() {
            output.warn(format!("Failed to load movie details: {}", reason));
        } else {
            output.json(&json!({
                "status": "unavailable",
                "id": id,
                "reason": reason,
                "in_watchlist": detail.in_watchlist(),
            }));
        }
        return Ok(());
    }

    if toggle {
        let now_in_watchlist = detail
            .toggle()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Could not update watchlist: {}", e))?;
        let title = detail.record().map(|r| r.title.as_str()).unwrap_or_default();
        if now_in_watchlist {
            output.success(format!("Added \"{}\" to your watchlist", title));
        } else {
            output.success(format!("Removed \"{}\" from your watchlist", title));
        }
    }

    if let Some(record) = detail.record() {
        if output.is_human() {
            output.block(render::detail_block(record, detail.in_watchlist(), &ctx.images()));
        } else {
            output.json(&json!({
                "status": "ok",
                "movie": record,
                "in_watchlist": detail.in_watchlist(),
                "trailer_url": record.trailer_url(),
            }));
        }
    }
    Ok(())
}
