use super::context::AppContext;
use super::render;
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use reelist_core::{HomeController, ListState};
use serde_json::json;

pub async fn run_home(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut home = HomeController::new(ctx.catalog()?);

    let spinner = Spinner::start("Loading movies...", output.is_human());
    home.refresh().await;
    spinner.finish();

    if !output.is_human() {
        output.json(&json!({
            "trending": render::list_state_json(home.trending()),
            "popular": render::list_state_json(home.popular()),
        }));
        return Ok(());
    }

    for (title, state) in [("Trending", home.trending()), ("Popular", home.popular())] {
        output.block(render::heading(title));
        match state {
            ListState::Loaded(records) if records.is_empty() => output.info("No movies"),
            ListState::Loaded(records) => output.block(render::records_table(records)),
            ListState::Unavailable(reason) => output.warn(format!("{} is unavailable right now: {}", title, reason)),
            ListState::Loading => {}
        }
    }
    Ok(())
}
