use super::context::AppContext;
use super::render;
use super::spinner::Spinner;
use crate::output::Output;
use color_eyre::Result;
use reelist_core::{SearchController, SearchState};
use serde_json::json;

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let mut search = SearchController::new(ctx.catalog()?);

    let spinner = Spinner::start(&format!("Searching for \"{}\"...", query.trim()), output.is_human());
    let searched = search.search(query).await;
    spinner.finish();

    if !searched {
        output.warn("Enter a title to search for");
        return Ok(());
    }

    match search.state() {
        SearchState::Results { query, records } => {
            if !output.is_human() {
                output.json(&json!({ "status": "ok", "query": query, "movies": records }));
            } else if records.is_empty() {
                output.info(format!("No results found for \"{}\"", query));
            } else {
                output.block(render::heading(&format!("Results for \"{}\"", query)));
                output.block(render::records_table(records));
            }
        }
        SearchState::Unavailable { query, reason } => {
            if output.is_human() {
                output.warn(format!("Search is unavailable right now: {}", reason));
            } else {
                output.json(&json!({ "status": "unavailable", "query": query, "reason": reason }));
            }
        }
        SearchState::Idle => {}
    }
    Ok(())
}
