use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelist_catalog::ImageUrlBuilder;
use reelist_core::ListState;
use reelist_models::display::{format_money, format_rating, year_label};
use reelist_models::{CatalogRecord, WatchlistEntry};
use serde_json::{json, Value};

fn styled(table: &mut Table) {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
}

pub fn heading(title: &str) -> String {
    format!("\n{}", title.bright_cyan().bold())
}

pub fn records_table(records: &[CatalogRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.title),
            Cell::new(year_label(record.release_date)),
            Cell::new(format!("⭐ {}", format_rating(record.vote_average))).fg(Color::Yellow),
        ]);
    }
    styled(&mut table);
    table
}

pub fn entries_table(entries: &[WatchlistEntry], images: &ImageUrlBuilder) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
        Cell::new("Poster").add_attribute(Attribute::Bold),
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(&entry.title),
            Cell::new(year_label(entry.release_date)),
            Cell::new(format!("⭐ {}", format_rating(entry.vote_average))).fg(Color::Yellow),
            Cell::new(images.url(Some(entry.poster_path.as_str())).unwrap_or_else(|| "-".to_string())),
        ]);
    }
    styled(&mut table);
    table
}

pub fn detail_block(record: &CatalogRecord, in_watchlist: bool, images: &ImageUrlBuilder) -> String {
    let mut lines = Vec::new();

    let runtime = record
        .runtime
        .map(|m| format!(" • {} min", m))
        .unwrap_or_default();
    lines.push(format!("\n{}", record.title.bright_white().bold()));
    lines.push(format!("{}{}", year_label(record.release_date), runtime));

    let votes = record
        .vote_count
        .map(|c| format!(" ({} votes)", c))
        .unwrap_or_default();
    lines.push(format!("{} {}{}", "★".yellow(), format_rating(record.vote_average), votes));

    if !record.genres.is_empty() {
        let genres: Vec<&str> = record.genres.iter().take(3).map(|g| g.name.as_str()).collect();
        lines.push(genres.join(" · "));
    }

    lines.push(if in_watchlist {
        format!("{} In Watchlist", "●".red())
    } else {
        format!("{} Add to Watchlist", "○".bright_black())
    });

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Details").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    if let Some(overview) = &record.overview {
        table.add_row(vec![Cell::new("Overview"), Cell::new(overview)]);
    }
    if let Some(director) = record.director() {
        table.add_row(vec![Cell::new("Director"), Cell::new(&director.name)]);
    }
    let cast = record.top_cast();
    if !cast.is_empty() {
        let names: Vec<String> = cast
            .iter()
            .map(|c| match &c.character {
                Some(character) => format!("{} as {}", c.name, character),
                None => c.name.clone(),
            })
            .collect();
        table.add_row(vec![Cell::new("Cast"), Cell::new(names.join("\n"))]);
    }
    if let Some(budget) = record.budget_if_known() {
        table.add_row(vec![Cell::new("Budget"), Cell::new(format_money(budget))]);
    }
    if let Some(revenue) = record.revenue_if_known() {
        table.add_row(vec![Cell::new("Revenue"), Cell::new(format_money(revenue))]);
    }
    if let Some(trailer) = record.trailer_url() {
        table.add_row(vec![Cell::new("Trailer"), Cell::new(trailer)]);
    }
    if let Some(image) = images.url(record.hero_image_path()) {
        table.add_row(vec![Cell::new("Image"), Cell::new(image)]);
    }
    styled(&mut table);
    lines.push(table.to_string());

    lines.join("\n")
}

pub fn list_state_json(state: &ListState) -> Value {
    match state {
        ListState::Loading => json!({ "status": "loading" }),
        ListState::Loaded(records) => json!({ "status": "ok", "movies": records }),
        ListState::Unavailable(reason) => json!({ "status": "unavailable", "reason": reason }),
    }
}
