use chrono::NaiveDate;
use reelist_models::serde_helpers::{empty_as_none, null_as_empty, optional_date};
use reelist_models::{CastMember, CatalogRecord, Credits, CrewMember, Genre, MovieId, Video};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovie {
    id: u64,
    // Trending can mix in entries without a title; they are dropped below
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    poster_path: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: Option<u32>,
    #[serde(default, with = "optional_date")]
    release_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    overview: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    #[serde(default)]
    budget: Option<u64>,
    #[serde(default)]
    revenue: Option<u64>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
    #[serde(default)]
    videos: Option<TmdbVideos>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCast>,
    #[serde(default)]
    crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
struct TmdbCast {
    id: u64,
    name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    character: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    id: u64,
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Deserialize)]
struct TmdbVideos {
    #[serde(default)]
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    key: String,
    #[serde(default)]
    name: String,
    site: String,
    #[serde(rename = "type")]
    video_type: String,
}

impl TmdbMovie {
    pub(crate) fn into_record(self) -> Option<CatalogRecord> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(CatalogRecord {
            id: MovieId(self.id),
            title,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            release_date: self.release_date,
            overview: self.overview,
            runtime: self.runtime,
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre { id: g.id, name: g.name })
                .collect(),
            budget: self.budget,
            revenue: self.revenue,
            credits: self.credits.map(|c| Credits {
                cast: c
                    .cast
                    .into_iter()
                    .map(|m| CastMember {
                        id: m.id,
                        name: m.name,
                        character: m.character,
                        profile_path: m.profile_path,
                    })
                    .collect(),
                crew: c
                    .crew
                    .into_iter()
                    .map(|m| CrewMember { id: m.id, name: m.name, job: m.job })
                    .collect(),
            }),
            videos: self
                .videos
                .map(|v| v.results)
                .unwrap_or_default()
                .into_iter()
                .map(|v| Video {
                    key: v.key,
                    name: v.name,
                    site: v.site,
                    video_type: v.video_type,
                })
                .collect(),
        })
    }
}

pub(crate) fn page_into_records(page: TmdbPage) -> Vec<CatalogRecord> {
    let total = page.results.len();
    let records: Vec<CatalogRecord> = page
        .results
        .into_iter()
        .filter_map(TmdbMovie::into_record)
        .collect();
    if records.len() < total {
        debug!("Dropped {} catalog results without a title", total - records.len());
    }
    records
}

/// GET `{base}/{path}` with the key and language attached, decoded as `T`.
pub(crate) async fn get_json<T>(
    client: &Client,
    base_url: &str,
    path: &str,
    api_key: &str,
    language: &str,
    extra_query: &[(&str, &str)],
) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    let url = format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));

    let response = client
        .get(&url)
        .query(&[("api_key", api_key), ("language", language)])
        .query(extra_query)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: error_text,
        });
    }

    let body = response.text().await?;
    debug!("TMDB {} returned {} bytes", path, body.len());
    decode(path, &body)
}

pub(crate) fn decode<T>(endpoint: &str, body: &str) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
