use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use crate::movie_id::MovieId;
use crate::serde_helpers::optional_date;

/// How many cast members the detail view shows.
pub const TOP_CAST_LIMIT: usize = 6;

/// A movie as returned by the remote catalog.
///
/// List endpoints (trending, popular, search) only fill the identity and
/// display fields; detail lookups also carry credits, videos and financials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub id: MovieId,
    pub title: String,
    /// Relative image path on the catalog's image host. Empty when the catalog has no poster.
    pub poster_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    #[serde(default, with = "optional_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    pub video_type: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.video_type == "Trailer" && self.site == "YouTube"
    }

    pub fn watch_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

impl CatalogRecord {
    /// Minimal record with only the identity and display fields set.
    pub fn summary(id: MovieId, title: impl Into<String>, poster_path: impl Into<String>, vote_average: f64) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: poster_path.into(),
            backdrop_path: None,
            vote_average,
            vote_count: None,
            release_date: None,
            overview: None,
            runtime: None,
            genres: Vec::new(),
            budget: None,
            revenue: None,
            credits: None,
            videos: Vec::new(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// First crew member credited as director.
    pub fn director(&self) -> Option<&CrewMember> {
        self.credits.as_ref()?.crew.iter().find(|c| c.job == "Director")
    }

    pub fn top_cast(&self) -> &[CastMember] {
        match &self.credits {
            Some(credits) => &credits.cast[..credits.cast.len().min(TOP_CAST_LIMIT)],
            None => &[],
        }
    }

    /// First YouTube trailer, if any.
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.iter().find(|v| v.is_youtube_trailer())
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer().and_then(Video::watch_url)
    }

    /// Backdrop if present, otherwise the poster.
    pub fn hero_image_path(&self) -> Option<&str> {
        self.backdrop_path
            .as_deref()
            .or_else(|| Some(self.poster_path.as_str()).filter(|p| !p.is_empty()))
    }

    pub fn budget_if_known(&self) -> Option<u64> {
        self.budget.filter(|b| *b > 0)
    }

    pub fn revenue_if_known(&self) -> Option<u64> {
        self.revenue.filter(|r| *r > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> CatalogRecord {
        let mut record = CatalogRecord::summary(MovieId(27205), "Inception", "/inception.jpg", 8.8);
        record.release_date = NaiveDate::from_ymd_opt(2010, 7, 15);
        record.credits = Some(Credits {
            cast: (0..8)
                .map(|i| CastMember {
                    id: i,
                    name: format!("Actor {}", i),
                    character: None,
                    profile_path: None,
                })
                .collect(),
            crew: vec![
                CrewMember { id: 100, name: "Hans Zimmer".to_string(), job: "Original Music Composer".to_string() },
                CrewMember { id: 525, name: "Christopher Nolan".to_string(), job: "Director".to_string() },
            ],
        });
        record.videos = vec![
            Video { key: "teaser".to_string(), name: "Teaser".to_string(), site: "YouTube".to_string(), video_type: "Teaser".to_string() },
            Video { key: "vimeo1".to_string(), name: "Trailer".to_string(), site: "Vimeo".to_string(), video_type: "Trailer".to_string() },
            Video { key: "YoHD9XEInc0".to_string(), name: "Official Trailer".to_string(), site: "YouTube".to_string(), video_type: "Trailer".to_string() },
        ];
        record
    }

    #[test]
    fn test_director_and_top_cast() {
        let record = inception();
        assert_eq!(record.director().unwrap().name, "Christopher Nolan");
        assert_eq!(record.top_cast().len(), TOP_CAST_LIMIT);
        assert_eq!(record.top_cast()[0].name, "Actor 0");
    }

    #[test]
    fn test_trailer_prefers_youtube_trailer() {
        let record = inception();
        assert_eq!(
            record.trailer_url().as_deref(),
            Some("https://www.youtube.com/watch?v=YoHD9XEInc0")
        );
    }

    #[test]
    fn test_summary_record_has_no_rich_fields() {
        let record = CatalogRecord::summary(MovieId(1), "Untitled", "", 0.0);
        assert!(record.director().is_none());
        assert!(record.top_cast().is_empty());
        assert!(record.trailer().is_none());
        assert!(record.hero_image_path().is_none());
        assert_eq!(record.year(), None);
    }

    #[test]
    fn test_financials_hidden_when_zero() {
        let mut record = inception();
        record.budget = Some(0);
        record.revenue = Some(836_800_000);
        assert_eq!(record.budget_if_known(), None);
        assert_eq!(record.revenue_if_known(), Some(836_800_000));
    }
}
