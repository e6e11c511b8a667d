/// Builds absolute image URLs from the relative paths the catalog returns.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base_url: String,
}

impl ImageUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `None` for a missing or empty path.
    pub fn url(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        if path.starts_with('/') {
            Some(format!("{}{}", self.base_url, path))
        } else {
            Some(format!("{}/{}", self.base_url, path))
        }
    }
}
