//! Lenient views over API payloads. Only the fields the renderer cannot do
//! without are required; everything else is optional so unexpected or `null`
//! values do not abort rendering.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub page: Option<u32>,
    pub results: Vec<T>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonSummary {
    pub id: u64,
    pub name: String,
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

/// Movies carry a `title`, TV shows a `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownFor {
    pub title: Option<String>,
    pub name: Option<String>,
}

impl KnownFor {
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub known_for_department: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub popularity: Option<f64>,
    pub homepage: Option<String>,
    pub biography: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub author: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub author_details: Option<AuthorDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorDetails {
    pub rating: Option<f64>,
}
