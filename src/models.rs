use serde::Deserialize;

/// List endpoints wrap their items in `{ "results": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShowSummary {
    pub id: u64,
    pub name: String,
    pub poster_path: Option<String>,
    pub first_air_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub overview: String,
    pub genres: Vec<Named>,
    pub homepage: Option<String>,
    pub budget: i64,
    pub revenue: i64,
    pub runtime: Option<u32>,
    pub status: String,
    pub production_companies: Vec<Named>,
}
