//! RAWG game search client
//!
//! Resolves free-text titles to RAWG slugs and serves raw game detail documents.
//! Both lookups are cached when a Redis cache is configured.

use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{RawgGame, RawgSearchResponse},
    services::providers::GameSearch,
};

const SLUG_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct RawgClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl RawgClient {
    pub fn new(api_key: String, api_url: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    fn top_result(search: RawgSearchResponse) -> Option<RawgGame> {
        search.results.into_iter().next()
    }

    async fn search_slug(&self, title: &str) -> AppResult<Option<String>> {
        let url = format!("{}/games", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("search", title)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "RAWG search returned status {}: {}",
                status, body
            )));
        }

        let search: RawgSearchResponse = response.json().await?;
        let top = Self::top_result(search);

        tracing::info!(
            title = %title,
            slug = ?top.as_ref().map(|game| game.slug.as_str()),
            matched = ?top.as_ref().and_then(|game| game.name.as_deref()),
            provider = "rawg",
            "Title search completed"
        );

        Ok(top.map(|game| game.slug))
    }

    async fn fetch_details(&self, slug: &str) -> AppResult<serde_json::Value> {
        let url = format!("{}/games/{}", self.api_url, slug);

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("Game {} not found", slug))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::ExternalApi(format!(
                    "RAWG details returned status {}: {}",
                    status, body
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl GameSearch for RawgClient {
    async fn resolve_slug(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::SlugSearch(title.to_string()),
                SLUG_CACHE_TTL,
                self.search_slug(title)
            ),
            None => self.search_slug(title).await,
        }
    }

    async fn game_details(&self, slug: &str) -> AppResult<serde_json::Value> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::GameDetails(slug.to_string()),
                DETAILS_CACHE_TTL,
                self.fetch_details(slug)
            ),
            None => self.fetch_details(slug).await,
        }
    }
}
