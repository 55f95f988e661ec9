//! Steam Web API catalog client
//!
//! Owned games come from `IPlayerService/GetOwnedGames/v1`. Steam answers a private
//! or unknown profile with `{"response": {}}`, which is treated as unusable rather
//! than as an empty library.

use std::collections::BTreeSet;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{GameId, MemberId, SteamOwnedGamesEnvelope},
    services::providers::CatalogClient,
};

#[derive(Clone)]
pub struct SteamCatalogClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl SteamCatalogClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Extracts the owned app IDs, rejecting envelopes without a `games` list
    fn owned_games(
        member: &MemberId,
        envelope: SteamOwnedGamesEnvelope,
    ) -> AppResult<BTreeSet<GameId>> {
        let games = envelope.response.games.ok_or_else(|| {
            AppError::ExternalApi(format!(
                "Steam response for {} has no games list (private or unknown profile)",
                member
            ))
        })?;

        Ok(games.into_iter().map(|game| GameId(game.appid)).collect())
    }
}

#[async_trait::async_trait]
impl CatalogClient for SteamCatalogClient {
    async fn fetch_owned_games(&self, member: &MemberId) -> AppResult<BTreeSet<GameId>> {
        let url = format!("{}/IPlayerService/GetOwnedGames/v1/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", member.as_str()),
                ("include_played_free_games", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Steam API returned status {} for {}",
                status, member
            )));
        }

        let response_text = response.text().await?;
        let envelope: SteamOwnedGamesEnvelope =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::debug!(member_id = %member, response = %response_text, "Unparseable Steam response");
                AppError::ExternalApi(format!("Failed to parse Steam response: {}", e))
            })?;

        let reported = envelope.response.game_count;
        let games = Self::owned_games(member, envelope)?;

        tracing::debug!(
            member_id = %member,
            games = games.len(),
            reported = ?reported,
            provider = "steam",
            "Owned games fetched"
        );

        Ok(games)
    }
}
