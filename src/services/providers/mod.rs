//! External data provider abstractions
//!
//! Each external collaborator sits behind a small capability trait so the
//! intersection and recommendation pipelines can run against fakes in tests:
//! the game catalog (who owns what), game search (title -> slug, slug -> details),
//! and the text-completion oracle.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{CompletionConfig, FetchFailure, FetchOutcome, GameId, MemberId, MemberLibrary},
};

pub mod palm;
pub mod rawg;
pub mod steam;

pub use palm::PalmOracle;
pub use rawg::RawgClient;
pub use steam::SteamCatalogClient;

/// Source of truth for which games a member owns
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the full set of game IDs owned by `member`
    ///
    /// An empty set is a valid library. Transport errors, non-success statuses and
    /// unexpected payload shapes are all errors.
    async fn fetch_owned_games(&self, member: &MemberId) -> AppResult<BTreeSet<GameId>>;
}

/// Game search service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameSearch: Send + Sync {
    /// Resolve free text to the canonical slug of the first ranked match
    ///
    /// `Ok(None)` means the search ran and found nothing.
    async fn resolve_slug(&self, title: &str) -> AppResult<Option<String>>;

    /// Raw detail document for a slug
    async fn game_details(&self, slug: &str) -> AppResult<serde_json::Value>;
}

/// Opaque text-completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Submit `prompt` and return candidate completions in ranked order
    async fn complete(&self, prompt: &str, config: &CompletionConfig) -> AppResult<Vec<String>>;
}

/// Fetches one member's library and classifies the result
///
/// Never fails: every error, including exceeding `timeout`, becomes a
/// `FetchOutcome::Failure` carrying the reason. The reason is logged here and not
/// surfaced further.
pub async fn fetch_outcome(
    catalog: &dyn CatalogClient,
    member: &MemberId,
    timeout: Duration,
) -> FetchOutcome {
    let failure = |reason: FetchFailure| {
        tracing::warn!(member_id = %member, reason = %reason, "Member library unavailable");
        FetchOutcome::Failure {
            member: member.clone(),
            reason,
        }
    };

    if member.is_blank() {
        return failure(FetchFailure::EmptyMemberId);
    }

    match tokio::time::timeout(timeout, catalog.fetch_owned_games(member)).await {
        Ok(Ok(games)) => {
            tracing::debug!(member_id = %member, games = games.len(), "Member library fetched");
            FetchOutcome::Success(MemberLibrary {
                member: member.clone(),
                games,
            })
        }
        Ok(Err(e)) => failure(FetchFailure::Upstream(e.to_string())),
        Err(_) => failure(FetchFailure::Timeout(timeout)),
    }
}
