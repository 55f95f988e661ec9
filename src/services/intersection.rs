use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::{
    db::PartyStore,
    error::{AppError, AppResult},
    models::{
        FetchFailure, FetchOutcome, GameId, MemberId, MemberLibrary, PartyId, PartyIntersection,
    },
    services::providers::{fetch_outcome, CatalogClient},
};

/// Computes the games every reachable party member owns
///
/// Members whose library cannot be fetched are left out of the intersection
/// instead of failing the request. If nobody's library could be fetched the
/// result is empty.
pub struct IntersectionEngine {
    party_store: Arc<dyn PartyStore>,
    catalog: Arc<dyn CatalogClient>,
    fetch_timeout: Duration,
}

impl IntersectionEngine {
    pub fn new(
        party_store: Arc<dyn PartyStore>,
        catalog: Arc<dyn CatalogClient>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            party_store,
            catalog,
            fetch_timeout,
        }
    }

    /// Resolves the party and intersects its members' libraries
    ///
    /// Fails with `NotFound` before any catalog call if the party is unknown.
    pub async fn compute_common_games(&self, party_id: &PartyId) -> AppResult<PartyIntersection> {
        let start = Instant::now();

        let party = self
            .party_store
            .get(party_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Party {} not found", party_id)))?;

        let outcomes = self.fetch_libraries(&party.members).await;
        let intersection = summarize(outcomes);

        if !intersection.excluded.is_empty() {
            tracing::warn!(
                party_id = %party_id,
                excluded = ?intersection.excluded,
                "Members excluded from intersection"
            );
        }

        tracing::info!(
            party_id = %party_id,
            members = party.members.len(),
            succeeded = intersection.succeeded,
            excluded = intersection.excluded.len(),
            common_games = intersection.common_games.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Party intersection computed"
        );

        Ok(intersection)
    }

    /// Fetches every member's library concurrently and waits for all of them
    ///
    /// Returns exactly one outcome per member, in member order. The tasks live in a
    /// `JoinSet`, so dropping this future aborts any fetch still in flight.
    async fn fetch_libraries(&self, members: &[MemberId]) -> Vec<FetchOutcome> {
        let mut tasks = JoinSet::new();
        for (index, member) in members.iter().cloned().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            let timeout = self.fetch_timeout;
            tasks.spawn(async move {
                (index, fetch_outcome(catalog.as_ref(), &member, timeout).await)
            });
        }

        let mut slots: Vec<Option<FetchOutcome>> = members.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "Library fetch task failed"),
            }
        }

        members
            .iter()
            .zip(slots)
            .map(|(member, slot)| {
                slot.unwrap_or_else(|| {
                    tracing::warn!(member_id = %member, "Member library unavailable");
                    FetchOutcome::Failure {
                        member: member.clone(),
                        reason: FetchFailure::Aborted("fetch task did not complete".to_string()),
                    }
                })
            })
            .collect()
    }
}

/// Splits outcomes into contributing libraries and excluded members, then intersects
pub fn summarize(outcomes: Vec<FetchOutcome>) -> PartyIntersection {
    let mut libraries = Vec::with_capacity(outcomes.len());
    let mut excluded = Vec::new();

    for outcome in outcomes {
        match outcome {
            FetchOutcome::Success(library) => libraries.push(library),
            FetchOutcome::Failure { member, .. } => excluded.push(member),
        }
    }

    PartyIntersection {
        common_games: intersect_libraries(&libraries),
        succeeded: libraries.len(),
        excluded,
    }
}

/// Games present in every given library. Empty input yields an empty set.
pub fn intersect_libraries(libraries: &[MemberLibrary]) -> BTreeSet<GameId> {
    // Start from the smallest library; the result can never be larger.
    let Some(smallest) = libraries.iter().min_by_key(|library| library.games.len()) else {
        return BTreeSet::new();
    };

    let mut common = smallest.games.clone();
    for library in libraries {
        if common.is_empty() {
            break;
        }
        common.retain(|game| library.games.contains(game));
    }

    common
}
