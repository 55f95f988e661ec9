use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

use super::MemberId;

/// Catalog identifier of a game (a Steam app ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One member's owned games, fetched fresh for a single intersection request
#[derive(Debug, Clone, PartialEq)]
pub struct MemberLibrary {
    pub member: MemberId,
    pub games: BTreeSet<GameId>,
}

/// Why a member's library could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchFailure {
    #[error("member identifier is empty")]
    EmptyMemberId,

    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),

    #[error("catalog request failed: {0}")]
    Upstream(String),

    #[error("catalog task aborted: {0}")]
    Aborted(String),
}

/// Result of fetching one member's library. Exactly one per party member.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(MemberLibrary),
    Failure {
        member: MemberId,
        reason: FetchFailure,
    },
}

/// Games shared by every member whose fetch succeeded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartyIntersection {
    pub common_games: BTreeSet<GameId>,
    /// Number of members that contributed a library
    pub succeeded: usize,
    /// Members left out because their fetch failed
    pub excluded: Vec<MemberId>,
}

/// Response body for the common-games endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommonGamesResponse {
    pub common_games: Vec<GameId>,
}

impl From<PartyIntersection> for CommonGamesResponse {
    fn from(intersection: PartyIntersection) -> Self {
        Self {
            common_games: intersection.common_games.into_iter().collect(),
        }
    }
}
