use serde::{Deserialize, Serialize};

mod library;
mod party;

pub use library::{
    CommonGamesResponse, FetchFailure, FetchOutcome, GameId, MemberLibrary, PartyIntersection,
};
pub use party::{dedup_members, MemberId, Party, PartyId};

/// Outcome of a similar-game request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    /// Canonical search slug the title resolved to
    pub slug: Option<String>,
    /// Raw oracle text. `None` when the oracle produced no candidate.
    pub output: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub slug: Option<String>,
    pub recommendation: Option<String>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            slug: rec.slug,
            recommendation: rec.output,
        }
    }
}

/// Sampling parameters for the text-completion oracle
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub candidate_count: u32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            candidate_count: 1,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyRequest {
    #[serde(default)]
    pub members: Vec<MemberId>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyResponse {
    pub party_id: PartyId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub member_id: MemberId,
}

// ============================================================================
// Steam Web API Types
// ============================================================================

/// Envelope returned by IPlayerService/GetOwnedGames
#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGamesEnvelope {
    pub response: SteamOwnedGamesResponse,
}

/// `games` is absent for private or unknown profiles
#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGamesResponse {
    #[serde(default)]
    pub game_count: Option<u32>,
    #[serde(default)]
    pub games: Option<Vec<SteamOwnedGame>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGame {
    pub appid: u64,
}

// ============================================================================
// RAWG API Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawgSearchResponse {
    pub results: Vec<RawgGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawgGame {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Generative Language (text) API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextRequest<'a> {
    pub prompt: TextPrompt<'a>,
    pub temperature: f32,
    pub candidate_count: u32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct TextPrompt<'a> {
    pub text: &'a str,
}

/// `candidates` is omitted entirely when the model produced nothing
#[derive(Debug, Deserialize)]
pub struct GenerateTextResponse {
    #[serde(default)]
    pub candidates: Vec<TextCompletion>,
}

/// `output` is missing when a candidate was blocked by safety filters
#[derive(Debug, Deserialize)]
pub struct TextCompletion {
    #[serde(default)]
    pub output: Option<String>,
}
