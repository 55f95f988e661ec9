use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use playpal_api::{
    db::InMemoryPartyStore,
    error::{AppError, AppResult},
    models::{CompletionConfig, GameId, MemberId},
    routes::{create_router, AppState},
    services::providers::{CatalogClient, GameSearch, TextOracle},
};

/// Members absent from the table fail their fetch
struct FakeCatalog {
    libraries: HashMap<String, Vec<u64>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_owned_games(&self, member: &MemberId) -> AppResult<BTreeSet<GameId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.libraries
            .get(member.as_str())
            .map(|games| games.iter().copied().map(GameId).collect())
            .ok_or_else(|| AppError::ExternalApi("profile is private".to_string()))
    }
}

struct FakeSearch {
    slugs: HashMap<String, String>,
}

#[async_trait]
impl GameSearch for FakeSearch {
    async fn resolve_slug(&self, title: &str) -> AppResult<Option<String>> {
        Ok(self.slugs.get(&title.to_lowercase()).cloned())
    }

    async fn game_details(&self, slug: &str) -> AppResult<Value> {
        if self.slugs.values().any(|s| s == slug) {
            Ok(json!({ "slug": slug, "name": "Left 4 Dead 2" }))
        } else {
            Err(AppError::NotFound(format!("Game {} not found", slug)))
        }
    }
}

struct FakeOracle {
    candidates: Vec<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextOracle for FakeOracle {
    async fn complete(&self, _prompt: &str, _config: &CompletionConfig) -> AppResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.candidates.clone())
    }
}

struct Harness {
    server: TestServer,
    catalog_calls: Arc<AtomicUsize>,
    oracle_calls: Arc<AtomicUsize>,
}

fn create_test_server(oracle_candidates: Vec<&str>) -> Harness {
    let catalog_calls = Arc::new(AtomicUsize::new(0));
    let oracle_calls = Arc::new(AtomicUsize::new(0));

    let catalog = FakeCatalog {
        libraries: HashMap::from([
            ("alice".to_string(), vec![550, 730, 620]),
            ("bob".to_string(), vec![730, 620, 4000]),
            ("carol".to_string(), vec![730]),
            ("dave".to_string(), vec![]),
        ]),
        calls: Arc::clone(&catalog_calls),
    };
    let search = FakeSearch {
        slugs: HashMap::from([("left 4 dead".to_string(), "left-4-dead-2".to_string())]),
    };
    let oracle = FakeOracle {
        candidates: oracle_candidates.into_iter().map(String::from).collect(),
        calls: Arc::clone(&oracle_calls),
    };

    let state = AppState::new(
        Arc::new(InMemoryPartyStore::new()),
        Arc::new(catalog),
        Arc::new(search),
        Arc::new(oracle),
        Duration::from_secs(5),
    );

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        catalog_calls,
        oracle_calls,
    }
}

async fn create_party(server: &TestServer, members: &[&str]) -> String {
    let response = server
        .post("/api/v1/parties")
        .json(&json!({ "members": members }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["partyId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let harness = create_test_server(vec![]);
    let response = harness.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let harness = create_test_server(vec![]);
    let response = harness.server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_create_and_get_party() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["alice", "bob"]).await;

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}", party_id))
        .await;
    response.assert_status_ok();
    let party: Value = response.json();
    assert_eq!(party["id"], party_id.as_str());
    assert_eq!(party["members"], json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_create_party_rejects_blank_member() {
    let harness = create_test_server(vec![]);
    let response = harness
        .server
        .post("/api/v1/parties")
        .json(&json!({ "members": ["alice", ""] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_member_then_intersect() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["alice"]).await;

    let response = harness
        .server
        .post(&format!("/api/v1/parties/{}/members", party_id))
        .json(&json!({ "memberId": "bob" }))
        .await;
    response.assert_status_ok();
    let party: Value = response.json();
    assert_eq!(party["members"], json!(["alice", "bob"]));

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}/common-games", party_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "commonGames": [620, 730] }));
}

#[tokio::test]
async fn test_common_games_single_member() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["alice"]).await;

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}/common-games", party_id))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "commonGames": [550, 620, 730] })
    );
}

#[tokio::test]
async fn test_common_games_skips_failed_member() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["alice", "bob", "mallory"]).await;

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}/common-games", party_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "commonGames": [620, 730] }));
    assert_eq!(harness.catalog_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_common_games_all_members_failed() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["mallory", "trent"]).await;

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}/common-games", party_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "commonGames": [] }));
}

#[tokio::test]
async fn test_common_games_member_with_empty_library() {
    let harness = create_test_server(vec![]);
    let party_id = create_party(&harness.server, &["alice", "carol", "dave"]).await;

    let response = harness
        .server
        .get(&format!("/api/v1/parties/{}/common-games", party_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "commonGames": [] }));
}

#[tokio::test]
async fn test_common_games_unknown_party() {
    let harness = create_test_server(vec![]);

    let response = harness
        .server
        .get("/api/v1/parties/no-such-party/common-games")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("no-such-party"));
    assert_eq!(harness.catalog_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recommendation() {
    let harness = create_test_server(vec!["Back 4 Blood"]);

    let response = harness.server.get("/api/v1/recommendations/Left%204%20Dead").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "slug": "left-4-dead-2", "recommendation": "Back 4 Blood" })
    );
    assert_eq!(harness.oracle_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recommendation_unknown_title() {
    let harness = create_test_server(vec!["unused"]);

    let response = harness.server.get("/api/v1/recommendations/qwertyuiop").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(harness.oracle_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recommendation_without_candidates() {
    let harness = create_test_server(vec![]);

    let response = harness.server.get("/api/v1/recommendations/Left%204%20Dead").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendation"], Value::Null);
}

#[tokio::test]
async fn test_game_details_passthrough() {
    let harness = create_test_server(vec![]);

    let response = harness.server.get("/api/v1/games/left-4-dead-2").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Left 4 Dead 2");

    let response = harness.server.get("/api/v1/games/unknown-game").await;
    response.assert_status(StatusCode::NOT_FOUND);
}
