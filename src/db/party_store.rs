use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{dedup_members, MemberId, Party, PartyId},
};

/// Durable mapping from a party to its ordered member list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyStore: Send + Sync {
    /// Look up a party. `None` when no such party was ever registered.
    async fn get(&self, party_id: &PartyId) -> AppResult<Option<Party>>;

    /// Register a new party and return its freshly allocated ID
    async fn create(&self, members: Vec<MemberId>) -> AppResult<PartyId>;

    /// Append `member` to the party, or confirm it if already present
    async fn add_member(&self, party_id: &PartyId, member: MemberId) -> AppResult<Party>;
}

fn validate_members(members: &[MemberId]) -> AppResult<()> {
    if members.iter().any(MemberId::is_blank) {
        return Err(AppError::InvalidInput(
            "Member identifiers cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn party_not_found(party_id: &PartyId) -> AppError {
    AppError::NotFound(format!("Party {} not found", party_id))
}

/// Process-local store used when no database is configured
#[derive(Default)]
pub struct InMemoryPartyStore {
    parties: RwLock<HashMap<PartyId, Party>>,
}

impl InMemoryPartyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartyStore for InMemoryPartyStore {
    async fn get(&self, party_id: &PartyId) -> AppResult<Option<Party>> {
        Ok(self.parties.read().await.get(party_id).cloned())
    }

    async fn create(&self, members: Vec<MemberId>) -> AppResult<PartyId> {
        validate_members(&members)?;

        let party = Party::new(PartyId::generate(), members);
        let id = party.id.clone();
        self.parties.write().await.insert(id.clone(), party);
        Ok(id)
    }

    async fn add_member(&self, party_id: &PartyId, member: MemberId) -> AppResult<Party> {
        validate_members(std::slice::from_ref(&member))?;

        let mut parties = self.parties.write().await;
        let party = parties
            .get_mut(party_id)
            .ok_or_else(|| party_not_found(party_id))?;
        party.add_member(member);
        Ok(party.clone())
    }
}

#[derive(sqlx::FromRow)]
struct PartyRow {
    id: String,
    members: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<PartyRow> for Party {
    fn from(row: PartyRow) -> Self {
        Self {
            id: PartyId::from(row.id),
            members: row.members.into_iter().map(MemberId::new).collect(),
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed party store
pub struct PgPartyStore {
    pool: PgPool,
}

impl PgPartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartyStore for PgPartyStore {
    async fn get(&self, party_id: &PartyId) -> AppResult<Option<Party>> {
        let row = sqlx::query_as::<_, PartyRow>(
            "SELECT id, members, created_at FROM parties WHERE id = $1",
        )
        .bind(party_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Party::from))
    }

    async fn create(&self, members: Vec<MemberId>) -> AppResult<PartyId> {
        validate_members(&members)?;

        let id = PartyId::generate();
        let members: Vec<String> = dedup_members(members)
            .into_iter()
            .map(|m| m.as_str().to_string())
            .collect();

        sqlx::query("INSERT INTO parties (id, members) VALUES ($1, $2)")
            .bind(id.as_str())
            .bind(&members)
            .execute(&self.pool)
            .await?;

        tracing::info!(party_id = %id, member_count = members.len(), "Party registered");
        Ok(id)
    }

    async fn add_member(&self, party_id: &PartyId, member: MemberId) -> AppResult<Party> {
        validate_members(std::slice::from_ref(&member))?;

        let row = sqlx::query_as::<_, PartyRow>(
            r#"
            UPDATE parties
            SET members = CASE
                WHEN $2 = ANY(members) THEN members
                ELSE array_append(members, $2)
            END
            WHERE id = $1
            RETURNING id, members, created_at
            "#,
        )
        .bind(party_id.as_str())
        .bind(member.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Party::from)
            .ok_or_else(|| party_not_found(party_id))
    }
}
