use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{
    auth::SupabaseAuth,
    client::{SupabaseClient, ensure_success},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Filter and ordering for a PostgREST `select`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<u32>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Table access for one client. Requests carry the client's current access
/// token so row-level security applies to the signed-in user.
pub struct PostgrestTable {
    client: Arc<SupabaseClient>,
    auth: Arc<SupabaseAuth>,
}

impl PostgrestTable {
    pub fn new(client: Arc<SupabaseClient>, auth: Arc<SupabaseAuth>) -> Self {
        Self { client, auth }
    }

    /// `insert(table, record)`: returns the stored row including generated columns.
    pub async fn insert<T, R>(&self, table: &str, record: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.client.endpoint(&format!("rest/v1/{}", table))?;
        let access_token = self.auth.access_token().await;
        debug!(table, "postgrest: insert");

        let response = self
            .client
            .authorized(self.client.http().post(url), access_token.as_deref())
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .with_context(|| format!("failed to reach Supabase rest (insert into {})", table))?;

        let response = ensure_success(response, "insert").await?;
        let mut rows = response
            .json::<Vec<R>>()
            .await
            .with_context(|| format!("failed to decode inserted {} row", table))?;

        if rows.is_empty() {
            return Err(anyhow!("insert into {} returned no row", table));
        }
        Ok(rows.swap_remove(0))
    }

    /// `select(table, filter, order)`.
    pub async fn select<R>(&self, table: &str, query: &SelectQuery) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", table))?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        let access_token = self.auth.access_token().await;
        debug!(table, "postgrest: select");

        let response = self
            .client
            .authorized(self.client.http().get(url), access_token.as_deref())
            .send()
            .await
            .with_context(|| format!("failed to reach Supabase rest (select from {})", table))?;

        let response = ensure_success(response, "select").await?;
        response
            .json::<Vec<R>>()
            .await
            .with_context(|| format!("failed to decode {} rows", table))
    }
}
