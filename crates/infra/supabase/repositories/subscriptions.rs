use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
    },
    infra::supabase::postgrest::{Direction, PostgrestTable, SelectQuery},
};

const TABLE: &str = "subscriptions";

pub struct SubscriptionSupabase {
    table: Arc<PostgrestTable>,
}

impl SubscriptionSupabase {
    pub fn new(table: Arc<PostgrestTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionSupabase {
    async fn insert(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        self.table.insert(TABLE, &insert_subscription_entity).await
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>> {
        let query = SelectQuery::new()
            .eq("user_id", user_id)
            .order("created_at", Direction::Desc);

        self.table.select(TABLE, &query).await
    }
}
