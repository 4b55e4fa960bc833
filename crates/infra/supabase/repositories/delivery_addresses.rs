use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::delivery_addresses::{DeliveryAddressEntity, InsertDeliveryAddressEntity},
        repositories::delivery_addresses::DeliveryAddressRepository,
    },
    infra::supabase::postgrest::{Direction, PostgrestTable, SelectQuery},
};

const TABLE: &str = "delivery_addresses";

pub struct DeliveryAddressSupabase {
    table: Arc<PostgrestTable>,
}

impl DeliveryAddressSupabase {
    pub fn new(table: Arc<PostgrestTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl DeliveryAddressRepository for DeliveryAddressSupabase {
    async fn insert(
        &self,
        insert_address_entity: InsertDeliveryAddressEntity,
    ) -> Result<DeliveryAddressEntity> {
        self.table.insert(TABLE, &insert_address_entity).await
    }

    async fn find_owned(
        &self,
        address_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<DeliveryAddressEntity>> {
        let query = SelectQuery::new()
            .eq("id", address_id)
            .eq("user_id", user_id)
            .limit(1);

        let rows: Vec<DeliveryAddressEntity> = self.table.select(TABLE, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<DeliveryAddressEntity>> {
        let query = SelectQuery::new()
            .eq("user_id", user_id)
            .order("created_at", Direction::Desc);

        self.table.select(TABLE, &query).await
    }
}
