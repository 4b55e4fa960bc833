use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[automock]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>>;
}
