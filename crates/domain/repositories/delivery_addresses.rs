use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::delivery_addresses::{
    DeliveryAddressEntity, InsertDeliveryAddressEntity,
};

#[automock]
#[async_trait]
pub trait DeliveryAddressRepository: Send + Sync {
    async fn insert(
        &self,
        insert_address_entity: InsertDeliveryAddressEntity,
    ) -> Result<DeliveryAddressEntity>;

    /// Address `address_id` if and only if it belongs to `user_id`.
    async fn find_owned(
        &self,
        address_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<DeliveryAddressEntity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<DeliveryAddressEntity>>;
}
