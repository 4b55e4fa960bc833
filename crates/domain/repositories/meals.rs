use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::meals::MealEntity;

#[automock]
#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn list(&self, cuisine_type: Option<String>) -> Result<Vec<MealEntity>>;
}
