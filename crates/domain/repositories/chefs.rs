use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::chefs::{ChefEntity, WeeklyMenuEntity};

#[automock]
#[async_trait]
pub trait ChefRepository: Send + Sync {
    async fn find_by_id(&self, chef_id: Uuid) -> Result<Option<ChefEntity>>;
    async fn weekly_menu(&self, chef_id: Uuid) -> Result<Vec<WeeklyMenuEntity>>;
}
