use std::sync::Arc;

use axum::http::StatusCode;
use hometaste::domain::{
    repositories::chefs::ChefRepository, value_objects::chefs::ChefProfileDto,
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChefProfileError {
    #[error("Chef not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ChefProfileError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChefProfileError::NotFound => StatusCode::NOT_FOUND,
            ChefProfileError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct ChefProfileUseCase<R>
where
    R: ChefRepository + Send + Sync + 'static,
{
    chef_repo: Arc<R>,
}

impl<R> ChefProfileUseCase<R>
where
    R: ChefRepository + Send + Sync + 'static,
{
    pub fn new(chef_repo: Arc<R>) -> Self {
        Self { chef_repo }
    }

    pub async fn get_profile(&self, chef_id: Uuid) -> Result<ChefProfileDto, ChefProfileError> {
        let chef = self
            .chef_repo
            .find_by_id(chef_id)
            .await
            .map_err(|err| {
                error!(%chef_id, db_error = ?err, "chef_profiles: chef lookup failed");
                ChefProfileError::Internal(err)
            })?
            .ok_or(ChefProfileError::NotFound)?;

        let weekly_menu = self.chef_repo.weekly_menu(chef_id).await.map_err(|err| {
            error!(%chef_id, db_error = ?err, "chef_profiles: weekly menu lookup failed");
            ChefProfileError::Internal(err)
        })?;

        info!(%chef_id, days = weekly_menu.len(), "chef_profiles: profile loaded");
        Ok(ChefProfileDto { chef, weekly_menu })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hometaste::domain::{
        entities::chefs::{ChefEntity, MenuItem, WeeklyMenuEntity},
        repositories::chefs::MockChefRepository,
    };
    use mockall::predicate::eq;

    fn chef(id: Uuid) -> ChefEntity {
        ChefEntity {
            id,
            name: "Lakshmi Iyer".to_string(),
            bio: Some("Grandmother's recipes from Thanjavur".to_string()),
            profile_image: None,
            cuisine_specialties: vec!["South Indian".to_string()],
            years_of_experience: 22,
            rating: 4.8,
            total_reviews: 310,
        }
    }

    #[tokio::test]
    async fn profile_combines_chef_and_menu() {
        let chef_id = Uuid::new_v4();
        let mut repo = MockChefRepository::new();
        repo.expect_find_by_id()
            .with(eq(chef_id))
            .returning(|id| Ok(Some(chef(id))));
        repo.expect_weekly_menu().with(eq(chef_id)).returning(|id| {
            Ok(vec![WeeklyMenuEntity {
                chef_id: id,
                day_of_week: "Monday".to_string(),
                items: vec![MenuItem {
                    name: "Sambar Rice".to_string(),
                    description: None,
                    image_url: None,
                    is_veg: true,
                }],
            }])
        });

        let profile = ChefProfileUseCase::new(Arc::new(repo))
            .get_profile(chef_id)
            .await
            .unwrap();

        assert_eq!(profile.chef.name, "Lakshmi Iyer");
        assert_eq!(profile.weekly_menu.len(), 1);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Lakshmi Iyer");
        assert_eq!(json["weekly_menu"][0]["items"][0]["is_veg"], true);
    }

    #[tokio::test]
    async fn unknown_chef_is_not_found() {
        let mut repo = MockChefRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_weekly_menu().never();

        let err = ChefProfileUseCase::new(Arc::new(repo))
            .get_profile(Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Chef not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
