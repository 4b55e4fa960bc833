use std::sync::Arc;

use anyhow::Result;
use hometaste::domain::{
    entities::meals::MealEntity, repositories::meals::MealRepository,
    value_objects::plans::DEFAULT_CUISINE,
};
use tracing::{error, info};

pub struct MealCatalogUseCase<R>
where
    R: MealRepository + Send + Sync + 'static,
{
    meal_repo: Arc<R>,
}

impl<R> MealCatalogUseCase<R>
where
    R: MealRepository + Send + Sync + 'static,
{
    pub fn new(meal_repo: Arc<R>) -> Self {
        Self { meal_repo }
    }

    /// Blank or "All Cuisines" lists everything.
    pub async fn list(&self, cuisine: Option<&str>) -> Result<Vec<MealEntity>> {
        let cuisine = cuisine
            .map(str::trim)
            .filter(|cuisine| !cuisine.is_empty() && !cuisine.eq_ignore_ascii_case(DEFAULT_CUISINE))
            .map(str::to_string);

        let meals = self
            .meal_repo
            .list(cuisine.clone())
            .await
            .inspect_err(|err| error!(db_error = ?err, ?cuisine, "meals: listing failed"))?;

        info!(?cuisine, count = meals.len(), "meals: catalog loaded");
        Ok(meals)
    }
}
