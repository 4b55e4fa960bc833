use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{entities::meals::MealEntity, repositories::meals::MealRepository},
    infra::supabase::postgrest::{Direction, PostgrestTable, SelectQuery},
};

const TABLE: &str = "meals";

pub struct MealSupabase {
    table: Arc<PostgrestTable>,
}

impl MealSupabase {
    pub fn new(table: Arc<PostgrestTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl MealRepository for MealSupabase {
    async fn list(&self, cuisine_type: Option<String>) -> Result<Vec<MealEntity>> {
        let mut query = SelectQuery::new().order("rating", Direction::Desc);
        if let Some(cuisine_type) = cuisine_type {
            query = query.eq("cuisine_type", cuisine_type);
        }

        self.table.select(TABLE, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::supabase::repositories::test_support::anon_table;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn cuisine_filter_is_forwarded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/meals")
                .query_param("cuisine_type", "eq.Bengali");
            then.status(200).json_body(json!([{
                "id": Uuid::new_v4(),
                "title": "Shorshe Ilish",
                "chef_id": Uuid::new_v4(),
                "chef_name": "Ananya",
                "cuisine_type": "Bengali",
                "price": 320,
                "rating": 4.8
            }]));
        });

        let meals = MealSupabase::new(anon_table(&server))
            .list(Some("Bengali".to_string()))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].image_url, None);
    }

    #[tokio::test]
    async fn listing_is_ordered_by_rating() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/meals")
                .query_param("order", "rating.desc");
            then.status(200).json_body(json!([]));
        });

        let meals = MealSupabase::new(anon_table(&server)).list(None).await.unwrap();
        mock.assert();
        assert!(meals.is_empty());
    }
}
