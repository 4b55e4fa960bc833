use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::chefs::{ChefEntity, WeeklyMenuEntity},
        repositories::chefs::ChefRepository,
    },
    infra::supabase::postgrest::{PostgrestTable, SelectQuery},
};

const CHEFS: &str = "chefs";
const WEEKLY_MENU: &str = "weekly_menu";

const WEEK: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Calendar position of a day name; unknown names sort last.
fn weekday_rank(day_of_week: &str) -> usize {
    WEEK.iter()
        .position(|day| day.eq_ignore_ascii_case(day_of_week.trim()))
        .unwrap_or(WEEK.len())
}

pub struct ChefSupabase {
    table: Arc<PostgrestTable>,
}

impl ChefSupabase {
    pub fn new(table: Arc<PostgrestTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ChefRepository for ChefSupabase {
    async fn find_by_id(&self, chef_id: Uuid) -> Result<Option<ChefEntity>> {
        let query = SelectQuery::new().eq("id", chef_id).limit(1);
        let rows: Vec<ChefEntity> = self.table.select(CHEFS, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn weekly_menu(&self, chef_id: Uuid) -> Result<Vec<WeeklyMenuEntity>> {
        let query = SelectQuery::new().eq("chef_id", chef_id);
        let mut days: Vec<WeeklyMenuEntity> = self.table.select(WEEKLY_MENU, &query).await?;
        days.sort_by_key(|day| weekday_rank(&day.day_of_week));
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::supabase::repositories::test_support::anon_table;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn days_rank_in_calendar_order() {
        assert!(weekday_rank("Monday") < weekday_rank("tuesday"));
        assert!(weekday_rank("Sunday") < weekday_rank("Funday"));
    }

    #[tokio::test]
    async fn weekly_menu_is_sorted_by_day() {
        let server = MockServer::start();
        let chef_id = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/weekly_menu")
                .query_param("chef_id", format!("eq.{}", chef_id));
            then.status(200).json_body(json!([
                { "chef_id": chef_id, "day_of_week": "Wednesday", "items": [] },
                { "chef_id": chef_id, "day_of_week": "Monday",
                  "items": [{ "name": "Pongal", "is_veg": true }] }
            ]));
        });

        let menu = ChefSupabase::new(anon_table(&server))
            .weekly_menu(chef_id)
            .await
            .unwrap();

        assert_eq!(menu[0].day_of_week, "Monday");
        assert_eq!(menu[0].items[0].name, "Pongal");
        assert_eq!(menu[1].day_of_week, "Wednesday");
    }

    #[tokio::test]
    async fn unknown_chef_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/chefs");
            then.status(200).json_body(json!([]));
        });

        let chef = ChefSupabase::new(anon_table(&server))
            .find_by_id(Uuid::new_v4())
            .await
            .unwrap();
        assert!(chef.is_none());
    }
}
