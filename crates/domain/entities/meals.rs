use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealEntity {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub chef_id: Uuid,
    pub chef_name: String,
    pub cuisine_type: String,
    pub price: i32,
    #[serde(default)]
    pub rating: f64,
}
