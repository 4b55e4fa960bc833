use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChefEntity {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub cuisine_specialties: Vec<String>,
    #[serde(default)]
    pub years_of_experience: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: i32,
}

/// One day of a chef's menu; `items` is stored as JSON in the `weekly_menu` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyMenuEntity {
    pub chef_id: Uuid,
    pub day_of_week: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_veg: bool,
}
