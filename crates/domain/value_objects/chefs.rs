use serde::Serialize;

use crate::domain::entities::chefs::{ChefEntity, WeeklyMenuEntity};

/// Chef page: the chef row with their week of menus.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChefProfileDto {
    #[serde(flatten)]
    pub chef: ChefEntity,
    pub weekly_menu: Vec<WeeklyMenuEntity>,
}
