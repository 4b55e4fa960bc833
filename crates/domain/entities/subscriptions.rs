use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::plans::SubscriptionPlan;

/// Row of the `subscriptions` table. `period` holds the plan selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: Option<String>,
    pub period: SubscriptionPlan,
    pub price: i32,
    pub cuisine_type: String,
    pub delivery_address_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub active_until: DateTime<Utc>,
}

impl SubscriptionEntity {
    /// Expiry is derived, never stored.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.active_until <= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsertSubscriptionEntity {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: Option<String>,
    pub period: SubscriptionPlan,
    pub price: i32,
    pub cuisine_type: String,
    pub delivery_address_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub active_until: DateTime<Utc>,
}
