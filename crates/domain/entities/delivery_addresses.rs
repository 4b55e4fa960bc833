use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `delivery_addresses` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryAddressEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub area: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertDeliveryAddressEntity {
    pub user_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub area: String,
    pub pincode: String,
    pub landmark: Option<String>,
}
