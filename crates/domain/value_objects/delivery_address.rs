use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::delivery_addresses::InsertDeliveryAddressEntity;

/// Chennai pincodes served by the kitchen network.
pub const CHENNAI_PINCODES: RangeInclusive<u32> = 600_001..=600_100;

/// Address form fields exactly as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawAddressFields {
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub landmark: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("valid Chennai pincode required")]
    InvalidPincode,
}

/// Trimmed address ready to be stored for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub area: String,
    pub pincode: String,
    pub landmark: Option<String>,
}

impl NormalizedAddress {
    pub fn into_insert(self, user_id: Uuid) -> InsertDeliveryAddressEntity {
        InsertDeliveryAddressEntity {
            user_id,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            area: self.area,
            pincode: self.pincode,
            landmark: self.landmark,
        }
    }
}

pub fn validate_address(raw: &RawAddressFields) -> Result<NormalizedAddress, ValidationError> {
    let address_line1 = required(&raw.address_line1, "address line 1")?;
    let area = required(&raw.area, "area")?;
    let pincode = required(&raw.pincode, "pincode")?;
    validate_pincode(&pincode)?;

    Ok(NormalizedAddress {
        address_line1,
        address_line2: optional(&raw.address_line2),
        area,
        pincode,
        landmark: optional(&raw.landmark),
    })
}

pub fn validate_pincode(pincode: &str) -> Result<u32, ValidationError> {
    let pincode = pincode.trim();
    if pincode.is_empty() || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPincode);
    }

    let value: u32 = pincode
        .parse()
        .map_err(|_| ValidationError::InvalidPincode)?;

    if CHENNAI_PINCODES.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidPincode)
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
