use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::{enums::subscription_statuses::SubscriptionStatus, plans::SubscriptionPlan},
};

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan: String,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    /// Falls back to the address captured earlier in the same flow.
    #[serde(default)]
    pub delivery_address_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub period: SubscriptionPlan,
    pub price: i32,
    pub cuisine_type: String,
    pub delivery_address_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub active_until: DateTime<Utc>,
    pub status: SubscriptionStatus,
}

impl SubscriptionDto {
    pub fn from_entity(entity: SubscriptionEntity, now: DateTime<Utc>) -> Self {
        Self {
            status: SubscriptionStatus::derive(entity.active_until, now),
            id: entity.id,
            period: entity.period,
            price: entity.price,
            cuisine_type: entity.cuisine_type,
            delivery_address_id: entity.delivery_address_id,
            created_at: entity.created_at,
            active_until: entity.active_until,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a delivery address must be captured first")]
    AddressMissing,
    #[error("no plan has been chosen")]
    PlanMissing,
    #[error("a subscription is already being created")]
    InProgress,
}

/// Progress of the subscribe dialog:
/// no address → address captured → plan chosen → subscription created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubscriptionFlow {
    #[default]
    NoAddress,
    AddressCaptured {
        delivery_address_id: Uuid,
    },
    PlanChosen {
        delivery_address_id: Uuid,
        plan: SubscriptionPlan,
        cuisine_type: String,
    },
    Created {
        subscription_id: Uuid,
    },
}

impl SubscriptionFlow {
    /// Starts a new flow, or swaps the address before a plan is picked.
    pub fn capture_address(&mut self, delivery_address_id: Uuid) -> Result<(), FlowError> {
        if matches!(self, SubscriptionFlow::PlanChosen { .. }) {
            return Err(FlowError::InProgress);
        }
        *self = SubscriptionFlow::AddressCaptured {
            delivery_address_id,
        };
        Ok(())
    }

    pub fn choose_plan(
        &mut self,
        plan: SubscriptionPlan,
        cuisine_type: String,
    ) -> Result<Uuid, FlowError> {
        match self {
            SubscriptionFlow::AddressCaptured {
                delivery_address_id,
            } => {
                let delivery_address_id = *delivery_address_id;
                *self = SubscriptionFlow::PlanChosen {
                    delivery_address_id,
                    plan,
                    cuisine_type,
                };
                Ok(delivery_address_id)
            }
            SubscriptionFlow::PlanChosen { .. } => Err(FlowError::InProgress),
            SubscriptionFlow::NoAddress | SubscriptionFlow::Created { .. } => {
                Err(FlowError::AddressMissing)
            }
        }
    }

    pub fn complete(&mut self, subscription_id: Uuid) -> Result<(), FlowError> {
        match self {
            SubscriptionFlow::PlanChosen { .. } => {
                *self = SubscriptionFlow::Created { subscription_id };
                Ok(())
            }
            _ => Err(FlowError::PlanMissing),
        }
    }

    /// Dialog dismissed or a step failed.
    pub fn abandon(&mut self) {
        *self = SubscriptionFlow::NoAddress;
    }

    pub fn delivery_address_id(&self) -> Option<Uuid> {
        match self {
            SubscriptionFlow::AddressCaptured {
                delivery_address_id,
            }
            | SubscriptionFlow::PlanChosen {
                delivery_address_id,
                ..
            } => Some(*delivery_address_id),
            SubscriptionFlow::NoAddress | SubscriptionFlow::Created { .. } => None,
        }
    }
}
