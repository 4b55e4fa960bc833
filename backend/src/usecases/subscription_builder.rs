use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use hometaste::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::{
        delivery_addresses::DeliveryAddressRepository, subscriptions::SubscriptionRepository,
    },
    value_objects::{
        identity::Identity,
        plans::{DEFAULT_CUISINE, SubscriptionPlan},
        subscriptions::SubscriptionDto,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("User not authenticated")]
    Rejected,
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
    #[error("delivery address not found")]
    AddressNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::Rejected => StatusCode::UNAUTHORIZED,
            SubscriptionError::UnknownPlan(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubscriptionError::AddressNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub fn parse_plan(raw: &str) -> UseCaseResult<SubscriptionPlan> {
    SubscriptionPlan::from_str(raw).ok_or_else(|| SubscriptionError::UnknownPlan(raw.to_string()))
}

fn cuisine_or_default(cuisine_preference: Option<&str>) -> String {
    cuisine_preference
        .map(str::trim)
        .filter(|cuisine| !cuisine.is_empty())
        .unwrap_or(DEFAULT_CUISINE)
        .to_string()
}

pub struct SubscriptionBuilder<S, A>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    A: DeliveryAddressRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    address_repo: Arc<A>,
}

impl<S, A> SubscriptionBuilder<S, A>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    A: DeliveryAddressRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, address_repo: Arc<A>) -> Self {
        Self {
            subscription_repo,
            address_repo,
        }
    }

    pub async fn build(
        &self,
        identity: Option<&Identity>,
        plan: SubscriptionPlan,
        cuisine_preference: Option<&str>,
        delivery_address_id: Uuid,
    ) -> UseCaseResult<SubscriptionEntity> {
        self.build_at(identity, plan, cuisine_preference, delivery_address_id, Utc::now())
            .await
    }

    /// `build` with an explicit creation instant.
    pub async fn build_at(
        &self,
        identity: Option<&Identity>,
        plan: SubscriptionPlan,
        cuisine_preference: Option<&str>,
        delivery_address_id: Uuid,
        now: DateTime<Utc>,
    ) -> UseCaseResult<SubscriptionEntity> {
        let identity = identity.ok_or_else(|| {
            warn!(%plan, "subscriptions: build without identity");
            SubscriptionError::Rejected
        })?;
        let user_id = identity.user_id;

        let owned = self
            .address_repo
            .find_owned(delivery_address_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %delivery_address_id, db_error = ?err, "subscriptions: address lookup failed");
                SubscriptionError::Internal(err)
            })?;
        if owned.is_none() {
            warn!(%user_id, %delivery_address_id, "subscriptions: address not owned by user");
            return Err(SubscriptionError::AddressNotFound);
        }

        let record = InsertSubscriptionEntity {
            user_id,
            user_name: identity.display_name_or_anonymous(),
            user_email: identity.email.clone(),
            period: plan,
            price: plan.price(),
            cuisine_type: cuisine_or_default(cuisine_preference),
            delivery_address_id,
            created_at: now,
            active_until: now + plan.duration(),
        };

        let stored = self
            .subscription_repo
            .insert(record)
            .await
            .map_err(|err| {
                error!(%user_id, %plan, db_error = ?err, "subscriptions: insert failed");
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = %stored.id,
            %plan,
            price = stored.price,
            active_until = %stored.active_until,
            "subscriptions: subscription created"
        );
        Ok(stored)
    }

    /// Newest first, each with its derived status.
    pub async fn list_subscriptions(
        &self,
        identity: &Identity,
    ) -> UseCaseResult<Vec<SubscriptionDto>> {
        let user_id = identity.user_id;
        let subscriptions = self
            .subscription_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: listing failed");
                SubscriptionError::Internal(err)
            })?;

        let now = Utc::now();
        info!(%user_id, count = subscriptions.len(), "subscriptions: subscriptions loaded");
        Ok(subscriptions
            .into_iter()
            .map(|entity| SubscriptionDto::from_entity(entity, now))
            .collect())
    }
}
