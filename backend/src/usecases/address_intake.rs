use std::sync::Arc;

use axum::http::StatusCode;
use hometaste::domain::{
    entities::delivery_addresses::DeliveryAddressEntity,
    repositories::delivery_addresses::DeliveryAddressRepository,
    value_objects::{
        delivery_address::{NormalizedAddress, RawAddressFields, ValidationError, validate_address},
        identity::Identity,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum AddressIntakeError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AddressIntakeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AddressIntakeError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AddressIntakeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AddressIntakeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AddressIntakeError>;

pub struct AddressIntakeUseCase<R>
where
    R: DeliveryAddressRepository + Send + Sync + 'static,
{
    address_repo: Arc<R>,
}

impl<R> AddressIntakeUseCase<R>
where
    R: DeliveryAddressRepository + Send + Sync + 'static,
{
    pub fn new(address_repo: Arc<R>) -> Self {
        Self { address_repo }
    }

    pub fn validate(&self, raw: &RawAddressFields) -> Result<NormalizedAddress, ValidationError> {
        validate_address(raw)
    }

    /// Validates and persists `raw` for `identity`, returning the stored row.
    pub async fn submit(
        &self,
        identity: Option<&Identity>,
        raw: RawAddressFields,
    ) -> UseCaseResult<DeliveryAddressEntity> {
        let identity = identity.ok_or_else(|| {
            warn!("address_intake: submission without identity");
            AddressIntakeError::Unauthenticated
        })?;
        let user_id = identity.user_id;

        let normalized = self.validate(&raw).map_err(|err| {
            info!(%user_id, reason = %err, "address_intake: address rejected");
            err
        })?;

        let stored = self
            .address_repo
            .insert(normalized.into_insert(user_id))
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "address_intake: insert failed");
                AddressIntakeError::Internal(err)
            })?;

        info!(%user_id, address_id = %stored.id, "address_intake: address saved");
        Ok(stored)
    }

    pub async fn list_addresses(
        &self,
        identity: &Identity,
    ) -> UseCaseResult<Vec<DeliveryAddressEntity>> {
        let user_id = identity.user_id;
        let addresses = self
            .address_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "address_intake: listing failed");
                AddressIntakeError::Internal(err)
            })?;

        info!(%user_id, count = addresses.len(), "address_intake: addresses loaded");
        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;
    use hometaste::domain::{
        entities::delivery_addresses::InsertDeliveryAddressEntity,
        repositories::delivery_addresses::MockDeliveryAddressRepository,
    };
    use uuid::Uuid;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            display_name: None,
            email: None,
        }
    }

    fn raw(pincode: &str) -> RawAddressFields {
        RawAddressFields {
            address_line1: "  12 Beach Rd ".to_string(),
            address_line2: "   ".to_string(),
            area: "Adyar".to_string(),
            pincode: pincode.to_string(),
            landmark: "Near temple".to_string(),
        }
    }

    fn stored_from(insert: InsertDeliveryAddressEntity) -> DeliveryAddressEntity {
        DeliveryAddressEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            address_line1: insert.address_line1,
            address_line2: insert.address_line2,
            area: insert.area,
            pincode: insert.pincode,
            landmark: insert.landmark,
            created_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn valid_address_round_trips_normalized() {
        let who = identity();
        let user_id = who.user_id;

        let mut repo = MockDeliveryAddressRepository::new();
        repo.expect_insert()
            .withf(move |insert| {
                insert.user_id == user_id
                    && insert.address_line1 == "12 Beach Rd"
                    && insert.address_line2.is_none()
                    && insert.pincode == "600050"
                    && insert.landmark.as_deref() == Some("Near temple")
            })
            .times(1)
            .returning(|insert| Ok(stored_from(insert)));

        let usecase = AddressIntakeUseCase::new(Arc::new(repo));
        let stored = usecase.submit(Some(&who), raw(" 600050 ")).await.unwrap();

        assert_eq!(stored.user_id, user_id);
        assert_eq!(stored.address_line1, "12 Beach Rd");
        assert_eq!(stored.area, "Adyar");
        assert_eq!(stored.pincode, "600050");
        assert_eq!(stored.address_line2, None);
    }

    #[tokio::test]
    async fn out_of_range_pincodes_never_reach_backend() {
        for pincode in ["599999", "600101", "abcde", ""] {
            let mut repo = MockDeliveryAddressRepository::new();
            repo.expect_insert().never();

            let usecase = AddressIntakeUseCase::new(Arc::new(repo));
            let err = usecase.submit(Some(&identity()), raw(pincode)).await.unwrap_err();

            assert!(matches!(err, AddressIntakeError::Validation(_)), "{pincode}");
            assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn invalid_pincode_message_is_user_facing() {
        let mut repo = MockDeliveryAddressRepository::new();
        repo.expect_insert().never();

        let usecase = AddressIntakeUseCase::new(Arc::new(repo));
        let err = usecase.submit(Some(&identity()), raw("600101")).await.unwrap_err();
        assert_eq!(err.to_string(), "valid Chennai pincode required");
    }

    #[tokio::test]
    async fn missing_identity_is_rejected_first() {
        let mut repo = MockDeliveryAddressRepository::new();
        repo.expect_insert().never();

        let usecase = AddressIntakeUseCase::new(Arc::new(repo));
        let err = usecase.submit(None, raw("600050")).await.unwrap_err();

        assert!(matches!(err, AddressIntakeError::Unauthenticated));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn backend_failure_is_internal() {
        let mut repo = MockDeliveryAddressRepository::new();
        repo.expect_insert()
            .returning(|_| Err(anyhow!("rls violation")));

        let usecase = AddressIntakeUseCase::new(Arc::new(repo));
        let err = usecase.submit(Some(&identity()), raw("600001")).await.unwrap_err();

        assert!(matches!(err, AddressIntakeError::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn lists_addresses_for_identity() {
        let who = identity();
        let user_id = who.user_id;

        let mut repo = MockDeliveryAddressRepository::new();
        repo.expect_list_by_user()
            .with(mockall::predicate::eq(user_id))
            .returning(|_| Ok(vec![]));

        let usecase = AddressIntakeUseCase::new(Arc::new(repo));
        assert!(usecase.list_addresses(&who).await.unwrap().is_empty());
    }
}
