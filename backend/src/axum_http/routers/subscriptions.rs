use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::Utc;
use hometaste::domain::value_objects::subscriptions::{
    CreateSubscriptionRequest, FlowError, SubscriptionDto, SubscriptionFlow,
};
use tokio::sync::MutexGuard;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    axum_http::{
        error_responses::AppError, extractors::AuthenticatedClient, http_serve::AppState,
    },
    usecases::subscription_builder::parse_plan,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/flow", delete(abandon_flow))
        .with_state(state)
}

pub async fn list_subscriptions(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
) -> Result<impl IntoResponse, AppError> {
    let subscriptions = client
        .context
        .subscription_builder
        .list_subscriptions(&client.identity)
        .await?;

    Ok(Json(subscriptions))
}

pub async fn create_subscription(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let context = &client.context;
    let _submission = context
        .try_begin_submission()
        .ok_or_else(|| AppError::Conflict("a submission is already in progress".to_string()))?;

    let plan = parse_plan(&request.plan)?;
    let mut flow = context.flow.lock().await;
    if let Some(delivery_address_id) = request.delivery_address_id {
        flow.capture_address(delivery_address_id)?;
    }
    let delivery_address_id =
        flow.choose_plan(plan, request.cuisine_type.clone().unwrap_or_default())?;
    let mut flow = PlanChosenFlow::new(flow);

    let subscription = context
        .subscription_builder
        .build(
            Some(&client.identity),
            plan,
            request.cuisine_type.as_deref(),
            delivery_address_id,
        )
        .await?;
    flow.complete(subscription.id)?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionDto::from_entity(subscription, Utc::now())),
    ))
}

/// Flow sitting in `PlanChosen` while the build runs. Dropped without a
/// successful `complete` (error, timeout or disconnect), it abandons the flow.
struct PlanChosenFlow<'a> {
    flow: MutexGuard<'a, SubscriptionFlow>,
    completed: bool,
}

impl<'a> PlanChosenFlow<'a> {
    fn new(flow: MutexGuard<'a, SubscriptionFlow>) -> Self {
        Self {
            flow,
            completed: false,
        }
    }

    fn complete(&mut self, subscription_id: Uuid) -> Result<(), FlowError> {
        self.flow.complete(subscription_id)?;
        self.completed = true;
        Ok(())
    }
}

impl Drop for PlanChosenFlow<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("subscriptions: build did not finish, flow abandoned");
            self.flow.abandon();
        }
    }
}

/// Subscribe dialog dismissed.
pub async fn abandon_flow(
    State(_state): State<Arc<AppState>>,
    client: AuthenticatedClient,
) -> StatusCode {
    client.context.flow.lock().await.abandon();
    info!(user_id = %client.identity.user_id, "subscriptions: flow abandoned");
    StatusCode::NO_CONTENT
}
