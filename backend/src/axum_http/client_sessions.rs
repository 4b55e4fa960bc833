//! Per-browser client contexts.
//!
//! Every browser gets an opaque `hometaste_session` cookie naming one
//! [`ClientContext`]: its own auth client and persisted session, the mounted
//! app shell, the repositories bound to that session and the subscription
//! flow in progress.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use hometaste::{
    domain::value_objects::subscriptions::SubscriptionFlow,
    infra::supabase::{
        SupabaseAuth, SupabaseClient,
        postgrest::PostgrestTable,
        repositories::{
            chefs::ChefSupabase, delivery_addresses::DeliveryAddressSupabase, meals::MealSupabase,
            subscriptions::SubscriptionSupabase,
        },
    },
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::usecases::{
    address_intake::AddressIntakeUseCase, app_shell::AppShell, chef_profiles::ChefProfileUseCase,
    meals::MealCatalogUseCase, session_resolver::SessionResolver,
    subscription_builder::SubscriptionBuilder,
};

pub const SESSION_COOKIE: &str = "hometaste_session";

pub struct ClientContext {
    pub id: Uuid,
    pub auth: Arc<SupabaseAuth>,
    pub shell: AppShell,
    pub session_resolver: SessionResolver<SupabaseAuth>,
    pub address_intake: AddressIntakeUseCase<DeliveryAddressSupabase>,
    pub subscription_builder: SubscriptionBuilder<SubscriptionSupabase, DeliveryAddressSupabase>,
    pub chef_profiles: ChefProfileUseCase<ChefSupabase>,
    pub meal_catalog: MealCatalogUseCase<MealSupabase>,
    pub flow: Mutex<SubscriptionFlow>,
    in_flight: AtomicBool,
    created_at: Instant,
}

impl ClientContext {
    pub async fn new(id: Uuid, supabase: Arc<SupabaseClient>, jwt_secret: Option<String>) -> Self {
        let auth = Arc::new(SupabaseAuth::new(Arc::clone(&supabase)));
        let table = Arc::new(PostgrestTable::new(supabase, Arc::clone(&auth)));
        let address_repo = Arc::new(DeliveryAddressSupabase::new(Arc::clone(&table)));

        Self {
            id,
            shell: AppShell::mount(auth.as_ref()).await,
            session_resolver: SessionResolver::new(Arc::clone(&auth), jwt_secret),
            address_intake: AddressIntakeUseCase::new(Arc::clone(&address_repo)),
            subscription_builder: SubscriptionBuilder::new(
                Arc::new(SubscriptionSupabase::new(Arc::clone(&table))),
                address_repo,
            ),
            chef_profiles: ChefProfileUseCase::new(Arc::new(ChefSupabase::new(Arc::clone(&table)))),
            meal_catalog: MealCatalogUseCase::new(Arc::new(MealSupabase::new(table))),
            flow: Mutex::new(SubscriptionFlow::default()),
            in_flight: AtomicBool::new(false),
            created_at: Instant::now(),
            auth,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.shell.current_identity().is_some()
    }

    /// `None` while another submission from this client is pending.
    pub fn try_begin_submission(&self) -> Option<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard(&self.in_flight))
    }

    fn is_stale_pending(&self, ttl: Duration) -> bool {
        !self.is_authenticated() && self.created_at.elapsed() >= ttl
    }

    /// Never signed in within `ttl`, or holding a session that can no longer
    /// be renewed.
    async fn is_prunable(&self, ttl: Duration) -> bool {
        self.is_stale_pending(ttl) || self.auth.is_session_dead_at(Utc::now()).await
    }
}

pub struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ClientSessions {
    supabase: Arc<SupabaseClient>,
    jwt_secret: Option<String>,
    pending_ttl: Duration,
    secure_cookie: bool,
    contexts: RwLock<HashMap<Uuid, Arc<ClientContext>>>,
}

impl ClientSessions {
    pub fn new(
        supabase: Arc<SupabaseClient>,
        jwt_secret: Option<String>,
        pending_ttl: Duration,
        secure_cookie: bool,
    ) -> Self {
        Self {
            supabase,
            jwt_secret,
            pending_ttl,
            secure_cookie,
            contexts: RwLock::new(HashMap::new()),
        }
    }

    pub async fn find(&self, jar: &CookieJar) -> Option<Arc<ClientContext>> {
        let id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())?;
        self.contexts.read().await.get(&id).cloned()
    }

    /// Existing context for the cookie, or a fresh one with the cookie set.
    pub async fn find_or_create(&self, jar: CookieJar) -> (CookieJar, Arc<ClientContext>) {
        if let Some(context) = self.find(&jar).await {
            return (jar, context);
        }

        let id = Uuid::new_v4();
        let context = Arc::new(
            ClientContext::new(id, Arc::clone(&self.supabase), self.jwt_secret.clone()).await,
        );
        self.contexts
            .write()
            .await
            .insert(id, Arc::clone(&context));
        debug!(client_id = %id, "client_sessions: context created");

        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie);
        (jar.add(cookie), context)
    }

    /// Drops contexts that never signed in within the pending TTL and those
    /// whose session expired without a refresh token.
    pub async fn prune_pending(&self) -> usize {
        let mut contexts = self.contexts.write().await;
        let mut stale = Vec::new();
        for (id, context) in contexts.iter() {
            if context.is_prunable(self.pending_ttl).await {
                stale.push(*id);
            }
        }

        for id in &stale {
            if let Some(context) = contexts.remove(id) {
                context.shell.unmount();
            }
        }

        if !stale.is_empty() {
            info!(pruned = stale.len(), remaining = contexts.len(), "client_sessions: pruned pending contexts");
        }
        stale.len()
    }

    pub async fn unmount_all(&self) {
        let mut contexts = self.contexts.write().await;
        for context in contexts.values() {
            context.shell.unmount();
        }
        info!(count = contexts.len(), "client_sessions: all shells unmounted");
        contexts.clear();
    }

    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }
}
