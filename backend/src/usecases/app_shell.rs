use std::sync::{Arc, Mutex};

use hometaste::domain::{
    repositories::auth::AuthBackend,
    session_events::{SessionEvent, SessionSubscription},
    value_objects::identity::Identity,
};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Current identity of one client, kept in step with session-change events
/// from mount until unmount.
pub struct AppShell {
    identity: Arc<watch::Sender<Option<Identity>>>,
    subscription: Mutex<Option<SessionSubscription>>,
}

impl AppShell {
    pub async fn mount<A>(auth: &A) -> Self
    where
        A: AuthBackend + ?Sized,
    {
        let (sender, _) = watch::channel(None);
        let identity = Arc::new(sender);

        // Register before seeding so no sign-in between the two is missed.
        let sink = Arc::clone(&identity);
        let subscription = auth.on_session_change(Arc::new(move |event: &SessionEvent| {
            debug!(event = event.name(), "app_shell: session changed");
            sink.send_replace(event.identity().cloned());
        }));

        match auth.get_session().await {
            Ok(session) => {
                identity.send_replace(session.map(|session| session.identity));
            }
            Err(err) => {
                warn!(error = ?err, "app_shell: seeding identity failed");
            }
        }

        Self {
            identity,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock_subscription().is_some()
    }

    /// Stops tracking session changes. The last known identity stays readable.
    pub fn unmount(&self) {
        if let Some(subscription) = self.lock_subscription().take() {
            subscription.unsubscribe();
            debug!("app_shell: unmounted");
        }
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<SessionSubscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{Duration, Utc};
    use hometaste::domain::{
        repositories::auth::MockAuthBackend, session_events::SessionEvents,
        value_objects::identity::Session,
    };
    use uuid::Uuid;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            display_name: Some(name.to_string()),
            email: None,
        }
    }

    fn backend_with(events: &SessionEvents, session: Option<Session>) -> MockAuthBackend {
        let mut auth = MockAuthBackend::new();
        let hub = events.clone();
        auth.expect_on_session_change()
            .times(1)
            .returning(move |handler| hub.subscribe(handler));
        auth.expect_get_session()
            .returning(move || Ok(session.clone()));
        auth
    }

    #[tokio::test]
    async fn seeds_identity_from_persisted_session() {
        let events = SessionEvents::new();
        let who = identity("Lakshmi");
        let auth = backend_with(
            &events,
            Some(Session {
                access_token: "a".to_string(),
                refresh_token: None,
                expires_at: Utc::now() + Duration::hours(1),
                identity: who.clone(),
            }),
        );

        let shell = AppShell::mount(&auth).await;
        assert_eq!(shell.current_identity(), Some(who));
        assert!(shell.is_mounted());
    }

    #[tokio::test]
    async fn follows_sign_in_and_sign_out() {
        let events = SessionEvents::new();
        let auth = backend_with(&events, None);
        let shell = AppShell::mount(&auth).await;
        let mut watcher = shell.watch();
        assert_eq!(shell.current_identity(), None);

        let who = identity("Harpreet");
        events.emit(&SessionEvent::SignedIn(who.clone()));
        assert_eq!(shell.current_identity(), Some(who.clone()));
        assert!(watcher.has_changed().unwrap());
        assert_eq!(*watcher.borrow_and_update(), Some(who));

        events.emit(&SessionEvent::SignedOut);
        assert_eq!(shell.current_identity(), None);
    }

    #[tokio::test]
    async fn unmount_releases_the_subscription() {
        let events = SessionEvents::new();
        let auth = backend_with(&events, None);
        let shell = AppShell::mount(&auth).await;
        assert_eq!(events.handler_count(), 1);

        shell.unmount();
        assert_eq!(events.handler_count(), 0);
        assert!(!shell.is_mounted());

        events.emit(&SessionEvent::SignedIn(identity("Anjali")));
        assert_eq!(shell.current_identity(), None);

        shell.unmount();
    }

    #[tokio::test]
    async fn dropping_the_shell_unregisters() {
        let events = SessionEvents::new();
        let auth = backend_with(&events, None);
        let shell = AppShell::mount(&auth).await;
        drop(shell);
        assert_eq!(events.handler_count(), 0);
    }

    #[tokio::test]
    async fn failed_seed_leaves_no_identity() {
        let events = SessionEvents::new();
        let mut auth = MockAuthBackend::new();
        let hub = events.clone();
        auth.expect_on_session_change()
            .returning(move |handler| hub.subscribe(handler));
        auth.expect_get_session()
            .returning(|| Err(anyhow!("network down")));

        let shell = AppShell::mount(&auth).await;
        assert_eq!(shell.current_identity(), None);
        assert!(shell.is_mounted());
    }
}
