//! Session-change notifications.
//!
//! The auth backend emits an event on every sign-in, token refresh and
//! sign-out. Interested parties register a handler and keep the returned
//! [`SessionSubscription`]; dropping or unsubscribing it removes the handler.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::debug;

use crate::domain::value_objects::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Identity),
    TokenRefreshed(Identity),
    SignedOut,
}

impl SessionEvent {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionEvent::SignedIn(identity) | SessionEvent::TokenRefreshed(identity) => {
                Some(identity)
            }
            SessionEvent::SignedOut => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn(_) => "signed_in",
            SessionEvent::TokenRefreshed(_) => "token_refreshed",
            SessionEvent::SignedOut => "signed_out",
        }
    }
}

pub type SessionHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, SessionHandler)>,
}

#[derive(Clone, Default)]
pub struct SessionEvents {
    registry: Arc<Mutex<Registry>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: SessionHandler) -> SessionSubscription {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, handler));
        debug!(subscription_id = id, "session_events: handler registered");

        SessionSubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Handlers run on the caller's task, outside the registry lock.
    pub fn emit(&self, event: &SessionEvent) {
        let handlers: Vec<SessionHandler> = lock(&self.registry)
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        debug!(
            event = event.name(),
            handler_count = handlers.len(),
            "session_events: dispatching"
        );

        for handler in handlers {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

/// Registration handle. Removing the handler happens on drop.
#[must_use = "dropping the subscription unregisters the handler"]
pub struct SessionSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl SessionSubscription {
    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.retain(|(id, _)| *id != self.id);
            debug!(subscription_id = self.id, "session_events: handler released");
        }
    }
}

impl std::fmt::Debug for SessionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSubscription")
            .field("id", &self.id)
            .finish()
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A handler never runs while the lock is held, so a poisoned guard still
    // holds a consistent handler list.
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn counting_handler(counter: &Arc<AtomicUsize>) -> SessionHandler {
        let counter = Arc::clone(counter);
        Arc::new(move |_event: &SessionEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            display_name: None,
            email: None,
        }
    }

    #[test]
    fn every_registered_handler_sees_each_event() {
        let events = SessionEvents::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let _a = events.subscribe(counting_handler(&first));
        let _b = events.subscribe(counting_handler(&second));

        events.emit(&SessionEvent::SignedIn(identity()));
        events.emit(&SessionEvent::SignedOut);

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let events = SessionEvents::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let subscription = events.subscribe(counting_handler(&counter));
        events.emit(&SessionEvent::SignedOut);
        subscription.unsubscribe();
        events.emit(&SessionEvent::SignedOut);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(events.handler_count(), 0);
    }

    #[test]
    fn dropping_the_handle_unregisters() {
        let events = SessionEvents::new();
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _subscription = events.subscribe(counting_handler(&counter));
            assert_eq!(events.handler_count(), 1);
        }
        assert_eq!(events.handler_count(), 0);
    }

    #[test]
    fn handle_outliving_the_hub_is_harmless() {
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let events = SessionEvents::new();
            events.subscribe(counting_handler(&counter))
        };
        subscription.unsubscribe();
    }

    #[test]
    fn event_exposes_identity() {
        let who = identity();
        assert_eq!(SessionEvent::SignedIn(who.clone()).identity(), Some(&who));
        assert_eq!(SessionEvent::SignedOut.identity(), None);
    }
}
