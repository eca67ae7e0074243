use crate::error::StorageError;
use crate::models::UserProfile;
use crate::storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(UserProfile),
    LoggedOut,
    /// Token rejected by the backend; the UI should go to `route`
    LoginRequired { route: &'static str },
}

/// Local auth snapshot (bearer token plus user profile).
///
/// There is no refresh flow: a 401 clears the session unconditionally. The
/// redirect is only announced once until the next login so a burst of
/// failing requests cannot bounce the user in a loop.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    redirected: AtomicBool,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            redirected: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read token: {}", e);
                None
            }
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.store.get(USER_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn login(&self, token: &str, user: UserProfile) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&user).map_err(|e| StorageError::Corrupt {
            key: USER_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)?;
        self.redirected.store(false, Ordering::SeqCst);
        info!("Logged in as {}", user.email);
        let _ = self.events.send(SessionEvent::LoggedIn(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.clear()?;
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// React to a 401. Returns true when this call announced the login redirect.
    pub fn handle_unauthorized(&self) -> bool {
        if let Err(e) = self.clear() {
            warn!("Failed to clear session after 401: {}", e);
        }
        if self.redirected.swap(true, Ordering::SeqCst) {
            return false;
        }
        warn!("Session rejected by backend, redirecting to {}", LOGIN_ROUTE);
        let _ = self.events.send(SessionEvent::LoginRequired { route: LOGIN_ROUTE });
        true
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Nguyễn Văn A".into(),
            email: "a@viestay.vn".into(),
            role: Some("tenant".into()),
        }
    }

    #[test]
    fn test_login_and_logout() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(!session.is_authenticated());

        session.login("tok", user()).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.user(), Some(user()));

        session.logout().unwrap();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_unauthorized_redirects_once() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session.login("tok", user()).unwrap();
        let mut rx = session.subscribe();

        assert!(session.handle_unauthorized());
        assert!(!session.handle_unauthorized());
        assert!(!session.is_authenticated());

        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoginRequired { route: LOGIN_ROUTE }
        );
        assert!(rx.try_recv().is_err());

        // A fresh login re-arms the guard
        session.login("tok2", user()).unwrap();
        assert!(session.handle_unauthorized());
    }
}
