use crate::api_client::ApiClient;
use crate::error::ApiError;
use notehub_common::domain::User;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 16;

/// Client held copy of who is signed in and with what token.
///
/// `is_authenticated` always equals `token.is_some()` and an authenticated session always has a
/// user. The fields are private so the only way to change a session is through [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
}

impl Session {
    fn authenticated(token: String, user: User) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn is_consistent(&self) -> bool {
        self.is_authenticated == self.token.is_some()
            && (!self.is_authenticated || self.user.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    Logout,
    /// The backend answered 401 to one of our requests.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { username: String },
    SignedOut { reason: SignOutReason },
}

struct Inner {
    state: RwLock<Session>,
    path: Option<PathBuf>,
    events: broadcast::Sender<SessionEvent>,
}

/// The single owner of the session. Cloning hands out another handle to the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// A store persisted to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_path(Some(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::with_path(None)
    }

    fn with_path(path: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Session::default()),
                path,
                events,
            }),
        }
    }

    /// Restores the persisted session, if any.
    ///
    /// The stored token is not checked against the backend here. A token that has expired in
    /// the meantime is only noticed when a request comes back with 401.
    pub fn initialize(&self) {
        let Some(path) = &self.inner.path else {
            return;
        };

        if !path.exists() {
            return;
        }

        let restored = fs_err::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|x| serde_json::from_str::<Session>(&x).map_err(|e| e.to_string()));

        match restored {
            Ok(session) if session.is_consistent() => {
                debug!(authenticated = session.is_authenticated, "session restored");
                *self.write() = session;
            }
            Ok(_) => {
                warn!("discarding inconsistent persisted session");
                self.remove_persisted();
            }
            Err(e) => {
                warn!("discarding unreadable persisted session: {e}");
                self.remove_persisted();
            }
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Exchanges credentials for a token, then asks the backend who the token belongs to. The
    /// session only changes once both calls succeed.
    pub async fn login(&self, api: &ApiClient, username: &str, password: &str) -> Result<(), ApiError> {
        let token = api.auth().login(username, password).await?;
        let user = api.users().me_as(&token.access_token).await?;
        self.establish(token.access_token, user);
        Ok(())
    }

    /// Creates the account and signs in with it. The user returned by the register call
    /// becomes the session user.
    pub async fn register(&self, api: &ApiClient, username: &str, password: &str) -> Result<(), ApiError> {
        let user = api.auth().register(username, password).await?;
        let token = api.auth().login(username, password).await?;
        self.establish(token.access_token, user);
        Ok(())
    }

    /// Returns whether there was a session to end.
    pub fn logout(&self) -> bool {
        self.clear(SignOutReason::Logout)
    }

    /// Called by the http layer on 401. Only the first call for a session does anything.
    pub(crate) fn expire(&self) -> bool {
        self.clear(SignOutReason::Expired)
    }

    pub(crate) fn establish(&self, token: String, user: User) {
        let username = user.username.clone();
        let session = Session::authenticated(token, user);
        self.persist(&session);
        *self.write() = session;

        info!(username, "signed in");
        let _ = self.inner.events.send(SessionEvent::SignedIn { username });
    }

    fn clear(&self, reason: SignOutReason) -> bool {
        {
            let mut state = self.write();
            if !state.is_authenticated {
                return false;
            }
            *state = Session::default();
        }

        self.remove_persisted();
        info!(?reason, "signed out");
        let _ = self.inner.events.send(SessionEvent::SignedOut { reason });
        true
    }

    fn persist(&self, session: &Session) {
        let Some(path) = &self.inner.path else {
            return;
        };

        let result = serde_json::to_string(session)
            .map_err(|e| e.to_string())
            .and_then(|x| {
                if let Some(parent) = path.parent() {
                    fs_err::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                fs_err::write(path, x).map_err(|e| e.to_string())
            });

        // The in-memory session stays authoritative, we just won't survive a restart.
        if let Err(e) = result {
            warn!("failed to persist session: {e}");
        }
    }

    fn remove_persisted(&self) {
        let Some(path) = &self.inner.path else {
            return;
        };

        if path.exists() {
            if let Err(e) = fs_err::remove_file(path) {
                warn!("failed to remove persisted session: {e}");
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn alice() -> User {
        User {
            id: 4,
            username: "alice".into(),
            is_admin: false,
        }
    }

    #[test]
    fn starts_anonymous() {
        let store = SessionStore::in_memory();
        let session = store.snapshot();

        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth-storage.json");

        let store = SessionStore::new(&path);
        store.establish("tok-1".into(), alice());

        let restored = SessionStore::new(&path);
        restored.initialize();

        assert_eq!(restored.snapshot(), store.snapshot());
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn logout_clears_persisted_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth-storage.json");

        let store = SessionStore::new(&path);
        store.establish("tok-1".into(), alice());
        assert!(path.exists());

        assert!(store.logout());
        assert!(!path.exists());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn corrupt_entry_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth-storage.json");
        fs_err::write(&path, r#"{"user": null, "token": "abc", "is_authenticated": true}"#).unwrap();

        let store = SessionStore::new(&path);
        store.initialize();

        assert!(!store.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn expiry_signs_out_once() {
        let store = SessionStore::in_memory();
        store.establish("tok-1".into(), alice());
        let mut events = store.subscribe();

        assert!(store.expire());
        assert!(!store.expire());
        assert!(!store.logout());

        assert_eq!(
            events.try_recv(),
            Ok(SessionEvent::SignedOut {
                reason: SignOutReason::Expired
            })
        );
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }
}
