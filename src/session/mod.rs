//! Client Session
//!
//! The one place that reads and writes the persisted client state: auth
//! token, cached profile, theme and the PWA install prompt timestamp.
//! Front ends construct a [`Session`] once at startup and tear it down with
//! [`Session::clear`] on logout or when the server rejects the token.

mod store;

pub use store::{KeyValueStore, MemoryStore};

#[cfg(feature = "native")]
pub use store::FileStore;

use crate::error::{ClientError, ClientResult};
use crate::models::User;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const PWA_DISMISSED_KEY: &str = "pwa-install-dismissed";

/// Route unauthenticated users are sent to
pub const LOGIN_PATH: &str = "/login";

/// How long a dismissed install prompt stays hidden
pub const PWA_PROMPT_COOLDOWN_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Navigation hook invoked when the session expires
pub trait LoginRedirect {
    fn redirect_to_login(&self);
}

/// Redirect that does nothing; for contexts with no router
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedirect;

impl LoginRedirect for NoRedirect {
    fn redirect_to_login(&self) {}
}

/// Persisted client state over a key/value store
#[derive(Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        let session = Self { store };
        if session.token().is_some() {
            tracing::debug!("Restored stored session");
        }
        session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Cached profile; a corrupt entry reads as absent
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached user: {}", e);
                None
            }
        }
    }

    pub fn sign_in(&self, token: &str, user: &User) -> ClientResult<()> {
        self.store.set(TOKEN_KEY, token)?;
        self.set_user(user)?;
        tracing::info!("Signed in as {}", user.email);
        Ok(())
    }

    pub fn set_user(&self, user: &User) -> ClientResult<()> {
        let json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &json)
    }

    /// Drop credentials; theme and install-prompt state survive
    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Handle a 401: clear credentials, navigate to login
    pub fn expire(&self, redirect: &dyn LoginRedirect) -> ClientError {
        if let Err(e) = self.clear() {
            tracing::error!("Failed to clear expired session: {}", e);
        }
        redirect.redirect_to_login();
        ClientError::Unauthorized
    }

    pub fn dark_mode(&self) -> bool {
        self.store.get(DARK_MODE_KEY).as_deref() == Some("true")
    }

    pub fn set_dark_mode(&self, enabled: bool) -> ClientResult<()> {
        self.store
            .set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    pub fn pwa_dismissed_at(&self) -> Option<i64> {
        self.store.get(PWA_DISMISSED_KEY)?.trim().parse().ok()
    }

    pub fn dismiss_pwa_install(&self, now_ms: i64) -> ClientResult<()> {
        self.store.set(PWA_DISMISSED_KEY, &now_ms.to_string())
    }

    pub fn should_offer_pwa_install(&self, now_ms: i64) -> bool {
        match self.pwa_dismissed_at() {
            Some(at) => now_ms - at >= PWA_PROMPT_COOLDOWN_MS,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSettings;
    use std::cell::Cell;

    struct CountingRedirect(Cell<u32>);

    impl LoginRedirect for CountingRedirect {
        fn redirect_to_login(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn user() -> User {
        User {
            id: 1,
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            settings: UserSettings::default(),
        }
    }

    #[test]
    fn test_sign_in_and_clear() {
        let session = Session::new(MemoryStore::new());
        assert!(!session.is_authenticated());

        session.sign_in("tok", &user()).unwrap();
        session.set_dark_mode(true).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.user().unwrap().name, "Budi");

        session.clear().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
        assert!(session.dark_mode());
    }

    #[test]
    fn test_expire_clears_and_redirects() {
        let session = Session::new(MemoryStore::new());
        session.sign_in("tok", &user()).unwrap();
        let redirect = CountingRedirect(Cell::new(0));

        let err = session.expire(&redirect);

        assert_eq!(err, ClientError::Unauthorized);
        assert_eq!(redirect.0.get(), 1);
        assert!(session.store().get(TOKEN_KEY).is_none());
        assert!(session.store().get(USER_KEY).is_none());
    }

    #[test]
    fn test_corrupt_user_reads_as_none() {
        let session = Session::new(MemoryStore::new());
        session.store().set(USER_KEY, "{oops").unwrap();
        assert_eq!(session.user(), None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = Session::new(MemoryStore::new());
        session.store().set(TOKEN_KEY, "").unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_dark_mode_strings() {
        let session = Session::new(MemoryStore::new());
        assert!(!session.dark_mode());
        session.set_dark_mode(false).unwrap();
        assert_eq!(session.store().get(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_pwa_prompt_cooldown() {
        let session = Session::new(MemoryStore::new());
        assert!(session.should_offer_pwa_install(0));

        session.dismiss_pwa_install(1_000).unwrap();
        assert!(!session.should_offer_pwa_install(1_000 + PWA_PROMPT_COOLDOWN_MS - 1));
        assert!(session.should_offer_pwa_install(1_000 + PWA_PROMPT_COOLDOWN_MS));
    }
}
