//! Browser session storage
//!
//! `localStorage` behind [`kioku::KeyValueStore`], so the browser keeps the
//! same keys the terminal client keeps in its session file.

use kioku::{ClientError, ClientResult, KeyValueStore, LoginRedirect, Session};

/// `window.localStorage`; every call looks the storage up again
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let storage =
            local_storage().ok_or_else(|| ClientError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let storage =
            local_storage().ok_or_else(|| ClientError::Storage("localStorage unavailable".into()))?;
        storage
            .remove_item(key)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }
}

/// The browser session
pub fn session() -> Session<LocalStorage> {
    Session::new(LocalStorage)
}

/// Full page load of the login route, which also drops in-memory state
pub struct BrowserRedirect;

impl LoginRedirect for BrowserRedirect {
    fn redirect_to_login(&self) {
        if let Some(window) = web_sys::window() {
            let on_login = window
                .location()
                .pathname()
                .map(|p| p == kioku::session::LOGIN_PATH)
                .unwrap_or(false);
            if !on_login {
                let _ = window.location().set_href(kioku::session::LOGIN_PATH);
            }
        }
    }
}

/// Milliseconds since the epoch
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use kioku::session::{TOKEN_KEY, USER_KEY};
    use kioku::{User, UserSettings};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_keys_in_local_storage() {
        let session = session();
        let user = User {
            id: 7,
            name: "Sari".to_string(),
            email: "sari@example.com".to_string(),
            settings: UserSettings::default(),
        };

        session.sign_in("browser-token", &user).unwrap();
        assert_eq!(LocalStorage.get(TOKEN_KEY).as_deref(), Some("browser-token"));
        assert_eq!(session.user().unwrap().name, "Sari");

        session.set_dark_mode(true).unwrap();
        session.clear().unwrap();

        assert!(LocalStorage.get(TOKEN_KEY).is_none());
        assert!(LocalStorage.get(USER_KEY).is_none());
        assert!(session.dark_mode());
    }

    #[wasm_bindgen_test]
    fn test_install_prompt_cooldown() {
        let session = session();
        let now = now_ms();

        session.dismiss_pwa_install(now).unwrap();
        assert!(!session.should_offer_pwa_install(now + 1000));
        assert!(session.should_offer_pwa_install(now + kioku::session::PWA_PROMPT_COOLDOWN_MS));
    }
}
