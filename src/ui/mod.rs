//! UI reflection of the authentication state.
//!
//! The original front-end queries the DOM for elements flagged
//! `data-auth-required` / `data-auth-guest` and for user-text slots
//! (`data-user-name`, `data-user-email`, `data-user-first-name`). Those five
//! operations are the [`AuthUi`] port here; [`update_auth_ui`] drives them
//! from the current session state.

use crate::auth::SessionStore;

/// The five UI operations consumed when reflecting auth state.
pub trait AuthUi {
    /// Show or hide everything flagged "signed-in users only".
    fn show_authenticated(&self, visible: bool);

    /// Show or hide everything flagged "guests only".
    fn show_guest(&self, visible: bool);

    /// Inject the user's full name into its display slots.
    fn set_user_name(&self, name: &str);

    /// Inject the user's email into its display slots.
    fn set_user_email(&self, email: &str);

    /// Inject the user's first name into its display slots.
    fn set_user_first_name(&self, first_name: &str);
}

/// Toggle the two visibility groups inversely from the session state and
/// inject the cached profile's text fields. Injection is skipped when no
/// profile is cached; visibility always updates.
pub fn update_auth_ui(session: &SessionStore, ui: &dyn AuthUi) {
    let authenticated = session.is_authenticated();
    ui.show_authenticated(authenticated);
    ui.show_guest(!authenticated);

    if let Some(user) = session.current_user() {
        ui.set_user_name(&user.full_name());
        ui.set_user_email(&user.email);
        ui.set_user_first_name(&user.first_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::storage::MemoryStorage;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeUi {
        authenticated_visible: Cell<Option<bool>>,
        guest_visible: Cell<Option<bool>>,
        name: RefCell<Option<String>>,
        email: RefCell<Option<String>>,
        first_name: RefCell<Option<String>>,
    }

    impl AuthUi for FakeUi {
        fn show_authenticated(&self, visible: bool) {
            self.authenticated_visible.set(Some(visible));
        }

        fn show_guest(&self, visible: bool) {
            self.guest_visible.set(Some(visible));
        }

        fn set_user_name(&self, name: &str) {
            *self.name.borrow_mut() = Some(name.to_string());
        }

        fn set_user_email(&self, email: &str) {
            *self.email.borrow_mut() = Some(email.to_string());
        }

        fn set_user_first_name(&self, first_name: &str) {
            *self.first_name.borrow_mut() = Some(first_name.to_string());
        }
    }

    fn memory_session() -> SessionStore {
        SessionStore::new(Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_guest_state_toggles_without_injection() {
        let session = memory_session();
        let ui = FakeUi::default();

        update_auth_ui(&session, &ui);

        assert_eq!(ui.authenticated_visible.get(), Some(false));
        assert_eq!(ui.guest_visible.get(), Some(true));
        assert!(ui.name.borrow().is_none());
        assert!(ui.email.borrow().is_none());
    }

    #[test]
    fn test_authenticated_state_injects_profile_text() {
        let session = memory_session();
        let user = UserProfile {
            email: "jean.dupont@example.com".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            ..Default::default()
        };
        session.set_auth("T", Some(&user), false).unwrap();
        let ui = FakeUi::default();

        update_auth_ui(&session, &ui);

        assert_eq!(ui.authenticated_visible.get(), Some(true));
        assert_eq!(ui.guest_visible.get(), Some(false));
        assert_eq!(ui.name.borrow().as_deref(), Some("Jean Dupont"));
        assert_eq!(
            ui.email.borrow().as_deref(),
            Some("jean.dupont@example.com")
        );
        assert_eq!(ui.first_name.borrow().as_deref(), Some("Jean"));
    }

    #[test]
    fn test_token_without_profile_toggles_but_skips_injection() {
        let session = memory_session();
        session.set_auth("T", None, false).unwrap();
        let ui = FakeUi::default();

        update_auth_ui(&session, &ui);

        assert_eq!(ui.authenticated_visible.get(), Some(true));
        assert_eq!(ui.guest_visible.get(), Some(false));
        assert!(ui.name.borrow().is_none());
        assert!(ui.first_name.borrow().is_none());
    }
}
