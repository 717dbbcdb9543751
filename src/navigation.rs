//! Navigation port for login redirects.
//!
//! The original front-end redirects with `window.location.href` from inside
//! HTTP error handling. Here the redirect is an explicit [`NavigationIntent`]
//! handed to an injected [`Navigator`], and the triggering error still
//! travels back through the call's `Result` — the two channels stay
//! separate, so callers decide what happens in which order.

/// A request to move the user to another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub url: String,
}

impl NavigationIntent {
    /// Login-page URL, with the path to come back to after signing in
    /// carried as a URL-encoded `return` parameter.
    pub fn login_redirect(login_url: &str, return_to: Option<&str>) -> Self {
        let url = match return_to {
            Some(path) => format!("{}?return={}", login_url, urlencoding::encode(path)),
            None => login_url.to_string(),
        };
        Self { url }
    }
}

/// Where the user currently is and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// The current page path, used as the return target of login redirects.
    /// `None` when the environment has no notion of a current page.
    fn current_path(&self) -> Option<String> {
        None
    }

    /// Carry out (or record) a navigation. Fire-and-forget: errors from the
    /// operation that triggered the redirect are reported separately.
    fn navigate(&self, intent: &NavigationIntent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_return_path() {
        let intent = NavigationIntent::login_redirect("/connexion", Some("/mon-compte"));
        assert_eq!(intent.url, "/connexion?return=%2Fmon-compte");
    }

    #[test]
    fn test_login_redirect_without_return() {
        let intent = NavigationIntent::login_redirect("/connexion", None);
        assert_eq!(intent.url, "/connexion");
    }

    #[test]
    fn test_login_redirect_encodes_query_characters() {
        let intent =
            NavigationIntent::login_redirect("/connexion", Some("/produits?categorie=bougies"));
        assert_eq!(
            intent.url,
            "/connexion?return=%2Fproduits%3Fcategorie%3Dbougies"
        );
    }
}
