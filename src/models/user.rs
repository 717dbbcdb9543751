use serde::{Deserialize, Serialize};

/// Account profile as returned by the API.
///
/// The profile is stored client-side as serialized JSON and re-read on every
/// UI refresh, so deserialization stays tolerant: only `email` is required,
/// everything else defaults when the server omits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: None,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            is_active: true,
            is_admin: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl UserProfile {
    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Token payload returned by `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Registration payload for `POST /api/auth/register`.
///
/// Matches the server's user-creation contract: password minimum 8 chars is
/// enforced server-side, the client sends it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_with_minimal_fields() {
        let user: UserProfile = serde_json::from_str(r#"{"email":"a@b.com"}"#)
            .expect("minimal profile should parse");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.first_name, "");
        assert!(user.is_active);
        assert!(!user.is_admin);
    }

    #[test]
    fn test_full_name() {
        let user = UserProfile {
            email: "jean.dupont@example.com".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            ..Default::default()
        };
        assert_eq!(user.full_name(), "Jean Dupont");

        let partial = UserProfile {
            email: "a@b.com".to_string(),
            first_name: "Jean".to_string(),
            ..Default::default()
        };
        assert_eq!(partial.full_name(), "Jean");
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"T"}"#)
            .expect("token without type should parse");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn test_register_request_skips_absent_phone() {
        let request = RegisterRequest {
            email: "x@y.com".to_string(),
            password: "MotDePasse123".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            phone: None,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("phone").is_none());
    }
}
