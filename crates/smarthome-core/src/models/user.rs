use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Username/password body for `POST /login` and `POST /register`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in user from `GET /users/me`.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[cfg_attr(feature = "ts", ts(skip))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}

/// Body of `PUT /update-user`. Only the fields being changed are sent.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Username and password changes require the current password first.
    pub fn changes_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

impl std::fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpdate")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .finish()
    }
}

/// Body of `POST /verify-password`.
#[derive(Serialize)]
pub(crate) struct PasswordCheck<'a> {
    #[serde(rename = "currentPassword")]
    pub current_password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct PasswordCheckResponse {
    #[serde(default)]
    pub success: bool,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_user_update_sends_only_changed_fields() {
        let update = UserUpdate {
            email: Some("alice@example.test".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(!update.changes_credentials());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"email": "alice@example.test"})
        );
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_user_update_debug_redacts_password() {
        let update = UserUpdate {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(update.changes_credentials());
        assert!(!format!("{:?}", update).contains("hunter2"));
    }

    #[test]
    fn test_user_profile_keeps_unknown_fields() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 1,
            "username": "alice",
            "is_admin": true,
            "theme": "dark"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.email, None);
        assert_eq!(user.extra.get("theme"), Some(&json!("dark")));
    }
}
