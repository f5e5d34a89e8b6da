//! Route guard: keeps protected commands away from the backend until a
//! session exists.

use anyhow::{anyhow, Error};
use smarthome_core::{ApiError, TokenStore};

use crate::cli::Access;

const LOGIN_HINT: &str = "Run `smarthome login` to sign in.";

/// Refuse protected commands when no session is stored.
pub fn check(access: Access, tokens: &TokenStore) -> Result<(), Error> {
    match access {
        Access::Protected if !tokens.is_authenticated() => {
            Err(anyhow!("Not logged in. {}", LOGIN_HINT))
        }
        _ => Ok(()),
    }
}

/// Turn a failed call into the message shown to the user.
///
/// A 401 that left the store empty means the session could not be
/// recovered, so point the user back at login.
pub fn explain(err: ApiError, tokens: &TokenStore) -> Error {
    if err.is_unauthorized() && !tokens.is_authenticated() {
        anyhow!("Session expired. {}", LOGIN_HINT)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_requires_session() {
        let tokens = TokenStore::in_memory();
        assert!(check(Access::Public, &tokens).is_ok());
        let err = check(Access::Protected, &tokens).unwrap_err();
        assert!(err.to_string().contains("smarthome login"));

        tokens.set_tokens("A1", "R1");
        assert!(check(Access::Protected, &tokens).is_ok());
    }

    #[test]
    fn test_explain_expired_session() {
        let tokens = TokenStore::in_memory();
        let err = explain(ApiError::Unauthorized("expired".to_string()), &tokens);
        assert!(err.to_string().starts_with("Session expired"));
    }

    #[test]
    fn test_explain_keeps_other_errors() {
        let tokens = TokenStore::in_memory();
        tokens.set_tokens("A1", "R1");

        let err = explain(ApiError::Unauthorized("nope".to_string()), &tokens);
        assert!(err.to_string().contains("nope"));

        let err = explain(ApiError::NotFound("Device not found".to_string()), &tokens);
        assert!(err.to_string().contains("Device not found"));
    }
}
