use lazy_static::lazy_static;
use mongodb::bson::oid::ObjectId;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::users::dto::UserPayload;
use crate::users::password::{hash_password, is_hashed, validate_strength};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A validated user record. The password field only ever holds a hash once
/// the entity exists; `try_new` is the single way to build one from raw
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stored as `_id`; None until the store assigns one on insert.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Validates the raw payload and hashes the password. Hashing is
    /// skipped when the value is already a recognized hash, so building an
    /// entity from persisted fields never double-hashes.
    pub fn try_new(payload: UserPayload) -> ApiResult<User> {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::Validation("Name must not be empty".into()));
        }

        let email = payload.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::Validation("Invalid email address".into()));
        }

        let password = if is_hashed(&payload.password) {
            payload.password
        } else {
            validate_strength(&payload.password)?;
            hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?
        };

        Ok(User {
            id: None,
            name,
            email,
            password,
        })
    }
}

/// Outward-facing representation. Never carries a password.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::password::verify_password;

    fn payload(name: &str, email: &str, password: &str) -> UserPayload {
        UserPayload {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn try_new_hashes_the_password() {
        let user = User::try_new(payload("Ann", "ann@x.com", "Abc123!")).unwrap();
        assert_ne!(user.password, "Abc123!");
        assert!(is_hashed(&user.password));
        assert!(verify_password("Abc123!", &user.password).unwrap());
    }

    #[test]
    fn try_new_is_idempotent_over_hashed_input() {
        let first = User::try_new(payload("Ann", "ann@x.com", "Abc123!")).unwrap();
        let second = User::try_new(payload("Ann", "ann@x.com", &first.password)).unwrap();
        assert_eq!(first.password, second.password);
        assert!(verify_password("Abc123!", &second.password).unwrap());
    }

    #[test]
    fn try_new_rejects_empty_name() {
        let err = User::try_new(payload("  ", "ann@x.com", "Abc123!")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn try_new_rejects_malformed_email() {
        for email in ["not-an-email", "a@b", "a b@c.com", "@x.com"] {
            let err = User::try_new(payload("Ann", email, "Abc123!")).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "accepted {email}");
        }
    }

    #[test]
    fn try_new_normalizes_email_case() {
        let user = User::try_new(payload("Ann", "  Ann@X.Com ", "Abc123!")).unwrap();
        assert_eq!(user.email, "ann@x.com");
    }

    #[test]
    fn try_new_rejects_weak_password() {
        let err = User::try_new(payload("Ann", "ann@x.com", "abc")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn user_serializes_id_under_underscore_id() {
        let mut user = User::try_new(payload("Ann", "ann@x.com", "Abc123!")).unwrap();
        user.id = Some(ObjectId::new());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn user_without_id_omits_the_key() {
        let user = User::try_new(payload("Ann", "ann@x.com", "Abc123!")).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn public_user_strips_the_password() {
        let mut user = User::try_new(payload("Ann", "ann@x.com", "Abc123!")).unwrap();
        user.id = Some(ObjectId::new());
        let public = PublicUser::from(user);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["email"], "ann@x.com");
        assert_eq!(json["id"].as_str().unwrap().len(), 24);
    }
}
