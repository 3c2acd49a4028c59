use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::ApiError;

/// Characters that satisfy the special-character requirement.
const SPECIAL_CHARS: &str = "!@#$%^&*()-+";

/// Checks the password policy without touching the value: at least 6
/// characters, one digit, one uppercase, one lowercase, one special
/// character. Case classes are ASCII only.
pub fn validate_strength(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Password must contain at least one digit".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ApiError::Validation(
            "Password must contain at least one special character".into(),
        ));
    }
    Ok(())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verifies a plaintext candidate against a stored hash. Argon2 hashes are
/// the default; bcrypt hashes from older records are still accepted.
pub fn verify_password(plain: &str, hashed: &str) -> anyhow::Result<bool> {
    if is_bcrypt_shape(hashed) {
        return bcrypt::verify(plain, hashed).map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            anyhow::anyhow!(e.to_string())
        });
    }
    let parsed = PasswordHash::new(hashed).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Reports whether the value already looks like a stored hash from one of
/// the accepted schemes. Returns false on any parse failure.
pub fn is_hashed(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if is_bcrypt_shape(value) {
        return true;
    }
    PasswordHash::new(value)
        .map(|h| h.algorithm.as_str().starts_with("argon2"))
        .unwrap_or(false)
}

fn is_bcrypt_shape(value: &str) -> bool {
    let known_prefix = ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|p| value.starts_with(p));
    known_prefix && value.len() == 60
}
