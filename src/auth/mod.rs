use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

/// Bearer-token claims. Tokens carry the issuing user and the issue time and
/// never expire, so verification must not require an `exp` claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            iat: Utc::now().timestamp(),
        }
    }
}

/// Sign a token for the given user with the configured secret.
pub fn generate_token(user_id: i32) -> Result<String, ApiError> {
    let secret = &config::config().security.secret_key;

    if secret.is_empty() {
        return Err(ApiError::internal("SECRET_KEY not configured"));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &Claims::new(user_id), &encoding_key)
        .map_err(|e| ApiError::internal(format!("token generation failed: {}", e)))
}

/// Verify a token's signature and return its claims. Callers decide what an
/// invalid token means; the authentication middleware treats it as "not
/// logged in" rather than an error.
pub fn decode_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.secret_key;

    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::unauthorized(format!("invalid token: {}", e)))
}

/// Hash a password with the configured work factor.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let security = &config::config().security;
    hash_password_with(password, security.hash_memory_kib, security.hash_iterations)
}

fn hash_password_with(password: &str, memory_kib: u32, iterations: u32) -> Result<String, ApiError> {
    let params = Params::new(memory_kib, iterations, 1, None)
        .map_err(|e| ApiError::internal(format!("invalid hash params: {}", e)))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))
}

/// Compare a password against a stored hash. The hash string encodes its own
/// params, so verification works regardless of the work factor it was
/// created with.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
