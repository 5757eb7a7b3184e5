// JWT token creation and verification
// HS256 tokens carrying the user id and role

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::Role;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `role` - Role at issuance; informational, the gate re-reads the user
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
}

/// Creates a JWT token for a user
///
/// # Arguments
/// * `user_id` - The user's ID to include in the token
/// * `role` - The user's current role
/// * `secret` - The secret key for signing
/// * `ttl_hours` - Lifetime of the token
///
/// # Returns
/// * `Ok(String)` - The JWT token
/// * `Err(String)` - If token creation fails
///
/// # Token Properties
/// - Signed with HS256 algorithm
/// - Contains user_id in 'sub' claim and the role in 'role'
///
/// # Example
/// ```
/// use office_api::auth::jwt::create_token;
/// use office_api::domain::user::Role;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), Role::Manager, "your-secret-key", 8)
///     .expect("valid token");
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn create_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, String> {
    let expiry = Utc::now() + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user_id,
        role,
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to verify
/// * `secret` - The secret key for verification
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid or expired
///
/// # Example
/// ```
/// use office_api::auth::jwt::{create_token, verify_token};
/// use office_api::domain::user::Role;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key";
/// let token = create_token(user_id, Role::Employee, secret, 8).unwrap();
/// let claims = verify_token(&token, secret).expect("valid claims");
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, Role::Admin, TEST_SECRET, 8).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(Uuid::new_v4(), Role::Employee, TEST_SECRET, 8)
            .expect("valid token");

        let result = verify_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = verify_token("invalid.token.string", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_fails() {
        // Past the default 60 second leeway
        let token = create_token(Uuid::new_v4(), Role::Employee, TEST_SECRET, -1)
            .expect("valid token");

        assert!(verify_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn token_expiry_follows_ttl() {
        let token = create_token(Uuid::new_v4(), Role::Manager, TEST_SECRET, 720)
            .expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        let expiry_time = claims.exp as i64;
        let in_30_days = (Utc::now() + Duration::hours(720)).timestamp();

        assert!(expiry_time > Utc::now().timestamp());
        assert!(expiry_time <= in_30_days + 10); // 10 second buffer
    }
}
