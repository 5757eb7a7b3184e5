use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::StoreResult;
use crate::domain::user::{Email, User};

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; a taken email is a `Conflict`
    async fn create(&self, user: &User) -> StoreResult<()>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<User>>;

    /// All users, ordered by name
    async fn find_all(&self) -> StoreResult<Vec<User>>;

    /// Persist changes to an existing user
    async fn update(&self, user: &User) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<u64>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;
}
