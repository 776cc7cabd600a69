use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::UserResult;
use crate::models::{User, UserPayload};

/// Repository trait for User persistence
///
/// This trait defines the data access interface for users.
/// Implementations can use different storage backends (MongoDB, in-memory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every stored user
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Insert a new user, generating its identifier
    async fn insert(&self, payload: UserPayload) -> UserResult<User>;

    /// Get a user by id
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    /// Get a user by email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Replace a stored user; `None` when the id is unknown
    async fn update(&self, id: ObjectId, payload: UserPayload) -> UserResult<Option<User>>;

    /// Delete a user by id; `false` when the id is unknown
    async fn delete(&self, id: ObjectId) -> UserResult<bool>;
}
