//! User Service - Business logic layer

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{User, UserPayload};
use crate::repository::UserRepository;

/// User service orchestrating repository operations
///
/// Lookups return `Ok(None)` for unknown ids and emails; absence is a
/// handler-level concern, not an error here.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all users
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Create a new user
    #[instrument(skip(self, payload))]
    pub async fn create_user(&self, payload: UserPayload) -> UserResult<User> {
        self.repository.insert(payload).await
    }

    /// Look up a user by id
    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        self.repository.find_by_id(id).await
    }

    /// Look up a user by email
    #[instrument(skip(self, email))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.repository.find_by_email(email).await
    }

    /// Replace a stored user, `None` when the id is unknown
    #[instrument(skip(self, payload))]
    pub async fn update_user(&self, id: ObjectId, payload: UserPayload) -> UserResult<Option<User>> {
        self.repository.update(id, payload).await
    }

    /// Delete a user, reporting whether anything was removed
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: ObjectId) -> UserResult<bool> {
        self.repository.delete(id).await
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use crate::models::ContactPreference;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn payload() -> UserPayload {
        UserPayload {
            name: Some("Jane".to_string()),
            surname: Some("Doe".to_string()),
            email: "jane@example.com".to_string(),
            age: 30,
            favorite_color: None,
            contact_preference: vec![ContactPreference::Email],
        }
    }

    fn user(id: ObjectId) -> User {
        User {
            id: id.to_hex(),
            name: Some("Jane".to_string()),
            surname: Some("Doe".to_string()),
            email: "jane@example.com".to_string(),
            age: 30,
            favorite_color: None,
            contact_preference: vec![ContactPreference::Email],
        }
    }

    #[tokio::test]
    async fn test_list_users_passes_through() {
        let id = ObjectId::new();
        let mut repo = MockUserRepository::new();
        repo.expect_find_all()
            .times(1)
            .returning(move || Ok(vec![user(id)]));

        let service = UserService::new(repo);
        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, id.to_hex());
    }

    #[tokio::test]
    async fn test_create_user_propagates_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(UserError::DuplicateEmail));

        let service = UserService::new(repo);
        let err = service.create_user(payload()).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_get_user_by_id_absence_is_not_an_error() {
        let id = ObjectId::new();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(repo);
        let found = service.get_user_by_id(id).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_user_returns_updated_user() {
        let id = ObjectId::new();
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .with(eq(id), eq(payload()))
            .times(1)
            .returning(move |id, _| Ok(Some(user(id))));

        let service = UserService::new(repo);
        let updated = service.update_user(id, payload()).await.unwrap();
        assert_eq!(updated.unwrap().id, id.to_hex());
    }

    #[tokio::test]
    async fn test_delete_user_reports_result() {
        let id = ObjectId::new();
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(false));

        let service = UserService::new(repo);
        assert!(!service.delete_user(id).await.unwrap());
    }
}
