//! In-memory implementation of UserRepository
//!
//! Backs tests and local experiments that should not require a running
//! MongoDB. Enforces the same unique-email rule as the real store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserPayload};
use crate::repository::UserRepository;

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<ObjectId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn materialize(id: ObjectId, payload: UserPayload) -> User {
    User {
        id: id.to_hex(),
        name: payload.name,
        surname: payload.surname,
        email: payload.email,
        age: payload.age,
        favorite_color: payload.favorite_color,
        contact_preference: payload.contact_preference,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn insert(&self, payload: UserPayload) -> UserResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == payload.email) {
            return Err(UserError::DuplicateEmail);
        }

        let id = ObjectId::new();
        let user = materialize(id, payload);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn update(&self, id: ObjectId, payload: UserPayload) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&id) {
            return Ok(None);
        }
        if users
            .iter()
            .any(|(other_id, user)| *other_id != id && user.email == payload.email)
        {
            return Err(UserError::DuplicateEmail);
        }

        let user = materialize(id, payload);
        users.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactPreference;

    fn payload(email: &str) -> UserPayload {
        UserPayload {
            name: Some("Jane".to_string()),
            surname: None,
            email: email.to_string(),
            age: 30,
            favorite_color: None,
            contact_preference: vec![ContactPreference::Email],
        }
    }

    #[tokio::test]
    async fn test_insert_generates_hex_id() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(payload("jane@example.com")).await.unwrap();
        assert_eq!(user.id.len(), 24);
        assert!(user.id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(payload("jane@example.com")).await.unwrap();

        let err = repo.insert(payload("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update(ObjectId::new(), payload("jane@example.com"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_own_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(payload("jane@example.com")).await.unwrap();
        let id: ObjectId = user.id.parse().unwrap();

        let updated = repo
            .update(id, payload("jane@example.com"))
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_other_user() {
        let repo = InMemoryUserRepository::new();
        repo.insert(payload("jane@example.com")).await.unwrap();
        let other = repo.insert(payload("john@example.com")).await.unwrap();
        let other_id: ObjectId = other.id.parse().unwrap();

        let err = repo
            .update(other_id, payload("jane@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(payload("jane@example.com")).await.unwrap();
        let id: ObjectId = user.id.parse().unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
