//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{ContactPreference, User, UserPayload};
use crate::repository::UserRepository;

/// Wire representation of a user inside MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: Option<String>,
    surname: Option<String>,
    email: String,
    age: i32,
    favorite_color: Option<String>,
    contact_preference: Vec<ContactPreference>,
}

impl UserDocument {
    fn new(payload: UserPayload) -> Self {
        Self::with_id(ObjectId::new(), payload)
    }

    fn with_id(id: ObjectId, payload: UserPayload) -> Self {
        Self {
            id,
            name: payload.name,
            surname: payload.surname,
            email: payload.email,
            age: payload.age,
            favorite_color: payload.favorite_color,
            contact_preference: payload.contact_preference,
        }
    }
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            name: document.name,
            surname: document.surname,
            email: document.email,
            age: document.age,
            favorite_color: document.favorite_color,
            contact_preference: document.contact_preference,
        }
    }
}

/// A unique-index violation (duplicate key) reported by the server
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository backed by the `users` collection
    ///
    /// # Arguments
    /// * `db` - MongoDB database instance
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("users_db");
    /// let repo = MongoUserRepository::new(db);
    /// ```
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<UserDocument>("users");
        Self { collection }
    }

    /// Build the unique index on `email`. Run once at startup.
    ///
    /// With the index in place, a concurrent insert racing past the
    /// handler's duplicate pre-check still fails atomically and surfaces
    /// as [`UserError::DuplicateEmail`].
    pub async fn create_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Unique email index ensured on users collection");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, payload))]
    async fn insert(&self, payload: UserPayload) -> UserResult<User> {
        let document = UserDocument::new(payload);

        self.collection.insert_one(&document).await.map_err(|e| {
            if is_duplicate_key(&e) {
                UserError::DuplicateEmail
            } else {
                e.into()
            }
        })?;

        tracing::info!(user_id = %document.id, "User created");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(User::from))
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let document = self.collection.find_one(doc! { "email": email }).await?;
        Ok(document.map(User::from))
    }

    #[instrument(skip(self, payload))]
    async fn update(&self, id: ObjectId, payload: UserPayload) -> UserResult<Option<User>> {
        let document = UserDocument::with_id(id, payload);

        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &document)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    UserError::DuplicateEmail
                } else {
                    e.into()
                }
            })?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        tracing::info!(user_id = %id, "User updated");
        Ok(Some(document.into()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(result.deleted_count > 0)
    }
}
