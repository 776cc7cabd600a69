use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// How a user prefers to be contacted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactPreference {
    Email,
    PhoneCall,
    Sms,
}

/// User entity as served over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store identifier, 24-char hex (MongoDB ObjectId)
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    /// Inclusive range 0 to 120
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_color: Option<String>,
    /// Non-empty, no duplicates
    pub contact_preference: Vec<ContactPreference>,
}

/// Create/update request body
///
/// Bodies are checked field by field before deserializing into this type,
/// see [`crate::validation::ValidatedUser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_color: Option<String>,
    pub contact_preference: Vec<ContactPreference>,
}
