//! Fail-fast payload validation
//!
//! Request bodies are checked against the raw JSON value in a fixed order,
//! and the first failing check determines the error. Only after every check
//! passes is the body deserialized into [`UserPayload`].

use std::collections::HashSet;
use std::sync::LazyLock;

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ErrorResponse};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ContactPreference, UserPayload};

/// Field names accepted in a user payload
pub const ALLOWED_FIELDS: [&str; 6] = [
    "name",
    "surname",
    "age",
    "email",
    "favorite_color",
    "contact_preference",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Payload validation failure, one variant per check
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Unknown field(s): {}", fields.join(", "))]
    UnknownField { fields: Vec<String> },

    #[error("{0}")]
    InvalidType(&'static str),

    #[error("Valid email is required")]
    InvalidEmail,

    #[error("Age is required and must be a number between 0 and 120")]
    InvalidAge,

    #[error("At least one contact preference is required")]
    MissingPreference,

    #[error("Duplicate contact preferences are not allowed")]
    DuplicatePreference,

    #[error(
        "Invalid contact preference(s): {}. Must be one of: email, phone_call, sms",
        values.join(", ")
    )]
    InvalidPreference { values: Vec<String> },
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let mut body = ErrorResponse::new(self.to_string());
        if matches!(self, ValidationError::UnknownField { .. }) {
            body = body
                .with_allowed_fields(ALLOWED_FIELDS.iter().map(|field| field.to_string()).collect());
        }

        tracing::info!("Payload validation failed: {}", body.message);
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Run the ordered checks against a raw JSON body.
///
/// `null` values count as absent for optional fields and as missing for
/// required ones.
pub fn validate_payload(value: &Value) -> Result<(), ValidationError> {
    if let Some(object) = value.as_object() {
        let unknown: Vec<String> = object
            .keys()
            .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownField { fields: unknown });
        }
    }

    check_optional_string(value, "name", "Name must be a string")?;
    check_optional_string(value, "surname", "Surname must be a string")?;

    let email_ok = matches!(value.get("email"), Some(Value::String(s)) if EMAIL_RE.is_match(s));
    if !email_ok {
        return Err(ValidationError::InvalidEmail);
    }

    let age_ok = value
        .get("age")
        .and_then(Value::as_i64)
        .is_some_and(|age| (0..=120).contains(&age));
    if !age_ok {
        return Err(ValidationError::InvalidAge);
    }

    check_optional_string(value, "favorite_color", "Invalid color")?;

    check_contact_preference(value.get("contact_preference"))
}

fn check_optional_string(
    value: &Value,
    field: &str,
    message: &'static str,
) -> Result<(), ValidationError> {
    match value.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ValidationError::InvalidType(message)),
    }
}

fn check_contact_preference(value: Option<&Value>) -> Result<(), ValidationError> {
    let entries = match value {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(ValidationError::MissingPreference),
    };

    let distinct: HashSet<String> = entries.iter().map(Value::to_string).collect();
    if distinct.len() != entries.len() {
        return Err(ValidationError::DuplicatePreference);
    }

    let invalid: Vec<String> = entries
        .iter()
        .filter(|entry| {
            !matches!(entry, Value::String(s) if s.parse::<ContactPreference>().is_ok())
        })
        .map(|entry| match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidPreference { values: invalid })
    }
}

/// Extracts a [`UserPayload`] from the request body, rejecting invalid
/// bodies with a 400 response carrying the first failing check's message.
pub struct ValidatedUser(pub UserPayload);

impl<S> FromRequest<S> for ValidatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::from(rejection).into_response())?;

        validate_payload(&value).map_err(IntoResponse::into_response)?;

        let payload =
            serde_json::from_value(value).map_err(|e| AppError::from(e).into_response())?;

        Ok(Self(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "Jane",
            "surname": "Doe",
            "email": "jane@example.com",
            "age": 30,
            "favorite_color": "green",
            "contact_preference": ["email", "sms"]
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        assert_eq!(validate_payload(&valid_body()), Ok(()));
    }

    #[test]
    fn test_minimal_payload_passes() {
        let body = json!({
            "email": "jane@example.com",
            "age": 0,
            "contact_preference": ["phone_call"]
        });
        assert_eq!(validate_payload(&body), Ok(()));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut body = valid_body();
        body["nickname"] = json!("JD");

        let err = validate_payload(&body).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownField {
                fields: vec!["nickname".to_string()]
            }
        );
        assert_eq!(err.to_string(), "Unknown field(s): nickname");
    }

    #[test]
    fn test_unknown_field_wins_over_later_checks() {
        // Unknown fields are reported even when the email is also invalid
        let body = json!({
            "nickname": "JD",
            "email": "not-an-email",
            "age": 30,
            "contact_preference": ["email"]
        });
        assert!(matches!(
            validate_payload(&body),
            Err(ValidationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_name_must_be_string() {
        let mut body = valid_body();
        body["name"] = json!(42);
        assert_eq!(
            validate_payload(&body).unwrap_err().to_string(),
            "Name must be a string"
        );
    }

    #[test]
    fn test_surname_must_be_string() {
        let mut body = valid_body();
        body["surname"] = json!(["Doe"]);
        assert_eq!(
            validate_payload(&body).unwrap_err().to_string(),
            "Surname must be a string"
        );
    }

    #[test]
    fn test_null_name_counts_as_absent() {
        let mut body = valid_body();
        body["name"] = Value::Null;
        assert_eq!(validate_payload(&body), Ok(()));
    }

    #[test]
    fn test_email_missing() {
        let body = json!({ "age": 30, "contact_preference": ["email"] });
        assert_eq!(
            validate_payload(&body),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_email_malformed() {
        for email in ["plain", "no@tld", "two words@example.com", "a@b@c.com "] {
            let mut body = valid_body();
            body["email"] = json!(email);
            assert_eq!(
                validate_payload(&body),
                Err(ValidationError::InvalidEmail),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_null_counts_as_missing() {
        let mut body = valid_body();
        body["email"] = Value::Null;
        assert_eq!(validate_payload(&body), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_age_bounds() {
        for (age, ok) in [(json!(0), true), (json!(120), true), (json!(-1), false), (json!(121), false)] {
            let mut body = valid_body();
            body["age"] = age.clone();
            let result = validate_payload(&body);
            assert_eq!(result.is_ok(), ok, "age {age} expectation failed");
        }
    }

    #[test]
    fn test_age_must_be_integer_number() {
        for age in [json!("30"), json!(30.5), Value::Null, json!(true)] {
            let mut body = valid_body();
            body["age"] = age;
            assert_eq!(validate_payload(&body), Err(ValidationError::InvalidAge));
        }
    }

    #[test]
    fn test_age_missing() {
        let body = json!({
            "email": "jane@example.com",
            "contact_preference": ["email"]
        });
        assert_eq!(validate_payload(&body), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn test_favorite_color_must_be_string() {
        let mut body = valid_body();
        body["favorite_color"] = json!(7);
        assert_eq!(
            validate_payload(&body).unwrap_err().to_string(),
            "Invalid color"
        );
    }

    #[test]
    fn test_contact_preference_required() {
        for value in [None, Some(json!([])), Some(json!("email")), Some(Value::Null)] {
            let mut body = valid_body();
            match value {
                Some(v) => body["contact_preference"] = v,
                None => {
                    body.as_object_mut().unwrap().remove("contact_preference");
                }
            }
            assert_eq!(
                validate_payload(&body),
                Err(ValidationError::MissingPreference)
            );
        }
    }

    #[test]
    fn test_contact_preference_duplicates() {
        let mut body = valid_body();
        body["contact_preference"] = json!(["email", "sms", "email"]);
        assert_eq!(
            validate_payload(&body),
            Err(ValidationError::DuplicatePreference)
        );
    }

    #[test]
    fn test_duplicates_reported_before_invalid_members() {
        let mut body = valid_body();
        body["contact_preference"] = json!(["fax", "fax"]);
        assert_eq!(
            validate_payload(&body),
            Err(ValidationError::DuplicatePreference)
        );
    }

    #[test]
    fn test_contact_preference_invalid_members() {
        let mut body = valid_body();
        body["contact_preference"] = json!(["email", "fax", 3]);

        let err = validate_payload(&body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid contact preference(s): fax, 3. Must be one of: email, phone_call, sms"
        );
    }

    #[test]
    fn test_unknown_field_response_carries_allowed_fields() {
        let err = ValidationError::UnknownField {
            fields: vec!["nickname".to_string()],
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
