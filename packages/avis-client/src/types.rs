use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Body of `POST /api/login` and `POST /api/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// User identifier as returned by the service (numeric or string, depending on backend).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

/// Authenticated user. Fields the client does not know about are kept so
/// the persisted object round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// A professional's experience with a client phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub is_positive: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "professional_email")]
    pub author_email: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Successful search payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub avis: Vec<Review>,
}

/// Body of `POST /api/avis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub client_phone: String,
    pub is_positive: bool,
    pub message: String,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Accepts RFC 3339 timestamps as well as the naive `YYYY-MM-DD HH:MM:SS`
/// form some SQL backends emit (interpreted as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_review_uses_wire_field_names() {
        let review: Review = serde_json::from_value(serde_json::json!({
            "is_positive": false,
            "message": "never picked up the parcel",
            "professional_email": "shop@example.com",
            "created_at": "2024-03-01T10:15:00.000Z"
        }))
        .unwrap();

        assert!(!review.is_positive);
        assert_eq!(review.author_email, "shop@example.com");
        assert_eq!(
            review.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_review_message_may_be_null_or_missing() {
        let with_null: Review = serde_json::from_value(serde_json::json!({
            "is_positive": true,
            "message": null,
            "professional_email": "a@b.co",
            "created_at": "2024-03-01 10:15:00"
        }))
        .unwrap();
        assert_eq!(with_null.message, None);

        let missing: Review = serde_json::from_value(serde_json::json!({
            "is_positive": true,
            "professional_email": "a@b.co",
            "created_at": "2024-03-01T10:15:00+02:00"
        }))
        .unwrap();
        assert_eq!(missing.message, None);
        assert_eq!(
            missing.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let result: serde_json::Result<Review> = serde_json::from_value(serde_json::json!({
            "is_positive": true,
            "professional_email": "a@b.co",
            "created_at": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = serde_json::json!({"id": 7, "email": "pro@example.com", "shop": "Colis & Co"});
        let user: User = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(user.id, UserId::Number(7));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_user_id_accepts_strings() {
        let user: User =
            serde_json::from_value(serde_json::json!({"id": "u-42", "email": "x@y.fr"})).unwrap();
        assert_eq!(user.id.to_string(), "u-42");
    }
}
