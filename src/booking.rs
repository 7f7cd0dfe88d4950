use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: ObjectId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking request body as sent by the UI. The slug is advisory context
/// only; the referential key is `eventId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub event_id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub email: String,
}

impl BookingDraft {
    pub fn validate(self) -> Result<Booking, Error> {
        let email = normalize_email(&self.email)?;

        let raw_id = self.event_id.trim();
        let event_id = ObjectId::parse_str(raw_id)
            .map_err(|_| Error::InvalidFormat(raw_id.to_string()))?;

        let now = Utc::now();

        Ok(Booking {
            id: None,
            event_id,
            email,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn normalize_email(raw: &str) -> Result<String, Error> {
    static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

    let email = raw.trim().to_lowercase();

    if !EMAIL.is_match(&email) {
        return Err(Error::InvalidEmail(email));
    }

    Ok(email)
}
