use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Online,
    Offline,
    Hybrid,
}

impl Mode {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw.trim().to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(Error::InvalidEnum(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub organizer: String,
    pub date: String,
    pub time: String,
    pub mode: Mode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied event fields. The slug is never part of the input, it is
/// always derived from the title.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub organizer: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    #[serde(default)]
    pub agenda: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventDraft {
    pub fn validate(self) -> Result<Event, Error> {
        let title = required("title", &self.title)?;

        let slug = slug::derive(&title);
        if slug.is_empty() {
            return Err(Error::InvalidFormat(title));
        }

        let now = Utc::now();

        Ok(Event {
            id: None,
            slug,
            title,
            description: required("description", &self.description)?,
            overview: required("overview", &self.overview)?,
            image: required("image", &self.image)?,
            venue: required("venue", &self.venue)?,
            location: required("location", &self.location)?,
            organizer: required("organizer", &self.organizer)?,
            date: normalize_date(&self.date)?,
            time: normalize_time(&self.time)?,
            mode: Mode::parse(&self.mode)?,
            audience: required("audience", &self.audience)?,
            agenda: required_items("agenda", self.agenda)?,
            tags: required_items("tags", self.tags)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update. Only fields present in the patch are revalidated; a
/// changed title recomputes the slug.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    pub fn apply(self, event: &mut Event) -> Result<bool, Error> {
        let mut changed = false;

        if let Some(raw) = self.title {
            let title = required("title", &raw)?;
            if title != event.title {
                let slug = slug::derive(&title);
                if slug.is_empty() {
                    return Err(Error::InvalidFormat(title));
                }
                event.title = title;
                event.slug = slug;
                changed = true;
            }
        }

        changed |= patch_text("description", self.description, &mut event.description)?;
        changed |= patch_text("overview", self.overview, &mut event.overview)?;
        changed |= patch_text("image", self.image, &mut event.image)?;
        changed |= patch_text("venue", self.venue, &mut event.venue)?;
        changed |= patch_text("location", self.location, &mut event.location)?;
        changed |= patch_text("organizer", self.organizer, &mut event.organizer)?;
        changed |= patch_text("audience", self.audience, &mut event.audience)?;

        if let Some(raw) = self.date {
            let date = normalize_date(&raw)?;
            if date != event.date {
                event.date = date;
                changed = true;
            }
        }

        if let Some(raw) = self.time {
            let time = normalize_time(&raw)?;
            if time != event.time {
                event.time = time;
                changed = true;
            }
        }

        if let Some(raw) = self.mode {
            let mode = Mode::parse(&raw)?;
            if mode != event.mode {
                event.mode = mode;
                changed = true;
            }
        }

        if let Some(items) = self.agenda {
            let agenda = required_items("agenda", items)?;
            if agenda != event.agenda {
                event.agenda = agenda;
                changed = true;
            }
        }

        if let Some(items) = self.tags {
            let tags = required_items("tags", items)?;
            if tags != event.tags {
                event.tags = tags;
                changed = true;
            }
        }

        if changed {
            event.updated_at = Utc::now();
        }

        Ok(changed)
    }
}

fn required(name: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::MissingField(name));
    }

    Ok(value.to_string())
}

fn patch_text(
    name: &'static str,
    patch: Option<String>,
    field: &mut String,
) -> Result<bool, Error> {
    let Some(raw) = patch else {
        return Ok(false);
    };

    let value = required(name, &raw)?;
    if value == *field {
        return Ok(false);
    }

    *field = value;
    Ok(true)
}

fn required_items(name: &'static str, items: Vec<String>) -> Result<Vec<String>, Error> {
    let items = items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>();

    if items.is_empty() {
        return Err(Error::EmptyCollection(name));
    }

    Ok(items)
}

/// Canonicalizes a calendar date to `YYYY-MM-DD`. Inputs already in that
/// shape pass through; everything else goes through a fixed set of common
/// formats, taking the UTC date component of zoned inputs.
pub fn normalize_date(raw: &str) -> Result<String, Error> {
    const FORMAT: &str = "%Y-%m-%d";

    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
        return Ok(date.format(FORMAT).to_string());
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc).date_naive().format(FORMAT).to_string());
    }

    if let Ok(stamp) = DateTime::parse_from_rfc2822(raw) {
        return Ok(stamp.with_timezone(&Utc).date_naive().format(FORMAT).to_string());
    }

    for pattern in ["%d.%m.%Y", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, pattern) {
            return Ok(date.format(FORMAT).to_string());
        }
    }

    Err(Error::InvalidDate(raw.to_string()))
}

/// Canonicalizes a 24-hour wall-clock time to zero-padded `HH:MM`.
/// Out-of-range hours or minutes fail rather than wrap.
pub fn normalize_time(raw: &str) -> Result<String, Error> {
    let raw = raw.trim();

    let time = NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| Error::InvalidTime(raw.to_string()))?;

    Ok(time.format("%H:%M").to_string())
}
