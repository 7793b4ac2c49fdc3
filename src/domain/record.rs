// src/domain/record.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::dates::{parse_day_field, CalendarDay};
use crate::errors::ServerError;

/// Opaque id handed out by the repository. Never generated by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pickup location as the rest of the app sees it, dates already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub region: String,
    /// Days between required pickups.
    pub interval: Option<u32>,
    pub last_pickup: Option<CalendarDay>,
}

/// Everything a user submits through the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub region: String,
    pub interval: Option<u32>,
    pub last_pickup: Option<CalendarDay>,
}

/// How an existing record changes. Edits overwrite every field; the
/// pickup toggle only ever touches the last-pickup day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    Replace(RecordFields),
    LastPickup(Option<CalendarDay>),
}

impl Record {
    pub fn from_fields(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            name: fields.name,
            address: fields.address,
            phone: fields.phone,
            region: fields.region,
            interval: fields.interval,
            last_pickup: fields.last_pickup,
        }
    }

    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            region: self.region.clone(),
            interval: self.interval,
            last_pickup: self.last_pickup,
        }
    }
}

impl RecordFields {
    /// Build from urlencoded form pairs. Unknown keys are ignored.
    pub fn from_form<I, K, V>(pairs: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fields = RecordFields::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "name" => fields.name = value.trim().to_string(),
                "address" => fields.address = value.trim().to_string(),
                "phone" => fields.phone = value.trim().to_string(),
                "region" => fields.region = value.trim().to_string(),
                "interval" => fields.interval = parse_interval(value)?,
                "last_pickup" => {
                    fields.last_pickup = parse_day_field(value).map_err(|e| {
                        ServerError::BadRequest(format!("last pickup must be YYYY-MM-DD ({e})"))
                    })?
                }
                _ => {}
            }
        }

        if fields.name.is_empty() {
            return Err(ServerError::BadRequest("name is required".into()));
        }

        Ok(fields)
    }
}

fn parse_interval(raw: &str) -> Result<Option<u32>, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match raw.parse::<u32>() {
        Ok(0) => Err(ServerError::BadRequest("interval must be at least 1 day".into())),
        Ok(days) => Ok(Some(days)),
        Err(_) => Err(ServerError::BadRequest(format!(
            "interval must be a whole number of days, got {raw:?}"
        ))),
    }
}
