// src/db/records.rs
use chrono::Utc;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};

use crate::db::connection::Database;
use crate::db::ids::generate_record_id;
use crate::domain::dates::{normalize_or_never, to_timestamp};
use crate::domain::{CalendarDay, DateInput, DayZone, Record, RecordFields, RecordId, RecordUpdate, Timestamp};
use crate::errors::ServerError;

/// A record exactly as the store returns it: the last-pickup date has not
/// been normalized yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub region: String,
    pub interval: Option<u32>,
    pub last_pickup: DateInput,
}

impl StoredRecord {
    /// Normalize into a [`Record`]. A broken date becomes "never picked up"
    /// so one bad row cannot take the whole list down.
    pub fn resolve(self, zone: &DayZone) -> Record {
        let last_pickup = normalize_or_never(&self.last_pickup, zone);
        Record {
            id: self.id,
            name: self.name,
            address: self.address,
            phone: self.phone,
            region: self.region,
            interval: self.interval,
            last_pickup,
        }
    }
}

/// The document store the app talks to. Nothing else is needed from it.
pub trait RecordRepository {
    /// Every record, in insertion order.
    fn list(&self) -> Result<Vec<StoredRecord>, ServerError>;

    fn create(&self, fields: &RecordFields) -> Result<RecordId, ServerError>;

    /// `NotFound` when `id` does not exist.
    fn update(&self, id: &RecordId, update: &RecordUpdate) -> Result<(), ServerError>;

    /// `NotFound` when `id` does not exist.
    fn delete(&self, id: &RecordId) -> Result<(), ServerError>;

    fn zone(&self) -> &DayZone;

    /// `list` with every date normalized.
    fn list_resolved(&self) -> Result<Vec<Record>, ServerError> {
        let zone = *self.zone();
        Ok(self
            .list()?
            .into_iter()
            .map(|stored| stored.resolve(&zone))
            .collect())
    }
}

/// SQLite-backed repository over the `submissions` table.
#[derive(Debug, Clone)]
pub struct SqliteRecords {
    db: Database,
    zone: DayZone,
}

impl SqliteRecords {
    pub fn new(db: Database, zone: DayZone) -> Self {
        Self { db, zone }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn pickup_seconds(&self, day: Option<CalendarDay>) -> Option<i64> {
        day.map(|day| to_timestamp(day, &self.zone).seconds)
    }
}

impl RecordRepository for SqliteRecords {
    fn list(&self) -> Result<Vec<StoredRecord>, ServerError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    r#"
                    select id, name, address, phone, region, interval_days, last_pickup
                    from submissions
                    order by created_at, rowid
                    "#,
                )
                .map_err(|e| ServerError::DbError(format!("prepare list failed: {e}")))?;

            let rows = stmt
                .query_map([], stored_record_from_row)
                .map_err(|e| ServerError::DbError(format!("list records failed: {e}")))?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(|e| ServerError::DbError(format!("read record failed: {e}")))?);
            }
            Ok(out)
        })
    }

    fn create(&self, fields: &RecordFields) -> Result<RecordId, ServerError> {
        let id = generate_record_id();
        let last_pickup = self.pickup_seconds(fields.last_pickup);

        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into submissions
                    (id, name, address, phone, region, interval_days, last_pickup, created_at)
                values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    id.as_str(),
                    fields.name,
                    fields.address,
                    fields.phone,
                    fields.region,
                    fields.interval,
                    last_pickup,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(|e| ServerError::DbError(format!("create record failed: {e}")))?;
            Ok(())
        })?;

        tracing::info!(id = %id, name = %fields.name, "record created");
        Ok(id)
    }

    fn update(&self, id: &RecordId, update: &RecordUpdate) -> Result<(), ServerError> {
        let changed = self.db.with_conn(|conn| match update {
            RecordUpdate::Replace(fields) => replace_fields(
                conn,
                id,
                fields,
                self.pickup_seconds(fields.last_pickup),
            ),
            RecordUpdate::LastPickup(day) => conn
                .execute(
                    "update submissions set last_pickup = ?1 where id = ?2",
                    params![self.pickup_seconds(*day), id.as_str()],
                )
                .map_err(|e| ServerError::DbError(format!("update last pickup failed: {e}"))),
        })?;

        if changed == 0 {
            return Err(ServerError::NotFound);
        }

        tracing::info!(id = %id, "record updated");
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<(), ServerError> {
        let changed = self.db.with_conn(|conn| {
            conn.execute("delete from submissions where id = ?1", params![id.as_str()])
                .map_err(|e| ServerError::DbError(format!("delete record failed: {e}")))
        })?;

        if changed == 0 {
            return Err(ServerError::NotFound);
        }

        tracing::info!(id = %id, "record deleted");
        Ok(())
    }

    fn zone(&self) -> &DayZone {
        &self.zone
    }
}

fn replace_fields(
    conn: &Connection,
    id: &RecordId,
    fields: &RecordFields,
    last_pickup: Option<i64>,
) -> Result<usize, ServerError> {
    conn.execute(
        r#"
        update submissions set
            name = ?1,
            address = ?2,
            phone = ?3,
            region = ?4,
            interval_days = ?5,
            last_pickup = ?6
        where id = ?7
        "#,
        params![
            fields.name,
            fields.address,
            fields.phone,
            fields.region,
            fields.interval,
            last_pickup,
            id.as_str(),
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update record failed: {e}")))
}

fn stored_record_from_row(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    // The column is untyped: timestamps are integers, legacy rows are text.
    let last_pickup = match row.get_ref(6)? {
        ValueRef::Null => DateInput::Absent,
        ValueRef::Integer(seconds) => DateInput::Timestamp(Timestamp { seconds, nanos: 0 }),
        ValueRef::Real(seconds) => DateInput::Timestamp(Timestamp {
            seconds: seconds.trunc() as i64,
            nanos: (seconds.fract().abs() * 1e9) as u32,
        }),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            DateInput::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    };

    Ok(StoredRecord {
        id: RecordId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        region: row.get(4)?,
        interval: interval_from_value(row.get_ref(5)?),
        last_pickup,
    })
}

// Legacy rows may hold zero, negative, fractional or text intervals; those
// read as "no interval" instead of failing the whole list.
fn interval_from_value(value: ValueRef<'_>) -> Option<u32> {
    let days = match value {
        ValueRef::Integer(days) => u32::try_from(days).ok(),
        ValueRef::Real(days) if days.fract() == 0.0 && days >= 1.0 && days <= f64::from(u32::MAX) => {
            Some(days as u32)
        }
        ValueRef::Text(text) => std::str::from_utf8(text).ok()?.trim().parse::<u32>().ok(),
        _ => None,
    };
    days.filter(|days| *days > 0)
}
