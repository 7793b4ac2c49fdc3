// src/domain/view.rs

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

use crate::domain::dates::{parse_day_field, to_iso, CalendarDay};
use crate::domain::pickup::{days_since, is_due_for_pickup, is_picked_up_today};
use crate::domain::record::Record;

/// A filter or sort option that cannot be applied. Raised before any
/// record is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    #[error("unknown {option} value {value:?}")]
    UnknownValue { option: &'static str, value: String },

    #[error("day filter must be YYYY-MM-DD, got {0:?}")]
    InvalidDay(String),

    #[error("sort direction given without a sort field")]
    DirectionWithoutField,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueStatus {
    #[default]
    AnyStatus,
    MustPickUp,
    MustNotPickUp,
}

impl DueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DueStatus::AnyStatus => "any",
            DueStatus::MustPickUp => "must_pick_up",
            DueStatus::MustNotPickUp => "must_not_pick_up",
        }
    }

    fn accepts(self, due: bool) -> bool {
        match self {
            DueStatus::AnyStatus => true,
            DueStatus::MustPickUp => due,
            DueStatus::MustNotPickUp => !due,
        }
    }
}

impl FromStr for DueStatus {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(DueStatus::AnyStatus),
            "must_pick_up" => Ok(DueStatus::MustPickUp),
            "must_not_pick_up" => Ok(DueStatus::MustNotPickUp),
            other => Err(InvalidConfiguration::UnknownValue {
                option: "due",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Region,
    LastPickup,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Region => "region",
            SortField::LastPickup => "last_pickup",
        }
    }
}

impl FromStr for SortField {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "region" => Ok(SortField::Region),
            "last_pickup" => Ok(SortField::LastPickup),
            other => Err(InvalidConfiguration::UnknownValue {
                option: "sort",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = InvalidConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(InvalidConfiguration::UnknownValue {
                option: "dir",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Reversing the comparator (not the output) keeps ties in input order
    /// for both directions.
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = match self.field {
            SortField::Name => compare_text(&a.name, &b.name),
            SortField::Region => compare_text(&a.region, &b.region),
            // `None` sorts before any day.
            SortField::LastPickup => a.last_pickup.cmp(&b.last_pickup),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

thread_local! {
    // Secondary strength: accents count, case does not.
    static TEXT_COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&locale!("en").into(), options)
            .map_err(|e| tracing::warn!(error = ?e, "collator unavailable, sorting by code point"))
            .ok()
    };
}

/// Locale-aware, case-insensitive text order.
fn compare_text(a: &str, b: &str) -> Ordering {
    TEXT_COLLATOR
        .try_with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        })
        .unwrap_or_else(|_| a.to_lowercase().cmp(&b.to_lowercase()))
}

/// Filters combine with AND. A `None` or blank value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub name_contains: Option<String>,
    pub region: Option<String>,
    pub on_day: Option<CalendarDay>,
    pub due_status: DueStatus,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        active(&self.name_contains).is_none()
            && active(&self.region).is_none()
            && self.on_day.is_none()
            && self.due_status == DueStatus::AnyStatus
    }

    pub fn matches(&self, record: &Record, today: CalendarDay) -> bool {
        let name_ok = active(&self.name_contains).map_or(true, |needle| {
            record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });

        let region_ok = active(&self.region).map_or(true, |region| record.region == region);

        let day_ok = self
            .on_day
            .map_or(true, |day| record.last_pickup == Some(day));

        name_ok
            && region_ok
            && day_ok
            && self.due_status.accepts(is_due_for_pickup(
                record.last_pickup,
                record.interval,
                today,
            ))
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Filter then stably sort `records` into a new vector. The input is not touched.
pub fn apply(
    records: &[Record],
    filters: &Filters,
    sort: Option<&SortSpec>,
    today: CalendarDay,
) -> Vec<Record> {
    let mut out: Vec<Record> = records
        .iter()
        .filter(|record| filters.matches(record, today))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        // `sort_by` is stable.
        out.sort_by(|a, b| spec.compare(a, b));
    }

    out
}

/// Filter and sort options as they travel in the page's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filters: Filters,
    pub sort: Option<SortSpec>,
}

impl ViewQuery {
    /// Parse `name`, `region`, `day`, `due`, `sort` and `dir`. Empty values
    /// are unset, other keys are ignored, the last occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, InvalidConfiguration>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Filters::default();
        let mut field = None;
        let mut direction = None;

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            let set = !value.is_empty();
            match key.as_ref() {
                "name" => filters.name_contains = set.then(|| value.to_string()),
                "region" => filters.region = set.then(|| value.to_string()),
                "day" => {
                    filters.on_day = parse_day_field(value)
                        .map_err(|_| InvalidConfiguration::InvalidDay(value.to_string()))?
                }
                "due" => {
                    filters.due_status = if set {
                        value.parse()?
                    } else {
                        DueStatus::AnyStatus
                    }
                }
                "sort" => field = if set { Some(value.parse::<SortField>()?) } else { None },
                "dir" => {
                    direction = if set {
                        Some(value.parse::<SortDirection>()?)
                    } else {
                        None
                    }
                }
                _ => {}
            }
        }

        let sort = match (field, direction) {
            (Some(field), direction) => Some(SortSpec::new(field, direction.unwrap_or_default())),
            (None, Some(_)) => return Err(InvalidConfiguration::DirectionWithoutField),
            (None, None) => None,
        };

        Ok(Self { filters, sort })
    }

    pub fn from_query_string(query: Option<&str>) -> Result<Self, InvalidConfiguration> {
        let query = query.unwrap_or_default();
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Render back to a query string; unset options are left out.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());

        if let Some(name) = active(&self.filters.name_contains) {
            out.append_pair("name", name);
        }
        if let Some(region) = active(&self.filters.region) {
            out.append_pair("region", region);
        }
        if let Some(day) = self.filters.on_day {
            out.append_pair("day", &to_iso(day));
        }
        if self.filters.due_status != DueStatus::AnyStatus {
            out.append_pair("due", self.filters.due_status.as_str());
        }
        if let Some(sort) = &self.sort {
            out.append_pair("sort", sort.field.as_str());
            out.append_pair("dir", sort.direction.as_str());
        }

        out.finish()
    }

    pub fn apply(&self, records: &[Record], today: CalendarDay) -> Vec<Record> {
        apply(records, &self.filters, self.sort.as_ref(), today)
    }
}

/// A record plus the status flags the page shows next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    #[serde(flatten)]
    pub record: Record,
    pub due_for_pickup: bool,
    pub picked_up_today: bool,
    pub days_since: Option<i64>,
}

impl RecordView {
    pub fn new(record: Record, today: CalendarDay) -> Self {
        Self {
            due_for_pickup: is_due_for_pickup(record.last_pickup, record.interval, today),
            picked_up_today: is_picked_up_today(record.last_pickup, today),
            days_since: days_since(record.last_pickup, today),
            record,
        }
    }
}

pub fn derive_view(records: &[Record], query: &ViewQuery, today: CalendarDay) -> Vec<RecordView> {
    query
        .apply(records, today)
        .into_iter()
        .map(|record| RecordView::new(record, today))
        .collect()
}

/// Distinct non-empty regions, sorted, for the region picker.
pub fn regions(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.region.trim())
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
