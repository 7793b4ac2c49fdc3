// src/domain/pickup.rs

use crate::domain::dates::{parse_day_field, to_iso, CalendarDay, InvalidDate};

/// Whole calendar days from `last_pickup` to `today`. Negative when the
/// recorded pickup lies in the future.
pub fn days_since(last_pickup: Option<CalendarDay>, today: CalendarDay) -> Option<i64> {
    last_pickup.map(|day| today.signed_duration_since(day).num_days())
}

/// A record is due once at least `interval` days have passed since its last
/// pickup. Records never picked up, or without a positive interval, are not due.
pub fn is_due_for_pickup(
    last_pickup: Option<CalendarDay>,
    interval: Option<u32>,
    today: CalendarDay,
) -> bool {
    let Some(interval) = interval.filter(|days| *days > 0) else {
        return false;
    };

    days_since(last_pickup, today).is_some_and(|elapsed| elapsed >= i64::from(interval))
}

pub fn is_picked_up_today(last_pickup: Option<CalendarDay>, today: CalendarDay) -> bool {
    last_pickup == Some(today)
}

/// One level of undo for the "picked up today" toggle.
///
/// `previous` is `None` while nothing has been recorded; `Some(None)` means
/// the record had never been picked up before the toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickupHistory {
    pub previous: Option<Option<CalendarDay>>,
}

const NEVER: &str = "none";

impl PickupHistory {
    /// Encode for the hidden `prev` form field. Nothing recorded means no field.
    pub fn to_form_value(&self) -> Option<String> {
        self.previous
            .map(|previous| previous.map(to_iso).unwrap_or_else(|| NEVER.to_string()))
    }

    pub fn from_form_value(raw: Option<&str>) -> Result<Self, InvalidDate> {
        let previous = match raw.map(str::trim) {
            None | Some("") => None,
            Some(NEVER) => Some(None),
            Some(text) => Some(parse_day_field(text)?),
        };
        Ok(Self { previous })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupToggle {
    pub last_pickup: Option<CalendarDay>,
    pub history: PickupHistory,
}

/// Flip the "picked up today" state of a record.
///
/// Turning it on remembers the current value; turning it off restores that
/// value, or clears the date when nothing was remembered.
pub fn toggle_picked_up_today(
    last_pickup: Option<CalendarDay>,
    history: PickupHistory,
    today: CalendarDay,
) -> PickupToggle {
    if is_picked_up_today(last_pickup, today) {
        PickupToggle {
            last_pickup: history.previous.flatten(),
            history: PickupHistory::default(),
        }
    } else {
        PickupToggle {
            last_pickup: Some(today),
            history: PickupHistory {
                previous: Some(last_pickup),
            },
        }
    }
}
