pub mod dates;
pub mod pickup;
pub mod record;
pub mod view;

pub use dates::{CalendarDay, DateInput, DayZone, Timestamp};
pub use pickup::{toggle_picked_up_today, PickupHistory};
pub use record::{Record, RecordFields, RecordId, RecordUpdate};
pub use view::{derive_view, regions, RecordView, ViewQuery};
