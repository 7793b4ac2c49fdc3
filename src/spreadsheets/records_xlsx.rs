use crate::domain::dates::to_iso;
use crate::domain::{CalendarDay, RecordView};
use crate::errors::ServerError;
use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 9] = [
    "Name",
    "Address",
    "Phone",
    "Region",
    "Interval (days)",
    "Last pick-up",
    "Days since",
    "Must pick up",
    "Picked up today",
];

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Workbook bytes for the rows currently on screen, in screen order.
pub fn export_records_xlsx(views: &[RecordView]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let xlsx_err = |what: &str, e: rust_xlsxwriter::XlsxError| {
        ServerError::XlsxError(format!("Failed to write {what}: {e}"))
    };

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| xlsx_err(header, e))?;
    }

    for (i, view) in views.iter().enumerate() {
        let r = (i + 1) as u32;
        let record = &view.record;

        worksheet
            .write_string(r, 0, &record.name)
            .map_err(|e| xlsx_err("name", e))?;
        worksheet
            .write_string(r, 1, &record.address)
            .map_err(|e| xlsx_err("address", e))?;
        worksheet
            .write_string(r, 2, &record.phone)
            .map_err(|e| xlsx_err("phone", e))?;
        worksheet
            .write_string(r, 3, &record.region)
            .map_err(|e| xlsx_err("region", e))?;

        if let Some(interval) = record.interval {
            worksheet
                .write_number(r, 4, f64::from(interval))
                .map_err(|e| xlsx_err("interval", e))?;
        }
        if let Some(day) = record.last_pickup {
            worksheet
                .write_string(r, 5, to_iso(day))
                .map_err(|e| xlsx_err("last pick-up", e))?;
        }
        if let Some(days) = view.days_since {
            worksheet
                .write_number(r, 6, days as f64)
                .map_err(|e| xlsx_err("days since", e))?;
        }

        worksheet
            .write_string(r, 7, yes_no(view.due_for_pickup))
            .map_err(|e| xlsx_err("due flag", e))?;
        worksheet
            .write_string(r, 8, yes_no(view.picked_up_today))
            .map_err(|e| xlsx_err("picked-up flag", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_filename(today: CalendarDay) -> String {
    format!("flasker_{}.xlsx", to_iso(today))
}
