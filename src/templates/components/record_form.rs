use crate::domain::dates::to_iso;
use crate::domain::Record;
use maud::{html, Markup};

const CLOSE_MODAL: &str = "document.getElementById('modal').innerHTML = ''";

/// Add/edit dialog. `existing` switches it into edit mode, which also shows
/// the delete button.
pub fn record_form_modal(existing: Option<&Record>, view_query: &str) -> Markup {
    let action = match existing {
        Some(record) => format!("/records/{}", record.id),
        None => "/records".to_string(),
    };

    let name = existing.map(|r| r.name.as_str()).unwrap_or_default();
    let address = existing.map(|r| r.address.as_str()).unwrap_or_default();
    let phone = existing.map(|r| r.phone.as_str()).unwrap_or_default();
    let region = existing.map(|r| r.region.as_str()).unwrap_or_default();
    let interval = existing.map_or(Some(1), |r| r.interval);
    let last_pickup = existing
        .and_then(|r| r.last_pickup)
        .map(to_iso)
        .unwrap_or_default();

    html! {
        div class="modal fixed inset-0 z-50 flex items-center justify-center" role="dialog" aria-modal="true" {
            div class="bg-white p-6 rounded-md shadow-lg w-96" {
                h2 class="text-xl font-semibold mb-4" {
                    @if existing.is_some() { "Edit Contact" } @else { "Add New Contact" }
                }

                form method="post" action=(action) class="space-y-4" {
                    input type="hidden" name="return_to" value=(view_query);

                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Name" }
                        input type="text" name="name" value=(name) required;
                    }
                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Address" }
                        input type="text" name="address" value=(address);
                    }
                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Phone" }
                        input type="text" name="phone" value=(phone);
                    }
                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Region" }
                        input type="text" name="region" value=(region);
                    }
                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Interval (days)" }
                        input type="number" name="interval" min="1" value=[interval] required;
                    }
                    label class="block" {
                        span class="text-sm font-medium text-gray-700" { "Last Picked Up Date" }
                        input type="date" name="last_pickup" value=(last_pickup);
                    }

                    button type="submit" class="primary" { "Save Changes" }
                }

                div class="flex justify-between mt-6" {
                    @if let Some(record) = existing {
                        form method="post" action=(format!("/records/{}/delete", record.id)) {
                            input type="hidden" name="return_to" value=(view_query);
                            button type="submit" class="danger" { "Delete" }
                        }
                    }
                    button type="button" onclick=(CLOSE_MODAL) { "Cancel" }
                }
            }
        }
    }
}
