use crate::domain::dates::to_iso;
use crate::domain::{PickupHistory, RecordId, RecordView};
use maud::{html, Markup};
use url::form_urlencoded;

/// Google Maps search link for a free-form address.
pub fn google_maps_link(address: &str) -> String {
    let query: String = form_urlencoded::byte_serialize(address.as_bytes()).collect();
    format!("https://www.google.com/maps/search/?api=1&query={query}")
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Hidden undo slot for the pickup toggle. Renders nothing when no
/// previous value has been recorded.
pub fn pickup_history_input(id: &RecordId, history: &PickupHistory) -> Markup {
    html! {
        @if let Some(previous) = history.to_form_value() {
            input type="hidden" class="pickup-history" name=(format!("prev.{id}")) value=(previous);
        }
    }
}

/// One record. `view_query` is the list's current query string so edit,
/// delete and the pickup toggle land back on the same filtered view.
pub fn record_card(view: &RecordView, history: &PickupHistory, view_query: &str) -> Markup {
    let record = &view.record;
    let id = record.id.as_str();

    html! {
        article.card.p-4.flex.items-center.space-x-3.relative
            .due[view.due_for_pickup]
            .picked-up[view.picked_up_today]
            id=(format!("record-{id}"))
        {
            (pickup_history_input(&record.id, history))

            div class="avatar w-12 h-12 rounded-full bg-gray-200 flex items-center justify-center" {
                (initial(&record.name))
            }

            div class="flex-grow" {
                p class="text-md font-semibold" { (record.name) }
                @if !record.phone.is_empty() {
                    p class="text-gray-600 text-sm" {
                        a href=(format!("tel:{}", record.phone)) { (record.phone) }
                    }
                }
                @if !record.address.is_empty() {
                    a
                        href=(google_maps_link(&record.address))
                        target="_blank"
                        rel="noopener noreferrer"
                        class="text-blue-600 text-sm hover:underline"
                    { (record.address) }
                }
                p class="text-gray-500 text-xs" {
                    strong { "Region: " } (record.region)
                }
                p class="text-gray-500 text-xs" {
                    strong { "Interval: " }
                    @match record.interval {
                        Some(days) => { (days) " days" },
                        None => "not set",
                    }
                }
                p class="text-gray-400 text-xs" {
                    strong { "Last pick-up: " }
                    @match record.last_pickup {
                        Some(day) => {
                            (to_iso(day))
                            @if let Some(days) = view.days_since {
                                " (" (days) " days ago)"
                            }
                        },
                        None => "never",
                    }
                }
                @if view.due_for_pickup {
                    span class="badge badge-due" { "Must pick up" }
                }
            }

            div class="flex flex-col items-end space-y-2" {
                button
                    type="button"
                    class="pickup-toggle"
                    aria-pressed=(view.picked_up_today)
                    hx-post=(format!("/records/{id}/pickup"))
                    hx-include=".pickup-history, #view-query"
                    hx-target="#record-list"
                    hx-swap="innerHTML"
                    hx-disabled-elt="this"
                {
                    @if view.picked_up_today { "Picked up today ✓" } @else { "Picked up today" }
                }

                details class="card-menu relative" {
                    summary class="p-2" aria-label="More" { "⋮" }
                    div class="absolute right-0 bg-white border rounded shadow-md" {
                        button
                            type="button"
                            class="block px-4 py-2 text-sm text-gray-700"
                            hx-get=(format!("/records/{id}/edit?{view_query}"))
                            hx-target="#modal"
                            hx-swap="innerHTML"
                        { "Edit" }
                        form method="post" action=(format!("/records/{id}/delete")) {
                            input type="hidden" name="return_to" value=(view_query);
                            button type="submit" class="block px-4 py-2 text-sm text-red-600" { "Delete" }
                        }
                    }
                }
            }
        }
    }
}
