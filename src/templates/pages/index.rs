use std::collections::HashMap;

use crate::domain::{PickupHistory, RecordId, RecordView, ViewQuery};
use crate::templates::components::record_card::pickup_history_input;
use crate::templates::components::{filter_panel, record_card};
use crate::templates::mobile_layout;
use maud::{html, Markup};

pub struct IndexVm {
    pub views: Vec<RecordView>,
    pub query: ViewQuery,
    pub regions: Vec<String>,
    /// Undo slots for the pickup toggle, keyed by record. Empty on a fresh load.
    pub histories: HashMap<RecordId, PickupHistory>,
}

pub fn index_page(vm: &IndexVm) -> Markup {
    let view_query = vm.query.to_query_string();
    let export_href = if view_query.is_empty() {
        "/export.xlsx".to_string()
    } else {
        format!("/export.xlsx?{view_query}")
    };

    mobile_layout(
        "Flasker",
        html! {
            div class="flex justify-between items-center mb-4" {
                h1 class="text-2xl font-bold" { "Flasker" }
                div class="flex space-x-2 relative" {
                    button
                        type="button"
                        class="icon-button"
                        aria-label="Add contact"
                        hx-get=(format!("/records/new?{view_query}"))
                        hx-target="#modal"
                        hx-swap="innerHTML"
                    { "+" }
                    a class="icon-button" href=(export_href) aria-label="Export to spreadsheet" { "⤓" }
                    (filter_panel(&vm.query, &vm.regions))
                }
            }

            div id="record-list" class="grid gap-2 mb-8" {
                (record_list(&vm.views, &vm.query, &vm.histories))
            }

            div id="modal" {}
        },
    )
}

/// The list body. Rendered on its own for htmx swaps.
pub fn record_list(
    views: &[RecordView],
    query: &ViewQuery,
    histories: &HashMap<RecordId, PickupHistory>,
) -> Markup {
    let view_query = query.to_query_string();
    let due = views.iter().filter(|v| v.due_for_pickup).count();

    // Slots of records the filter hides still have to survive the swap.
    let mut hidden: Vec<(&RecordId, &PickupHistory)> = histories
        .iter()
        .filter(|(id, _)| !views.iter().any(|v| &v.record.id == *id))
        .collect();
    hidden.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

    html! {
        input type="hidden" id="view-query" name="return_to" value=(view_query);
        @for (id, history) in hidden {
            (pickup_history_input(id, history))
        }

        @if views.is_empty() {
            p class="empty" { "No data found." }
        } @else {
            p class="summary text-sm text-gray-500" {
                (views.len()) " shown, " (due) " must be picked up"
            }
            @for view in views {
                (record_card(
                    view,
                    &histories.get(&view.record.id).copied().unwrap_or_default(),
                    &view_query,
                ))
            }
        }
    }
}
