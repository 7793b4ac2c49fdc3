use crate::domain::dates::to_iso;
use crate::domain::view::{DueStatus, SortDirection, SortField};
use crate::domain::ViewQuery;
use maud::{html, Markup};

const DUE_OPTIONS: [(DueStatus, &str); 3] = [
    (DueStatus::MustPickUp, "Must pick up"),
    (DueStatus::MustNotPickUp, "Must not pick up"),
    (DueStatus::AnyStatus, "Show all"),
];

const SORT_OPTIONS: [(SortField, &str); 3] = [
    (SortField::Name, "Name"),
    (SortField::Region, "Region"),
    (SortField::LastPickup, "Last pick-up"),
];

/// Filter and sort popover. Submits as a plain GET so the URL always holds
/// the active view.
pub fn filter_panel(query: &ViewQuery, regions: &[String]) -> Markup {
    let filters = &query.filters;
    let sort_field = query.sort.map(|s| s.field);
    let direction = query.sort.map(|s| s.direction);
    let name = filters.name_contains.as_deref().unwrap_or_default();
    let selected_region = filters.region.as_deref().unwrap_or_default();
    let day = filters.on_day.map(to_iso).unwrap_or_default();

    html! {
        details class="filter-popover relative" open[!filters.is_empty() || query.sort.is_some()] {
            summary class="icon-button" aria-label="Filter and sort" { "⏷" }

            form method="get" action="/" class="absolute top-12 right-0 z-10 bg-white shadow-lg border rounded-md w-48 p-4" {
                p class="font-medium mb-2" { "Sort by" }
                select name="sort" {
                    option value="" selected[sort_field.is_none()] { "None" }
                    @for (field, label) in SORT_OPTIONS {
                        option value=(field.as_str()) selected[sort_field == Some(field)] { (label) }
                    }
                }
                // Blank while no field is picked; a bare `dir` is rejected.
                select name="dir" {
                    option value="" selected[direction.is_none()] { "-" }
                    option value=(SortDirection::Ascending.as_str()) selected[direction == Some(SortDirection::Ascending)] { "A-Z / oldest first" }
                    option value=(SortDirection::Descending.as_str()) selected[direction == Some(SortDirection::Descending)] { "Z-A / newest first" }
                }

                p class="font-medium mb-2" { "Filter" }
                label class="block" {
                    "Name"
                    input
                        type="search"
                        name="name"
                        value=(name)
                        hx-get="/records"
                        hx-trigger="keyup changed delay:300ms"
                        hx-include="closest form"
                        hx-target="#record-list";
                }
                label class="block" {
                    "Region"
                    select name="region" {
                        option value="" selected[selected_region.is_empty()] { "Any" }
                        @for region in regions {
                            option value=(region) selected[selected_region == region.as_str()] { (region) }
                        }
                    }
                }
                label class="block" {
                    "Picked up on"
                    input type="date" name="day" value=(day);
                }

                div class="mb-4" {
                    @for (status, label) in DUE_OPTIONS {
                        label class="flex items-center" {
                            input
                                type="radio"
                                name="due"
                                class="mr-2"
                                value=(status.as_str())
                                checked[filters.due_status == status];
                            (label)
                        }
                    }
                }

                button type="submit" class="w-full primary" { "Apply" }
                a href="/" class="block text-center text-sm mt-2" { "Reset" }
            }
        }
    }
}
