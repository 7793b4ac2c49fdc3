use crate::domain::{DayZone, RecordFields};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, init_test_state, seed};
use chrono::{Duration, NaiveDate};

fn days_ago(days: i64) -> Option<NaiveDate> {
    Some(DayZone::utc().today() - Duration::days(days))
}

fn contact(name: &str, region: &str, last_pickup: Option<NaiveDate>) -> RecordFields {
    RecordFields {
        name: name.into(),
        address: format!("{name}vegen 1"),
        phone: String::new(),
        region: region.into(),
        interval: Some(7),
        last_pickup,
    }
}

#[test]
fn filters_combine_region_and_due_status() {
    let state = init_test_state();
    seed(&state, contact("Anna", "North", days_ago(30)));
    seed(&state, contact("Bjorn", "North", days_ago(1)));
    seed(&state, contact("Cecilie", "South", days_ago(30)));
    seed(&state, contact("Dag", "North", None));

    let body = body_string(
        handle(get("/records?region=North&due=must_pick_up"), &state).expect("Handler failed"),
    );
    assert!(body.contains("Anna"));
    assert!(!body.contains("Bjorn"));
    assert!(!body.contains("Cecilie"));
    assert!(!body.contains("Dag"));
    assert!(body.contains("1 shown, 1 must be picked up"));

    let body = body_string(handle(get("/records?due=must_not_pick_up"), &state).unwrap());
    assert!(!body.contains("Anna"));
    assert!(body.contains("Bjorn"));
    assert!(body.contains("Dag"));
}

#[test]
fn name_filter_is_case_insensitive() {
    let state = init_test_state();
    seed(&state, contact("Kari Nordmann", "North", None));
    seed(&state, contact("Ola", "North", None));

    let body = body_string(handle(get("/records?name=NORD"), &state).unwrap());
    assert!(body.contains("Kari Nordmann"));
    assert!(!body.contains("Ola"));
}

#[test]
fn sorts_by_name_ignoring_case() {
    let state = init_test_state();
    seed(&state, contact("bertha", "North", None));
    seed(&state, contact("Anna", "North", None));
    seed(&state, contact("Carl", "North", None));

    let body = body_string(handle(get("/?sort=name"), &state).unwrap());
    let anna = body.find("Anna").unwrap();
    let bertha = body.find("bertha").unwrap();
    let carl = body.find("Carl").unwrap();
    assert!(anna < bertha && bertha < carl);

    let body = body_string(handle(get("/records?sort=name&dir=desc"), &state).unwrap());
    assert!(body.find("Carl").unwrap() < body.find("Anna").unwrap());
}

#[test]
fn unsorted_view_keeps_insertion_order() {
    let state = init_test_state();
    seed(&state, contact("Zed", "North", None));
    seed(&state, contact("Adam", "North", None));

    let body = body_string(handle(get("/records"), &state).unwrap());
    assert!(body.find("Zed").unwrap() < body.find("Adam").unwrap());
}

#[test]
fn invalid_view_options_are_rejected() {
    let state = init_test_state();

    for uri in [
        "/records?sort=phone",
        "/?dir=desc",
        "/records?due=sometimes",
        "/records?day=yesterday",
    ] {
        assert!(
            matches!(
                handle(get(uri), &state),
                Err(ServerError::InvalidConfiguration(_))
            ),
            "{uri} should be rejected"
        );
    }
}

#[test]
fn api_lists_derived_views_as_json() {
    let state = init_test_state();
    let id = seed(&state, contact("Anna", "North", days_ago(10)));
    seed(&state, contact("Bjorn", "South", None));

    let resp = handle(get("/api/records?region=North"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let json: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["name"], "Anna");
    assert_eq!(items[0]["due_for_pickup"], true);
    assert_eq!(items[0]["picked_up_today"], false);
    assert_eq!(items[0]["days_since"], 10);
}

#[test]
fn export_downloads_spreadsheet() {
    let state = init_test_state();
    seed(&state, contact("Anna", "North", days_ago(3)));

    let resp = handle(get("/export.xlsx?sort=region"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(".xlsx"));

    let body = {
        use std::io::Read;
        let mut bytes = Vec::new();
        resp.into_body().reader().read_to_end(&mut bytes).unwrap();
        bytes
    };
    // xlsx is a zip archive
    assert!(body.starts_with(b"PK"));
}

#[test]
fn serves_static_files_and_refuses_traversal() {
    let state = init_test_state();
    std::fs::create_dir_all(&state.static_dir).unwrap();
    std::fs::write(state.static_dir.join("main.css"), "body { margin: 0; }").unwrap();

    let resp = handle(get("/static/main.css"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/css; charset=utf-8"
    );
    assert_eq!(body_string(resp), "body { margin: 0; }");

    assert!(matches!(
        handle(get("/static/.env"), &state),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(get("/static/missing.css"), &state),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn filter_panel_default_submission_is_accepted() {
    let state = init_test_state();
    seed(&state, contact("Anna", "North", days_ago(30)));
    seed(&state, contact("Bjorn", "North", days_ago(1)));

    // The panel's form as submitted with "Sort by: None".
    let resp = handle(
        get("/?sort=&dir=&name=&region=&day=&due=must_pick_up"),
        &state,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Anna"));
    assert!(!body.contains("Bjorn"));

    // Live name search sends the same form to the list partial.
    let body = body_string(
        handle(get("/records?sort=&dir=&name=bj&region=&day=&due=any"), &state).unwrap(),
    );
    assert!(body.contains("Bjorn"));
    assert!(!body.contains("Anna"));

    // A field without a direction sorts ascending.
    let body = body_string(handle(get("/records?sort=name&dir="), &state).unwrap());
    assert!(body.find("Anna").unwrap() < body.find("Bjorn").unwrap());
}

#[test]
fn index_page_renders_blank_direction_without_sort() {
    let state = init_test_state();
    let body = body_string(handle(get("/"), &state).unwrap());
    assert!(body.contains("<option value=\"\" selected>-</option>"));
}
