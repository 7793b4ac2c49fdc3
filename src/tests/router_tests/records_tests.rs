use crate::db::RecordRepository;
use crate::domain::{RecordFields, RecordId};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, init_test_state, post_form, seed, stored};
use chrono::NaiveDate;

fn kari() -> RecordFields {
    RecordFields {
        name: "Kari".into(),
        address: "Storgata 1, Oslo".into(),
        phone: "12345678".into(),
        region: "North".into(),
        interval: Some(14),
        last_pickup: NaiveDate::from_ymd_opt(2024, 1, 1),
    }
}

#[test]
fn index_page_loads_and_lists_records() {
    let state = init_test_state();
    seed(&state, kari());

    let resp = handle(get("/"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Flasker"));
    assert!(body.contains("Kari"));
    assert!(body.contains("google.com/maps"));
}

#[test]
fn empty_list_says_no_data() {
    let state = init_test_state();
    let body = body_string(handle(get("/"), &state).unwrap());
    assert!(body.contains("No data found."));
}

#[test]
fn create_redirects_back_to_the_view() {
    let state = init_test_state();

    let resp = handle(
        post_form(
            "/records",
            "name=Ola&address=Kirkeveien+2&phone=&region=South&interval=7&last_pickup=2024-02-10&return_to=sort%3Dname",
        ),
        &state,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/?sort=name&dir=asc"
    );

    let records = state.records.list_resolved().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Ola");
    assert_eq!(records[0].address, "Kirkeveien 2");
    assert_eq!(records[0].interval, Some(7));
    assert_eq!(records[0].last_pickup, NaiveDate::from_ymd_opt(2024, 2, 10));
}

#[test]
fn create_rejects_invalid_form() {
    let state = init_test_state();

    let missing_name = handle(post_form("/records", "name=&interval=3"), &state);
    assert!(matches!(missing_name, Err(ServerError::BadRequest(_))));

    let zero_interval = handle(post_form("/records", "name=Ola&interval=0"), &state);
    assert!(matches!(zero_interval, Err(ServerError::BadRequest(_))));

    assert!(state.records.list().unwrap().is_empty());
}

#[test]
fn new_form_loads_as_partial() {
    let state = init_test_state();
    let body = body_string(handle(get("/records/new?region=North"), &state).unwrap());

    assert!(body.contains("Add New Contact"));
    assert!(body.contains("value=\"region=North\""));
    assert!(!body.contains("<html"));
}

#[test]
fn edit_form_is_prefilled() {
    let state = init_test_state();
    let id = seed(&state, kari());

    let body = body_string(handle(get(&format!("/records/{id}/edit")), &state).unwrap());
    assert!(body.contains("Edit Contact"));
    assert!(body.contains("value=\"Kari\""));
    assert!(body.contains("value=\"2024-01-01\""));

    let missing = handle(get("/records/nope/edit"), &state);
    assert!(matches!(missing, Err(ServerError::NotFound)));
}

#[test]
fn update_overwrites_all_fields_and_keeps_id() {
    let state = init_test_state();
    let id = seed(&state, kari());

    let resp = handle(
        post_form(
            &format!("/records/{id}"),
            "name=Kari+Nordmann&address=Ny+gate+3&phone=999&region=West&interval=30&last_pickup=",
        ),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");

    let record = stored(&state, &id);
    assert_eq!(record.name, "Kari Nordmann");
    assert_eq!(record.region, "West");
    assert_eq!(record.interval, Some(30));
    assert_eq!(record.last_pickup, None);
}

#[test]
fn update_of_unknown_record_is_not_found() {
    let state = init_test_state();
    let resp = handle(post_form("/records/ghost", "name=Ola&interval=3"), &state);
    assert!(matches!(resp, Err(ServerError::NotFound)));
}

#[test]
fn delete_removes_record() {
    let state = init_test_state();
    let keep = seed(&state, kari());
    let gone = seed(&state, RecordFields { name: "Ola".into(), ..kari() });

    let resp = handle(
        post_form(&format!("/records/{gone}/delete"), "return_to=due%3Dmust_pick_up"),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "/?due=must_pick_up"
    );

    let ids: Vec<RecordId> = state
        .records
        .list()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![keep]);

    let again = handle(post_form(&format!("/records/{gone}/delete"), ""), &state);
    assert!(matches!(again, Err(ServerError::NotFound)));
}

#[test]
fn unknown_route_is_not_found() {
    let state = init_test_state();
    assert!(matches!(
        handle(get("/admin"), &state),
        Err(ServerError::NotFound)
    ));
}
