use crate::domain::{DayZone, RecordFields};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, init_test_state, post_form, seed, stored};
use chrono::NaiveDate;

fn contact(name: &str, last_pickup: Option<NaiveDate>) -> RecordFields {
    RecordFields {
        name: name.into(),
        address: String::new(),
        phone: String::new(),
        region: "North".into(),
        interval: Some(7),
        last_pickup,
    }
}

#[test]
fn toggle_marks_picked_up_today_and_remembers_previous_date() {
    let state = init_test_state();
    let id = seed(&state, contact("Kari", NaiveDate::from_ymd_opt(2024, 1, 1)));

    let resp = handle(
        post_form(&format!("/records/{id}/pickup"), "return_to="),
        &state,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains(&format!("name=\"prev.{id}\"")));
    assert!(body.contains("value=\"2024-01-01\""));
    assert!(!body.contains("<html"));

    assert_eq!(
        stored(&state, &id).last_pickup,
        Some(DayZone::utc().today())
    );
}

#[test]
fn second_toggle_restores_previous_date() {
    let state = init_test_state();
    let id = seed(&state, contact("Kari", NaiveDate::from_ymd_opt(2024, 1, 1)));

    handle(
        post_form(&format!("/records/{id}/pickup"), "return_to="),
        &state,
    )
    .unwrap();

    let body = body_string(
        handle(
            post_form(
                &format!("/records/{id}/pickup"),
                &format!("prev.{id}=2024-01-01&return_to="),
            ),
            &state,
        )
        .unwrap(),
    );

    assert_eq!(
        stored(&state, &id).last_pickup,
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
    assert!(!body.contains(&format!("prev.{id}")));
}

#[test]
fn toggle_of_never_picked_up_record_round_trips_to_never() {
    let state = init_test_state();
    let id = seed(&state, contact("Ola", None));

    let body = body_string(
        handle(post_form(&format!("/records/{id}/pickup"), ""), &state).unwrap(),
    );
    assert!(body.contains("value=\"none\""));

    handle(
        post_form(&format!("/records/{id}/pickup"), &format!("prev.{id}=none")),
        &state,
    )
    .unwrap();
    assert_eq!(stored(&state, &id).last_pickup, None);
}

#[test]
fn other_cards_keep_their_undo_slots() {
    let state = init_test_state();
    let first = seed(&state, contact("Kari", NaiveDate::from_ymd_opt(2024, 1, 1)));
    let second = seed(&state, contact("Ola", NaiveDate::from_ymd_opt(2024, 1, 5)));

    let body = body_string(
        handle(
            post_form(
                &format!("/records/{second}/pickup"),
                &format!("prev.{first}=2023-12-24&return_to=sort%3Dname"),
            ),
            &state,
        )
        .unwrap(),
    );

    assert!(body.contains(&format!("name=\"prev.{first}\"")));
    assert!(body.contains("value=\"2023-12-24\""));
    assert!(body.contains(&format!("name=\"prev.{second}\"")));
    assert!(body.contains("value=\"2024-01-05\""));
    assert!(body.contains("value=\"sort=name&amp;dir=asc\""));
}

#[test]
fn toggle_rejects_unknown_record_and_bad_history() {
    let state = init_test_state();
    let id = seed(&state, contact("Kari", None));

    assert!(matches!(
        handle(post_form("/records/ghost/pickup", ""), &state),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(
            post_form(&format!("/records/{id}/pickup"), &format!("prev.{id}=later")),
            &state
        ),
        Err(ServerError::BadRequest(_))
    ));
    assert_eq!(stored(&state, &id).last_pickup, None);
}

#[test]
fn undo_survives_when_due_filter_hides_the_record() {
    let state = init_test_state();
    let id = seed(&state, contact("Kari", NaiveDate::from_ymd_opt(2024, 1, 1)));

    // Picking up makes the record no longer due, so the card drops out.
    let body = body_string(
        handle(
            post_form(
                &format!("/records/{id}/pickup"),
                "return_to=due%3Dmust_pick_up",
            ),
            &state,
        )
        .unwrap(),
    );
    assert!(!body.contains(&format!("id=\"record-{id}\"")));
    assert!(body.contains(&format!("name=\"prev.{id}\" value=\"2024-01-01\"")));

    // Undo from the filtered view, posting the slot that was kept.
    handle(
        post_form(
            &format!("/records/{id}/pickup"),
            &format!("prev.{id}=2024-01-01&return_to=due%3Dmust_pick_up"),
        ),
        &state,
    )
    .unwrap();
    assert_eq!(
        stored(&state, &id).last_pickup,
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
}
