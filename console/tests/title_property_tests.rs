// Property-based tests for title computation and session storage

use common::models::RouteState;
use console::session::SessionStore;
use console::state::AppStateSnapshot;
use console::title::{compute_title, ERROR_TITLE, LOADING_TITLE};
use proptest::prelude::*;

// Whenever a page title and a non-empty instance name are both known, the
// computed title is exactly "{stage}-{instance} | {page}", regardless of any
// startup error.
#[test]
fn property_known_page_and_instance_formats_title() {
    proptest!(|(
        stage in "[A-Z]{2,4}",
        instance in "[a-z][a-z0-9]{0,15}",
        page in "[A-Za-z][A-Za-z ]{0,29}",
        error in proptest::option::of("[a-z ]{1,20}"),
    )| {
        let route = RouteState::new("any", Some(&page));
        let state = AppStateSnapshot {
            instance_name: Some(instance.clone()),
            dtap_stage: stage.clone(),
            startup_error: error,
        };
        prop_assert_eq!(
            compute_title(Some(&route), &state),
            format!("{}-{} | {}", stage, instance, page)
        );
    });
}

// Without a usable page/instance combination, a known startup error always
// degrades the title to the error marker.
#[test]
fn property_startup_error_forces_error_marker() {
    proptest!(|(
        error in "[a-z ]{1,20}",
        with_route in any::<bool>(),
    )| {
        // The route, when present, carries no page title, so the page rule
        // can never apply.
        let route = with_route.then(|| RouteState::new("any", None));
        let state = AppStateSnapshot {
            instance_name: None,
            dtap_stage: "PRD".to_string(),
            startup_error: Some(error),
        };
        prop_assert_eq!(compute_title(route.as_ref(), &state), ERROR_TITLE);
    });
}

// With neither page context nor a startup error the title stays at the
// loading default, whatever the stage value is.
#[test]
fn property_no_signals_keeps_loading_default() {
    proptest!(|(stage in "[A-Z]{0,4}")| {
        let state = AppStateSnapshot {
            instance_name: None,
            dtap_stage: stage,
            startup_error: None,
        };
        prop_assert_eq!(compute_title(None, &state), LOADING_TITLE);
    });
}

// Any JSON-serializable value survives a set/get round trip through the
// session store, for any reasonable key.
#[test]
fn property_session_round_trips_json_values() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = rt
        .block_on(SessionStore::open(dir.path()))
        .expect("Failed to open store");

    proptest!(|(
        key in "\\PC{1,24}",
        text in "\\PC{0,40}",
        number in any::<i64>(),
        flag in any::<bool>(),
        items in prop::collection::vec(any::<i32>(), 0..5),
    )| {
        let value = serde_json::json!({
            "text": text,
            "number": number,
            "flag": flag,
            "items": items,
        });

        let loaded: Option<serde_json::Value> = rt.block_on(async {
            store.set(&key, &value).await.expect("set failed");
            store.get(&key).await.expect("get failed")
        });
        prop_assert_eq!(loaded, Some(value));
    });
}
