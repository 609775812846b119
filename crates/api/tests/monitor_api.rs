//! Integration tests for monitor control and the dashboard.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post};
use vitalwatch_core::simulator::baseline;
use vitalwatch_core::vitals::{VitalKey, VitalsSample};
use vitalwatch_db::ReadingStore;

#[tokio::test(start_paused = true)]
async fn start_records_immediately_and_stop_is_idempotent() {
    let (app, state) = build_test_app();

    let monitor = body_json(get(&app, "/api/v1/monitor").await).await;
    assert_eq!(monitor["data"]["isActive"], false);
    assert_eq!(monitor["data"]["phase"], "stopped");

    let started = body_json(post(&app, "/api/v1/monitor/start").await).await;
    assert_eq!(started["data"]["changed"], true);
    assert_eq!(started["data"]["state"]["isActive"], true);
    assert_eq!(started["data"]["state"]["secondsUntilNext"], 30);
    assert_eq!(state.store.read_all().await.unwrap().len(), 1);

    let again = body_json(post(&app, "/api/v1/monitor/start").await).await;
    assert_eq!(again["data"]["changed"], false);

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    assert_eq!(state.store.read_all().await.unwrap().len(), 2);

    let stopped = body_json(post(&app, "/api/v1/monitor/stop").await).await;
    assert_eq!(stopped["data"]["changed"], true);
    assert_eq!(stopped["data"]["state"]["isActive"], false);

    let stopped_again = body_json(post(&app, "/api/v1/monitor/stop").await).await;
    assert_eq!(stopped_again["data"]["changed"], false);
}

#[tokio::test]
async fn dashboard_alerts_can_be_dismissed_until_a_new_sample_arrives() {
    let (app, state) = build_test_app();

    let empty = body_json(get(&app, "/api/v1/dashboard").await).await;
    assert!(empty["data"]["latest"].is_null());
    assert_eq!(empty["data"]["alerts"].as_array().unwrap().len(), 0);
    assert_eq!(empty["data"]["monitoringActive"], false);

    let febrile = baseline().with(VitalKey::Temperature, 38.0);
    state.store.write(&VitalsSample::new(febrile, 1_000)).await.unwrap();

    let dashboard = body_json(get(&app, "/api/v1/dashboard").await).await;
    assert_eq!(dashboard["data"]["overall"], "warning");
    let alert = &dashboard["data"]["alerts"][0];
    assert_eq!(alert["id"], "temperature-1000");
    assert_eq!(alert["value"], "38.0");
    assert_eq!(alert["headline"], "WARNING");

    let response = post(&app, "/api/v1/alerts/temperature-1000/dismiss").await;
    assert_eq!(response.status(), StatusCode::OK);
    let dismissed = body_json(response).await;
    assert_eq!(dismissed["data"]["dismissed"], true);
    assert_eq!(dismissed["data"]["dashboard"]["alerts"].as_array().unwrap().len(), 0);

    // Same sample on refresh: still dismissed.
    let refreshed = body_json(get(&app, "/api/v1/dashboard").await).await;
    assert_eq!(refreshed["data"]["alerts"].as_array().unwrap().len(), 0);

    // A new sample with the same abnormality alerts again.
    state.store.write(&VitalsSample::new(febrile, 2_000)).await.unwrap();
    let next = body_json(get(&app, "/api/v1/dashboard").await).await;
    assert_eq!(next["data"]["alerts"][0]["id"], "temperature-2000");

    let stale = body_json(post(&app, "/api/v1/alerts/temperature-1000/dismiss").await).await;
    assert_eq!(stale["data"]["dismissed"], false);
}

#[tokio::test]
async fn malformed_alert_id_is_a_bad_request() {
    let (app, _) = build_test_app();
    let response = post(&app, "/api/v1/alerts/not-an-alert/dismiss").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
