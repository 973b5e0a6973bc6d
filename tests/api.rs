use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::{sleep, timeout};
use tower::ServiceExt;

use zene::{
    api::create_router,
    services::LogRecorder,
    state::{AppState, TimerOptions, TimerProfile},
    tasks::TimerHandle,
};

fn app(profile: TimerProfile) -> Router {
    let timer = TimerHandle::spawn(TimerOptions::new(profile), Arc::new(LogRecorder));
    create_router(Arc::new(AppState::new(20554, "127.0.0.1".to_string(), timer)))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(TimerProfile::Pomodoro);
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_starts_idle_in_work_mode() {
    let app = app(TimerProfile::Pomodoro);
    let (status, body) = call(&app, "GET", "/timer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"], "pomodoro");
    assert_eq!(body["timer"]["mode"], "work");
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["elapsed_seconds"], 0);
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test]
async fn duration_then_start_then_duration_is_rejected() {
    let app = app(TimerProfile::Pomodoro);

    let (_, body) = call(&app, "POST", "/timer/duration", Some(json!({ "seconds": 2700 }))).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["timer"]["remaining_seconds"], 2700);

    let (_, body) = call(&app, "POST", "/timer/start", None).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["timer"]["running"], true);

    let (status, body) = call(&app, "POST", "/timer/duration", Some(json!({ "seconds": 900 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["timer"]["configured_seconds"], 2700);

    let (_, body) = call(&app, "GET", "/timer", None).await;
    assert_eq!(body["last_action"], "start");
}

#[tokio::test]
async fn pause_twice_is_rejected_the_second_time() {
    let app = app(TimerProfile::Pomodoro);
    call(&app, "POST", "/timer/start", None).await;

    let (_, first) = call(&app, "POST", "/timer/pause", None).await;
    let (_, second) = call(&app, "POST", "/timer/pause", None).await;
    assert_eq!(first["status"], "accepted");
    assert_eq!(second["status"], "rejected");
    assert_eq!(first["timer"]["remaining_seconds"], second["timer"]["remaining_seconds"]);
    assert_eq!(second["timer"]["running"], false);
}

#[tokio::test]
async fn mode_switch_respects_profile() {
    let app = app(TimerProfile::Pomodoro);

    let (_, body) = call(&app, "POST", "/timer/mode", Some(json!({ "mode": "break" }))).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["timer"]["mode"], "break");
    assert_eq!(body["timer"]["remaining_seconds"], 300);

    let (_, body) = call(&app, "POST", "/timer/mode", Some(json!({ "mode": "meditation" }))).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["timer"]["mode"], "break");

    let (_, body) = call(&app, "POST", "/timer/reset-all", None).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["timer"]["mode"], "work");
    assert_eq!(body["timer"]["cycles_completed"], 0);
}

#[tokio::test]
async fn meditation_profile_presets_and_reset_all() {
    let app = app(TimerProfile::Meditation);

    let (_, body) = call(&app, "GET", "/timer/presets", None).await;
    assert_eq!(body["profile"], "meditation");
    assert_eq!(body["modes"][0]["mode"], "meditation");
    assert_eq!(body["modes"][0]["presets"], json!([300, 600, 900, 1200]));

    let (_, body) = call(&app, "POST", "/timer/reset-all", None).await;
    assert_eq!(body["status"], "rejected");
}

#[tokio::test]
async fn unknown_mode_is_a_client_error() {
    let app = app(TimerProfile::Pomodoro);
    let (status, _) = call(&app, "POST", "/timer/mode", Some(json!({ "mode": "nap" }))).await;
    assert!(status.is_client_error());
}

#[tokio::test(start_paused = true)]
async fn status_reports_elapsed_seconds() {
    let app = app(TimerProfile::Meditation);
    call(&app, "POST", "/timer/duration", Some(json!({ "seconds": 300 }))).await;
    call(&app, "POST", "/timer/start", None).await;

    sleep(Duration::from_millis(10_500)).await;

    let (_, body) = call(&app, "GET", "/timer", None).await;
    assert_eq!(body["timer"]["elapsed_seconds"], 10);
    assert_eq!(body["timer"]["remaining_seconds"], 290);

    let (_, body) = call(&app, "POST", "/timer/pause", None).await;
    assert_eq!(body["timer"]["elapsed_seconds"], 10);
}

#[tokio::test]
async fn events_stream_delivers_named_events_and_ends_with_timer() {
    let app = app(TimerProfile::Pomodoro);
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut frames = response.into_body().into_data_stream();

    call(&app, "POST", "/timer/start", None).await;

    let frame = timeout(Duration::from_secs(5), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: started"), "{text}");

    let data = text.lines().find_map(|line| line.strip_prefix("data: ")).unwrap();
    let payload: Value = serde_json::from_str(data).unwrap();
    assert_eq!(payload["event"], "started");
    assert_eq!(payload["mode"], "work");
    assert_eq!(payload["remaining_seconds"], 1500);

    // Dropping the router drops the last timer handle and stops the task
    drop(app);
    let end = timeout(Duration::from_secs(5), frames.next()).await.unwrap();
    assert!(end.is_none());
}
