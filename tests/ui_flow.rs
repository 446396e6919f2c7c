mod common;

use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use stroke_risk_service::api::{self, AppState};
use stroke_risk_service::config::ArtifactsConfig;
use stroke_risk_service::ui::{self, remote::RemoteClient, Backend, UiState};

const CARDIAC_FORM: &[(&str, &str)] = &[
    ("age", "70"),
    ("chest_pain", "on"),
    ("irregular_heartbeat", "on"),
];

async fn submit(addr: SocketAddr, form: &[(&str, &str)]) -> String {
    reqwest::Client::new()
        .post(format!("http://{addr}/"))
        .form(form)
        .send()
        .await
        .expect("form submission")
        .text()
        .await
        .expect("html body")
}

fn remote_backend(api_addr: SocketAddr) -> Backend {
    remote_backend_with_timeout(api_addr, Duration::from_secs(5))
}

fn remote_backend_with_timeout(api_addr: SocketAddr, timeout: Duration) -> Backend {
    let client = RemoteClient::new(format!("http://{api_addr}/predict"), timeout).unwrap();
    Backend::remote(client)
}

/// Pull "Probability: NN.N%" out of a rendered page.
fn probability_text(html: &str) -> &str {
    let start = html.find("Probability: ").expect("probability in page");
    let rest = &html[start..];
    &rest[..rest.find('%').unwrap() + 1]
}

#[tokio::test]
async fn direct_form_renders_result() {
    let addr = common::spawn(ui::router(UiState::new(Backend::with_engine(
        common::reference_engine(),
    ))))
    .await;

    // reference model: z = 1.2 + 1.0 + 1.1 * (70 - 50) / 18 - 3.0 > 0
    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("<div class='result-box-risk'>Result: High Risk"));
    assert!(!html.contains("class='result-box-safe'"));
    assert_eq!(probability_text(&html), "Probability: 60.4%");
    // submitted answers stay filled in
    assert!(html.contains("name='chest_pain' value='on' checked"));
    assert!(html.contains("value='70'"));

    let html = submit(addr, &[("age", "25")]).await;
    assert!(html.contains("<div class='result-box-safe'>Result: Low Risk"));
    assert_eq!(probability_text(&html), "Probability: 1.1%");
}

#[tokio::test]
async fn direct_form_without_artifacts_disables_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Backend::direct(&ArtifactsConfig {
        model_path: dir.path().join("model.json").display().to_string(),
        scaler_path: dir.path().join("scaler.json").display().to_string(),
        onnx_threads: 1,
    });
    assert!(!backend.prediction_enabled());
    let addr = common::spawn(ui::router(UiState::new(backend))).await;

    let page = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Error loading artifacts"));
    assert!(page.contains("<button type='submit' disabled>"));

    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("Model or Scaler is missing. Cannot perform prediction."));
}

#[tokio::test]
async fn invalid_age_is_reported_not_crashed() {
    let addr = common::spawn(ui::router(UiState::new(Backend::with_engine(
        common::reference_engine(),
    ))))
    .await;

    let html = submit(addr, &[("age", "abc")]).await;
    assert!(html.contains("Please check your answers"));
    assert!(!html.contains("class='result-box"));
}

#[tokio::test]
async fn remote_form_matches_direct_form() {
    let api_addr =
        common::spawn(api::router(AppState::new(common::reference_engine()))).await;
    let remote = common::spawn(ui::router(UiState::new(remote_backend(api_addr)))).await;
    let direct = common::spawn(ui::router(UiState::new(Backend::with_engine(
        common::reference_engine(),
    ))))
    .await;

    for form in [CARDIAC_FORM, &[("age", "25")][..]] {
        let remote_html = submit(remote, form).await;
        let direct_html = submit(direct, form).await;
        assert_eq!(probability_text(&remote_html), probability_text(&direct_html));
        assert_eq!(
            remote_html.contains("class='result-box-risk'"),
            direct_html.contains("class='result-box-risk'")
        );
    }
}

#[tokio::test]
async fn remote_form_reports_unreachable_service() {
    let closed = common::closed_addr().await;
    let addr = common::spawn(ui::router(UiState::new(remote_backend(closed)))).await;

    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("Could not connect to the prediction service"));
    assert!(html.contains("stroke-api"));

    // still serving afterwards
    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("Could not connect"));
}

#[tokio::test]
async fn remote_form_shows_api_error_status() {
    let api_addr = common::spawn(api::router(AppState::unloaded())).await;
    let addr = common::spawn(ui::router(UiState::new(remote_backend(api_addr)))).await;

    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("Error from API: 500"));
    assert!(html.contains("Model not loaded."));
}

#[tokio::test]
async fn remote_form_reports_slow_service() {
    let slow = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "{}"
        }),
    );
    let api_addr = common::spawn(slow).await;
    let backend = remote_backend_with_timeout(api_addr, Duration::from_millis(200));
    let addr = common::spawn(ui::router(UiState::new(backend))).await;

    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("did not answer within 200 ms"));
    assert!(html.contains("stroke-api"));
    assert!(html.contains("class='note note-info'"));
    assert!(!html.contains("class='result-box"));
}

#[tokio::test]
async fn remote_form_reports_truncated_error_body() {
    // Promises 64 body bytes, sends 7, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api_addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(
                b"HTTP/1.1 503 Service Unavailable\r\n\
                  content-type: text/plain\r\n\
                  content-length: 64\r\n\r\npartial",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
        while matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {}
    });
    let addr = common::spawn(ui::router(UiState::new(remote_backend(api_addr)))).await;

    let html = submit(addr, CARDIAC_FORM).await;
    assert!(html.contains("Error from API: 503"));
    assert!(html.contains("response body unreadable"));
}
