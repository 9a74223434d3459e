use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, DeviceInfo, SearchHintResult, API_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- ping ---

#[tokio::test]
async fn ping_returns_json_pong() {
    let resp = app().oneshot(get_request("/System/Ping")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let pong: String = body_json(resp).await;
    assert_eq!(pong, "pong");
}

// --- system info ---

#[tokio::test]
async fn system_info_requires_token() {
    let resp = app().oneshot(get_request("/System/Info")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn system_info_with_token() {
    let req = Request::builder()
        .uri("/System/Info")
        .header("X-Api-Token", API_TOKEN)
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- devices ---

#[tokio::test]
async fn unknown_device_is_404_with_error_body() {
    let resp = app()
        .oneshot(get_request("/Devices/Info?id=abc"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn options_upsert_then_fetch() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/Devices/Options?id=d1",
            r#"{"custom_name":"den"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.oneshot(get_request("/Devices/Info?id=d1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let device: DeviceInfo = body_json(resp).await;
    assert_eq!(device.id, "d1");
    assert_eq!(device.custom_name.as_deref(), Some("den"));
}

#[tokio::test]
async fn options_without_id_is_400() {
    let resp = app()
        .oneshot(json_request("POST", "/Devices/Options", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_unknown_device_is_404() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/Devices?id=ghost")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- download ---

#[tokio::test]
async fn download_carries_disposition_and_bytes() {
    let id = uuid::Uuid::nil();
    let resp = app()
        .oneshot(get_request(&format!("/Items/{id}/Download")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_DISPOSITION],
        r#"attachment; filename="clip.mp4""#
    );
    let bytes = body_bytes(resp).await;
    assert_eq!(&bytes[..], format!("media bytes for {id}").as_bytes());
}

// --- search ---

#[tokio::test]
async fn search_echoes_one_hint_per_media_type() {
    let resp = app()
        .oneshot(get_request(
            "/Search/Hints?searchTerm=piano&mediaTypes=Video&mediaTypes=Audio",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: SearchHintResult = body_json(resp).await;
    assert_eq!(result.total_record_count, 2);
    assert_eq!(result.search_hints[0].media_type, "Video");
    assert_eq!(result.search_hints[1].media_type, "Audio");
}

#[tokio::test]
async fn search_limit_truncates_hints() {
    let resp = app()
        .oneshot(get_request(
            "/Search/Hints?searchTerm=x&limit=1&mediaTypes=Video&mediaTypes=Audio",
        ))
        .await
        .unwrap();
    let result: SearchHintResult = body_json(resp).await;
    assert_eq!(result.total_record_count, 1);
}
