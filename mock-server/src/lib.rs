//! Media-server-flavored mock API used by the core integration tests.
//!
//! Exposes a small slice of a media server's REST surface: ping, device
//! registry, search hints with multi-valued query parameters, an
//! authenticated system-info endpoint, and a binary item download carrying
//! a `Content-Disposition` filename.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token expected by `GET /System/Info`.
pub const API_TOKEN: &str = "secret-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub custom_name: Option<String>,
}

#[derive(Deserialize)]
pub struct DeviceOptions {
    pub custom_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemInfo {
    pub server_name: String,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHint {
    pub name: String,
    pub media_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHintResult {
    pub search_hints: Vec<SearchHint>,
    pub total_record_count: usize,
}

pub type Db = Arc<RwLock<HashMap<String, DeviceInfo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/System/Ping", get(ping))
        .route("/System/Info", get(system_info))
        .route("/Devices/Info", get(device_info))
        .route("/Devices/Options", post(update_device_options))
        .route("/Devices", delete(delete_device))
        .route("/Items/{itemId}/Download", get(download_item))
        .route("/Search/Hints", get(search_hints))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Split a raw query string into ordered pairs; repeated names are kept.
fn query_pairs(raw: Option<String>) -> Vec<(String, String)> {
    raw.unwrap_or_default()
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

async fn ping() -> Json<&'static str> {
    Json("pong")
}

async fn system_info(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("X-Api-Token").and_then(|v| v.to_str().ok()) {
        Some(token) if token == API_TOKEN => (
            StatusCode::OK,
            Json(json!({
                "server_name": "mock",
                "version": "10.0.0",
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized"})),
        ),
    }
}

async fn device_info(State(db): State<Db>, RawQuery(raw): RawQuery) -> impl IntoResponse {
    let pairs = query_pairs(raw);
    let id = first(&pairs, "id").unwrap_or_default();
    match db.read().await.get(id) {
        Some(device) => (StatusCode::OK, Json(json!(device))),
        None => (StatusCode::NOT_FOUND, Json(json!({"error":"not found"}))),
    }
}

async fn update_device_options(
    State(db): State<Db>,
    RawQuery(raw): RawQuery,
    Json(options): Json<DeviceOptions>,
) -> StatusCode {
    let pairs = query_pairs(raw);
    let Some(id) = first(&pairs, "id").filter(|id| !id.is_empty()) else {
        return StatusCode::BAD_REQUEST;
    };
    let mut devices = db.write().await;
    let device = devices.entry(id.to_string()).or_insert_with(|| DeviceInfo {
        id: id.to_string(),
        name: format!("device-{id}"),
        custom_name: None,
    });
    device.custom_name = options.custom_name;
    StatusCode::NO_CONTENT
}

async fn delete_device(State(db): State<Db>, RawQuery(raw): RawQuery) -> StatusCode {
    let pairs = query_pairs(raw);
    let id = first(&pairs, "id").unwrap_or_default();
    if db.write().await.remove(id).is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn download_item(Path(item_id): Path<Uuid>) -> impl IntoResponse {
    let body = format!("media bytes for {item_id}").into_bytes();
    (
        StatusCode::OK,
        [(
            header::CONTENT_DISPOSITION,
            r#"attachment; filename="clip.mp4""#,
        )],
        body,
    )
}

async fn search_hints(RawQuery(raw): RawQuery) -> Json<SearchHintResult> {
    let pairs = query_pairs(raw);
    let term = first(&pairs, "searchTerm").unwrap_or_default().to_string();
    let limit = first(&pairs, "limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(usize::MAX);
    let media_types: Vec<String> = pairs
        .iter()
        .filter(|(n, _)| n == "mediaTypes")
        .map(|(_, v)| v.clone())
        .collect();

    let hints: Vec<SearchHint> = media_types
        .iter()
        .take(limit)
        .map(|media_type| SearchHint {
            name: format!("{term} ({media_type})"),
            media_type: media_type.clone(),
        })
        .collect();
    let total = hints.len();
    Json(SearchHintResult {
        search_hints: hints,
        total_record_count: total,
    })
}
