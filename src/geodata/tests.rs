//! Geo-data client tests against a local stub of each service

use super::*;
use crate::geodata::elevation::ElevationClass;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;

type Params = Query<HashMap<String, String>>;

async fn sun(Query(p): Params) -> Json<Value> {
    if p.get("formatted").map(String::as_str) != Some("0") {
        return Json(json!({"status": "INVALID_REQUEST", "results": ""}));
    }
    if p.get("date").map(String::as_str) == Some("1999-12-31") {
        return Json(json!({"status": "INVALID_DATE", "results": ""}));
    }
    Json(json!({"status": "OK", "results": {
        "sunrise": "2024-03-20T05:45:12+00:00",
        "sunset": "2024-03-20T17:55:40+00:00",
        "solar_noon": "2024-03-20T11:50:26+00:00",
        "day_length": 43828,
        "civil_twilight_begin": "2024-03-20T05:13:59+00:00",
        "civil_twilight_end": "2024-03-20T18:26:53+00:00",
        "nautical_twilight_begin": "2024-03-20T04:37:05+00:00",
        "nautical_twilight_end": "2024-03-20T19:03:47+00:00",
        "astronomical_twilight_begin": "2024-03-20T03:59:34+00:00",
        "astronomical_twilight_end": "2024-03-20T19:41:18+00:00"
    }}))
}

async fn elevation(Json(body): Json<Value>) -> Json<Value> {
    let lat = body["locations"][0]["latitude"].as_f64().unwrap_or_default();
    if lat > 80.0 {
        return Json(json!({"results": []}));
    }
    Json(json!({"results": [{"latitude": lat, "longitude": 0.0, "elevation": 1337.0}]}))
}

async fn timezone(Query(p): Params) -> Response {
    match p.get("key").map(String::as_str) {
        Some("broken") => (StatusCode::BAD_GATEWAY, "bad gateway").into_response(),
        Some("demo") if p.get("lat").map(String::as_str) == Some("48.85") => Json(json!({
            "status": "OK", "message": "", "countryCode": "FR", "zoneName": "Europe/Paris",
            "abbreviation": "CET", "gmtOffset": 3600, "dst": "0", "timestamp": 1710928800
        }))
        .into_response(),
        _ => Json(json!({"status": "FAILED", "message": "Record not found."})).into_response(),
    }
}

async fn overpass(body: String) -> Response {
    if !body.contains("around:300,") {
        return (StatusCode::BAD_REQUEST, "unexpected query").into_response();
    }
    Json(json!({"elements": [
        {"type": "node", "id": 3, "lat": 0.003, "lon": 0.0, "tags": {"name": "Far", "shop": "books"}},
        {"type": "node", "id": 1, "lat": 0.001, "lon": 0.0, "tags": {"name": "Near", "amenity": "cafe"}},
        {"type": "node", "id": 2, "lat": 0.002, "lon": 0.0, "tags": {}}
    ]}))
    .into_response()
}

async fn spawn_stub() -> GeoDataClient {
    let app = Router::new()
        .route("/json", get(sun))
        .route("/api/v1/lookup", post(elevation))
        .route("/v2.1/get-time-zone", get(timezone))
        .route("/api/interpreter", post(overpass));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    GeoDataClient::with_endpoints(GeoEndpoints::single(&format!("http://{}", addr))).unwrap()
}

#[tokio::test]
async fn test_sun_times() {
    let client = spawn_stub().await;
    let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();

    let times = client.sun_times(48.85, 2.35, date).await.unwrap();
    assert!(times.sunrise < times.solar_noon && times.solar_noon < times.sunset);
    assert_eq!(times.day_length().num_seconds(), 43828);
}

#[tokio::test]
async fn test_sun_times_bad_status() {
    let client = spawn_stub().await;
    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();

    let err = client.sun_times(48.85, 2.35, date).await.unwrap_err();
    assert!(matches!(err, Error::GeoData(ref m) if m.contains("INVALID_DATE")));
}

#[tokio::test]
async fn test_elevation() {
    let client = spawn_stub().await;

    let meters = client.elevation(45.0, 6.0).await.unwrap().unwrap();
    assert_eq!(meters, 1337.0);
    assert_eq!(ElevationClass::from_meters(meters), ElevationClass::Moderate);

    assert_eq!(client.elevation(85.0, 0.0).await.unwrap(), None);
}

#[tokio::test]
async fn test_timezone() {
    let client = spawn_stub().await;

    let info = client.timezone(48.85, 2.35, "demo").await.unwrap().unwrap();
    assert_eq!(info.zone_name, "Europe/Paris");
    assert!(!info.dst);
    assert_eq!(info.utc_offset_label(), "UTC+1");

    assert!(client.timezone(0.0, 0.0, "demo").await.unwrap().is_none());

    let err = client.timezone(48.85, 2.35, "broken").await.unwrap_err();
    assert!(matches!(err, Error::GeoData(_)));
}

#[tokio::test]
async fn test_nearby_sorted_and_truncated() {
    let client = spawn_stub().await;

    let places = client.nearby(0.0, 0.0, 300, 10).await.unwrap();
    let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Near", "Unknown", "Far"]);
    assert!(places.windows(2).all(|w| w[0].distance <= w[1].distance));

    let top = client.nearby(0.0, 0.0, 300, 2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[1].kind, "Place");
}

#[tokio::test]
async fn test_service_down() {
    let client = spawn_stub().await;
    let err = client.nearby(0.0, 0.0, 999, 10).await.unwrap_err();
    assert!(matches!(err, Error::GeoData(_)));
}
