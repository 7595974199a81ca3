// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use fleetdesk_api::{Desk, RoleResolver};
use fleetdesk_domain::{Principal, UserRole};
use fleetdesk_persistence::Persistence;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{AppState, build_router};
use crate::live::LiveEvent;

const ADMIN: &str = "admin-1";
const STAFF: &str = "staff-1";

/// Helper to create test app state with in-memory persistence and one admin.
fn create_test_app_state() -> AppState {
    let persistence = Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let mut desk = Desk::new(persistence, RoleResolver::new(UserRole::User));
    desk.seed_admins(&[Principal::new(ADMIN).unwrap()]).unwrap();
    AppState::new(desk)
}

/// Sends one request and returns the status and decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    principal: Option<&str>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(principal) = principal {
        builder = builder.header("Authorization", format!("Bearer {principal}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn booking_body(vehicle_id: i64) -> Value {
    json!({
        "vehicleId": vehicle_id,
        "dateTime": 1_767_225_600_000_000_000_i64,
        "pickupLocation": "Depot A",
        "destination": "Airport",
        "vehicleNo": "KA-01-1234",
        "customerName": "R. Iyer",
        "customerNo": "555-0100",
        "startingKm": 100,
        "endingKm": 150,
        "ratePerKm": 10,
        "tollTax": 20,
        "dieselOrGasByCustomer": 5
    })
}

async fn add_cab(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/vehicles",
        Some(ADMIN),
        Some(json!({"vehicleType": "cab", "currentLocation": "Depot A"})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{body}");
    body["vehicleId"].as_i64().unwrap()
}

async fn book(app: &Router, vehicle_id: i64) -> i64 {
    let (status, body) = send(app, "POST", "/bookings", Some(STAFF), Some(booking_body(vehicle_id))).await;
    assert_eq!(status, HttpStatusCode::OK, "{body}");
    body["bookingId"].as_i64().unwrap()
}

#[tokio::test]
async fn test_guest_must_authenticate_for_fleet_reads() {
    let app = build_router(create_test_app_state());
    let (status, body) = send(&app, "GET", "/vehicles", None, None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], Value::Bool(true));
}

#[tokio::test]
async fn test_guest_can_read_own_role() {
    let app = build_router(create_test_app_state());
    let (status, body) = send(&app, "GET", "/me/role", None, None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body, json!({"role": "guest"}));

    let (_, body) = send(&app, "GET", "/me/is_admin", Some(ADMIN), None).await;
    assert_eq!(body, json!({"isAdmin": true}));
}

#[tokio::test]
async fn test_malformed_authorization_header_is_rejected() {
    let app = build_router(create_test_app_state());
    let request = Request::builder()
        .method("GET")
        .uri("/me/role")
        .header("Authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_cannot_list_all_bookings() {
    let app = build_router(create_test_app_state());
    let (status, _) = send(&app, "GET", "/bookings", Some(STAFF), None).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    let (status, body) = send(&app, "GET", "/bookings", Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_book_and_cancel_over_http() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    assert_eq!(vehicle_id, 1);

    let booking_id = book(&app, vehicle_id).await;
    let (_, available) = send(&app, "GET", "/vehicles/available", Some(STAFF), None).await;
    assert_eq!(available, json!([]));

    let (status, booking) = send(&app, "GET", &format!("/bookings/{booking_id}"), Some(STAFF), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(booking["totalKm"], json!(50));
    assert_eq!(booking["totalAmount"], json!(500));
    assert_eq!(booking["netAmount"], json!(475));
    assert_eq!(booking["status"], json!("active"));
    assert_eq!(booking["capabilities"]["canCancel"], json!(true));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/bookings/{booking_id}/cancel"),
        Some(STAFF),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (_, booking) = send(&app, "GET", &format!("/bookings/{booking_id}"), Some(STAFF), None).await;
    assert_eq!(booking["status"], json!("cancelled"));
    let (_, available) = send(&app, "GET", "/vehicles/available", Some(STAFF), None).await;
    assert_eq!(available[0]["id"], json!(vehicle_id));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/bookings/{booking_id}/cancel"),
        Some(STAFF),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_vehicle_with_active_booking_conflicts() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    let booking_id = book(&app, vehicle_id).await;

    let uri = format!("/vehicles/{vehicle_id}");
    let (status, _) = send(&app, "DELETE", &uri, Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/bookings/{booking_id}/complete"),
        Some(STAFF),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/bookings/{booking_id}/complete"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, _) = send(&app, "DELETE", &uri, Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    let (status, _) = send(&app, "GET", &uri, Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_null_leaves_field_unchanged() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    let booking_id = book(&app, vehicle_id).await;
    let uri = format!("/bookings/{booking_id}");

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(STAFF),
        Some(json!({"destination": null, "tollTax": 0})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (_, booking) = send(&app, "GET", &uri, Some(STAFF), None).await;
    assert_eq!(booking["destination"], json!("Airport"));
    assert_eq!(booking["tollTax"], json!(0));
    assert_eq!(booking["netAmount"], json!(495));
}

#[tokio::test]
async fn test_invalid_input_is_bad_request() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    let mut body = booking_body(vehicle_id);
    body["ratePerKm"] = json!(-1);

    let (status, body) = send(&app, "POST", "/bookings", Some(STAFF), Some(body)).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("rate_per_km"));
}

#[tokio::test]
async fn test_unknown_vehicle_type_is_bad_request() {
    let app = build_router(create_test_app_state());
    let (status, body) = send(
        &app,
        "POST",
        "/vehicles",
        Some(ADMIN),
        Some(json!({"vehicleType": "boat", "currentLocation": "Depot A"})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));
    assert!(body["message"].as_str().unwrap().contains("boat"));
}

#[tokio::test]
async fn test_out_of_range_amount_is_bad_request() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    let mut request = booking_body(vehicle_id);
    request["ratePerKm"] = json!(u64::MAX);

    let (status, body) = send(&app, "POST", "/bookings", Some(STAFF), Some(request)).await;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));

    let (_, available) = send(&app, "GET", "/vehicles/available", Some(STAFF), None).await;
    assert_eq!(available[0]["id"], json!(vehicle_id));
}

#[tokio::test]
async fn test_malformed_patch_body_is_bad_request() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/vehicles/{vehicle_id}"))
        .header("Authorization", format!("Bearer {ADMIN}"))
        .header("content-type", "application/json")
        .body(Body::from("{\"currentLocation\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_booking_is_not_found() {
    let app = build_router(create_test_app_state());
    let (status, _) = send(&app, "GET", "/bookings/41", Some(STAFF), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", "/bookings/41/cancel", Some(STAFF), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted() {
    let app = build_router(create_test_app_state());
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{ADMIN}/role"),
        Some(ADMIN),
        Some(json!({"role": "user"})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CONFLICT, "{body}");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{STAFF}/role"),
        Some(ADMIN),
        Some(json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let (_, caps) = send(&app, "GET", "/me/capabilities", Some(STAFF), None).await;
    assert_eq!(caps["canManageFleet"], json!(true));
}

#[tokio::test]
async fn test_profile_round_trip() {
    let app = build_router(create_test_app_state());
    let (_, body) = send(&app, "GET", "/me/profile", Some(STAFF), None).await;
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &app,
        "PUT",
        "/me/profile",
        Some(STAFF),
        Some(json!({"name": "Asha", "jobRole": "Dispatcher"})),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (_, body) = send(&app, "GET", "/me/profile", Some(STAFF), None).await;
    assert_eq!(body["name"], json!("Asha"));

    let (status, _) = send(&app, "GET", &format!("/users/{STAFF}/profile"), Some("staff-2"), None).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    let (status, body) = send(&app, "GET", &format!("/users/{STAFF}/profile"), Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["jobRole"], json!("Dispatcher"));
}

#[tokio::test]
async fn test_dashboard_requires_admin() {
    let app = build_router(create_test_app_state());
    let vehicle_id = add_cab(&app).await;
    book(&app, vehicle_id).await;

    let (status, _) = send(&app, "GET", "/dashboard", Some(STAFF), None).await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);
    let (status, body) = send(&app, "GET", "/dashboard", Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["activeBookings"], json!(1));
    assert_eq!(body["availableVehicles"], json!(0));
}

#[tokio::test]
async fn test_successful_command_is_broadcast() {
    let app_state = create_test_app_state();
    let mut rx = app_state.live.subscribe();
    let app = build_router(app_state);

    add_cab(&app).await;
    match rx.try_recv() {
        Ok(LiveEvent::Invalidated { action, keys }) => {
            assert_eq!(action, "add_vehicle");
            assert!(!keys.is_empty());
        }
        other => panic!("Expected Invalidated, got {other:?}"),
    }

    let (status, _) = send(&app, "DELETE", "/vehicles/99", Some(ADMIN), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
    assert!(rx.try_recv().is_err());
}
