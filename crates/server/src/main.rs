// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::{Parser, ValueEnum};
use fleetdesk_api::{
    ApiError, ApiResult, AssignRoleRequest, BookingInfo, CallerCapabilities, CommandResponse,
    CreateBookingRequest, CreateBookingResponse, CreateVehicleRequest, CreateVehicleResponse,
    DashboardInfo, Desk, IsAdminResponse, ProfileInfo, RoleResolver, RoleResponse,
    SaveProfileRequest, SetAvailabilityRequest, UpdateLocationRequest, VehicleInfo,
    get_caller_capabilities, get_caller_user_role, is_caller_admin, translate_domain_error,
};
use fleetdesk_domain::{BookingId, BookingPatch, Principal, UserRole, VehicleId, VehiclePatch};
use fleetdesk_persistence::Persistence;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEventBroadcaster, live_events_handler};
use crate::session::{Caller, HttpJson};

/// Fleetdesk Server - HTTP server for vehicle bookings and fleet management
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "FLEETDESK_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "FLEETDESK_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "FLEETDESK_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Principal to grant the admin role at startup (repeatable)
    #[arg(long = "admin-principal", env = "FLEETDESK_ADMIN_PRINCIPALS", value_delimiter = ',')]
    admin_principals: Vec<String>,

    /// Role of authenticated principals without a stored role assignment
    #[arg(long, env = "FLEETDESK_DEFAULT_ROLE", value_enum, default_value_t = DefaultRole::User)]
    default_role: DefaultRole,
}

/// Roles that may be granted to principals without an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DefaultRole {
    User,
    Guest,
}

impl From<DefaultRole> for UserRole {
    fn from(role: DefaultRole) -> Self {
        match role {
            DefaultRole::User => Self::User,
            DefaultRole::Guest => Self::Guest,
        }
    }
}

/// Application state shared across handlers.
///
/// Commands are serialized through the single desk lock.
#[derive(Clone)]
struct AppState {
    /// The booking and fleet façade.
    desk: Arc<Mutex<Desk>>,
    /// Subscribers to cache invalidations.
    live: Arc<LiveEventBroadcaster>,
}

impl AppState {
    fn new(desk: Desk) -> Self {
        Self {
            desk: Arc::new(Mutex::new(desk)),
            live: Arc::new(LiveEventBroadcaster::new()),
        }
    }

    /// Publishes the invalidations of a successful command and returns its response.
    fn publish<T>(&self, action: &str, result: ApiResult<T>) -> Json<T> {
        self.live.invalidated(action, result.invalidated);
        Json(result.response)
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationRequired { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn parse_principal(raw: &str) -> Result<Principal, HttpError> {
    Principal::new(raw).map_err(|e| HttpError::from(translate_domain_error(e)))
}

// ============================================================================
// Vehicles
// ============================================================================

async fn handle_list_vehicles(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<Vec<VehicleInfo>>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_all_vehicles(&actor)?))
}

async fn handle_list_available_vehicles(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<Vec<VehicleInfo>>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_available_vehicles(&actor)?))
}

async fn handle_get_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    desk.get_vehicle(&actor, VehicleId::new(vehicle_id))?
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("Vehicle {vehicle_id} not found")))
}

async fn handle_add_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    HttpJson(request): HttpJson<CreateVehicleRequest>,
) -> Result<Json<CreateVehicleResponse>, HttpError> {
    let result = app_state.desk.lock().await.add_vehicle(&actor, request)?;
    Ok(app_state.publish("add_vehicle", result))
}

async fn handle_update_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(vehicle_id): Path<i64>,
    HttpJson(patch): HttpJson<VehiclePatch>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .update_vehicle(&actor, VehicleId::new(vehicle_id), patch)?;
    Ok(app_state.publish("update_vehicle", result))
}

async fn handle_delete_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .delete_vehicle(&actor, VehicleId::new(vehicle_id))?;
    Ok(app_state.publish("delete_vehicle", result))
}

async fn handle_set_vehicle_availability(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(vehicle_id): Path<i64>,
    HttpJson(request): HttpJson<SetAvailabilityRequest>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state.desk.lock().await.set_vehicle_availability(
        &actor,
        VehicleId::new(vehicle_id),
        request,
    )?;
    Ok(app_state.publish("set_vehicle_availability", result))
}

async fn handle_update_vehicle_location(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(vehicle_id): Path<i64>,
    HttpJson(request): HttpJson<UpdateLocationRequest>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state.desk.lock().await.update_vehicle_location(
        &actor,
        VehicleId::new(vehicle_id),
        request,
    )?;
    Ok(app_state.publish("update_vehicle_location", result))
}

// ============================================================================
// Bookings
// ============================================================================

async fn handle_list_all_bookings(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<Vec<BookingInfo>>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_all_bookings(&actor)?))
}

async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<Vec<BookingInfo>>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_user_bookings(&actor)?))
}

async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingInfo>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    desk.get_booking(&actor, BookingId::new(booking_id))?
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("Booking {booking_id} not found")))
}

async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    HttpJson(request): HttpJson<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, HttpError> {
    let result = app_state.desk.lock().await.create_booking(&actor, request)?;
    Ok(app_state.publish("create_booking", result))
}

async fn handle_update_booking(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(booking_id): Path<i64>,
    HttpJson(patch): HttpJson<BookingPatch>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .update_booking(&actor, BookingId::new(booking_id), patch)?;
    Ok(app_state.publish("update_booking", result))
}

async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(booking_id): Path<i64>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .cancel_booking(&actor, BookingId::new(booking_id))?;
    Ok(app_state.publish("cancel_booking", result))
}

async fn handle_complete_booking(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(booking_id): Path<i64>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .complete_booking(&actor, BookingId::new(booking_id))?;
    Ok(app_state.publish("complete_booking", result))
}

// ============================================================================
// Caller, profiles and roles
// ============================================================================

#[allow(clippy::unused_async)]
async fn handle_get_caller_role(Caller(actor): Caller) -> Json<RoleResponse> {
    Json(get_caller_user_role(&actor))
}

#[allow(clippy::unused_async)]
async fn handle_is_caller_admin(Caller(actor): Caller) -> Json<IsAdminResponse> {
    Json(is_caller_admin(&actor))
}

#[allow(clippy::unused_async)]
async fn handle_get_caller_capabilities(Caller(actor): Caller) -> Json<CallerCapabilities> {
    Json(get_caller_capabilities(&actor))
}

async fn handle_get_caller_profile(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<Option<ProfileInfo>>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_caller_user_profile(&actor)?))
}

async fn handle_save_caller_profile(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    HttpJson(request): HttpJson<SaveProfileRequest>,
) -> Result<Json<CommandResponse>, HttpError> {
    let result = app_state
        .desk
        .lock()
        .await
        .save_caller_user_profile(&actor, &request)?;
    Ok(app_state.publish("save_profile", result))
}

async fn handle_get_user_profile(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(principal): Path<String>,
) -> Result<Json<Option<ProfileInfo>>, HttpError> {
    let target: Principal = parse_principal(&principal)?;
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_user_profile(&actor, &target)?))
}

async fn handle_assign_role(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
    Path(principal): Path<String>,
    HttpJson(request): HttpJson<AssignRoleRequest>,
) -> Result<Json<CommandResponse>, HttpError> {
    let target: Principal = parse_principal(&principal)?;
    let result = app_state
        .desk
        .lock()
        .await
        .assign_caller_user_role(&actor, &target, request)?;
    Ok(app_state.publish("assign_user_role", result))
}

async fn handle_get_dashboard(
    AxumState(app_state): AxumState<AppState>,
    Caller(actor): Caller,
) -> Result<Json<DashboardInfo>, HttpError> {
    let mut desk = app_state.desk.lock().await;
    Ok(Json(desk.get_dashboard_summary(&actor)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/vehicles", get(handle_list_vehicles).post(handle_add_vehicle))
        .route("/vehicles/available", get(handle_list_available_vehicles))
        .route(
            "/vehicles/{id}",
            get(handle_get_vehicle)
                .patch(handle_update_vehicle)
                .delete(handle_delete_vehicle),
        )
        .route(
            "/vehicles/{id}/availability",
            put(handle_set_vehicle_availability),
        )
        .route("/vehicles/{id}/location", put(handle_update_vehicle_location))
        .route(
            "/bookings",
            get(handle_list_all_bookings).post(handle_create_booking),
        )
        .route("/bookings/mine", get(handle_list_my_bookings))
        .route(
            "/bookings/{id}",
            get(handle_get_booking).patch(handle_update_booking),
        )
        .route("/bookings/{id}/cancel", post(handle_cancel_booking))
        .route("/bookings/{id}/complete", post(handle_complete_booking))
        .route("/me/role", get(handle_get_caller_role))
        .route("/me/is_admin", get(handle_is_caller_admin))
        .route("/me/capabilities", get(handle_get_caller_capabilities))
        .route(
            "/me/profile",
            get(handle_get_caller_profile).put(handle_save_caller_profile),
        )
        .route("/users/{principal}/profile", get(handle_get_user_profile))
        .route("/users/{principal}/role", put(handle_assign_role))
        .route("/dashboard", get(handle_get_dashboard))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fleetdesk Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let default_role: UserRole = args.default_role.into();
    let mut desk: Desk = Desk::new(persistence, RoleResolver::new(default_role));

    let admins: Vec<Principal> = args
        .admin_principals
        .iter()
        .map(|raw| Principal::new(raw))
        .collect::<Result<_, _>>()?;
    desk.seed_admins(&admins)?;
    info!(
        admins = admins.len(),
        default_role = %default_role,
        "Role configuration loaded"
    );

    let app: Router = build_router(AppState::new(desk));

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
