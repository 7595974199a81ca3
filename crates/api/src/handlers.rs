// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers of the API boundary.
//!
//! Every handler authorizes the caller first. Reads then consult the query
//! cache; commands run the core transition, persist its changes in one
//! transaction and return the cache keys they made stale.

use fleetdesk::{
    Actor, Command, State, TransitionResult, apply, validate_role_assignment,
};
use fleetdesk_domain::{
    Booking, BookingId, BookingPatch, DashboardSummary, DomainError, Principal, Timestamp,
    UserProfile, Vehicle, VehicleId, VehiclePatch, summarize, validate_profile_name,
};
use fleetdesk_persistence::{PersistTransitionResult, Persistence, PersistenceError};
use tracing::{error, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::cache::{Invalidation, QueryCache, QueryKey, invalidations_for};
use crate::capabilities::{compute_booking_capabilities, compute_caller_capabilities};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignRoleRequest, BookingInfo, CallerCapabilities, CommandResponse, CreateBookingRequest,
    CreateBookingResponse, CreateVehicleRequest, CreateVehicleResponse, DashboardInfo,
    IsAdminResponse, ProfileInfo, RoleResponse, SaveProfileRequest, SetAvailabilityRequest,
    UpdateLocationRequest, VehicleInfo,
};

/// The result of a successful command.
///
/// The caller must apply `invalidated` to any cache it keeps outside the
/// one passed to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The query keys this command made stale.
    pub invalidated: Vec<Invalidation>,
}

/// Outcome of running a command through core and persistence.
struct Executed {
    result: TransitionResult,
    persisted: PersistTransitionResult,
    invalidated: Vec<Invalidation>,
}

/// Runs `command` against the stored state and persists its changes.
///
/// Nothing is written and nothing is invalidated if any step fails.
fn execute(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    command: Command,
    now: Timestamp,
) -> Result<Executed, ApiError> {
    let name: &'static str = command.name();
    let actor: Actor = authenticated_actor.to_core_actor(name)?;
    let state: State = persistence.load_state().map_err(store_failure)?;

    let previous_vehicle: Option<VehicleId> = match &command {
        Command::UpdateBooking { booking_id, .. }
        | Command::CancelBooking { booking_id }
        | Command::CompleteBooking { booking_id } => {
            state.booking(*booking_id).map(|b| b.vehicle_id)
        }
        _ => None,
    };

    let result: TransitionResult =
        apply(&state, command.clone(), &actor, now).map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&result)
        .map_err(store_failure)?;

    let invalidated: Vec<Invalidation> =
        invalidations_for(&command, previous_vehicle, &result, &persisted);
    cache.invalidate(&invalidated);

    info!(
        command = name,
        principal = %actor.principal,
        summary = %result.summary,
        "Command applied"
    );

    Ok(Executed {
        result,
        persisted,
        invalidated,
    })
}

fn store_failure(err: PersistenceError) -> ApiError {
    error!(error = %err, "Store operation failed");
    ApiError::from(err)
}

fn missing_id(what: &str) -> ApiError {
    ApiError::Internal {
        message: format!("Store did not assign an id to the new {what}"),
    }
}

fn booking_view(actor: &AuthenticatedActor, booking: Booking) -> BookingInfo {
    let capabilities = compute_booking_capabilities(actor, &booking);
    BookingInfo::new(booking, capabilities)
}

// ============================================================================
// Booking commands
// ============================================================================

/// Creates a booking owned by the caller.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is anonymous or not at least a user
/// - The vehicle does not exist or is not available
/// - A text field is blank or a numeric input is negative
pub fn create_booking(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    request: CreateBookingRequest,
    now: Timestamp,
) -> Result<ApiResult<CreateBookingResponse>, ApiError> {
    AuthorizationService::authorize_create_booking(authenticated_actor)?;

    let (vehicle_id, details, fare_inputs) = request.into_parts();
    let command: Command = Command::CreateBooking {
        vehicle_id,
        details,
        fare_inputs,
    };
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;
    let booking_id: BookingId = executed
        .persisted
        .booking_id
        .ok_or_else(|| missing_id("booking"))?;

    Ok(ApiResult {
        response: CreateBookingResponse {
            booking_id,
            message: format!("Created booking {booking_id} for vehicle {vehicle_id}"),
        },
        invalidated: executed.invalidated,
    })
}

/// Applies a partial update to an active booking.
///
/// Absent and null fields leave the stored value unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not at least a user, or neither owns the booking nor is an admin
/// - The booking or the replacement vehicle does not exist
/// - The booking is not active
/// - The replacement vehicle is not available
/// - A patched field is invalid
pub fn update_booking(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    booking_id: BookingId,
    patch: BookingPatch,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_update_booking(authenticated_actor)?;

    let command: Command = Command::UpdateBooking { booking_id, patch };
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;

    Ok(ApiResult {
        response: CommandResponse {
            message: executed.result.summary,
        },
        invalidated: executed.invalidated,
    })
}

/// Cancels an active booking.
///
/// # Errors
///
/// Returns an error if the caller may not cancel the booking, it does not
/// exist, or it is no longer active.
pub fn cancel_booking(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    booking_id: BookingId,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_cancel_booking(authenticated_actor)?;

    let command: Command = Command::CancelBooking { booking_id };
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;

    Ok(ApiResult {
        response: CommandResponse {
            message: executed.result.summary,
        },
        invalidated: executed.invalidated,
    })
}

/// Completes an active booking. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the booking does not
/// exist, or it is no longer active.
pub fn complete_booking(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    booking_id: BookingId,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_complete_booking(authenticated_actor)?;

    let command: Command = Command::CompleteBooking { booking_id };
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;

    Ok(ApiResult {
        response: CommandResponse {
            message: executed.result.summary,
        },
        invalidated: executed.invalidated,
    })
}

// ============================================================================
// Fleet commands
// ============================================================================

/// Adds an available vehicle to the fleet. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the location is blank.
pub fn add_vehicle(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    request: CreateVehicleRequest,
    now: Timestamp,
) -> Result<ApiResult<CreateVehicleResponse>, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor, "add_vehicle")?;

    let command: Command = Command::AddVehicle {
        vehicle_type: request.vehicle_type,
        current_location: request.current_location,
    };
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;
    let vehicle_id: VehicleId = executed
        .persisted
        .vehicle_id
        .ok_or_else(|| missing_id("vehicle"))?;

    Ok(ApiResult {
        response: CreateVehicleResponse {
            vehicle_id,
            message: format!("Added {} as vehicle {vehicle_id}", request.vehicle_type),
        },
        invalidated: executed.invalidated,
    })
}

/// Removes a vehicle from the fleet. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the vehicle does not
/// exist, or an active booking still uses it.
pub fn delete_vehicle(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    vehicle_id: VehicleId,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor, "delete_vehicle")?;
    run_fleet_command(
        persistence,
        cache,
        authenticated_actor,
        Command::DeleteVehicle { vehicle_id },
        now,
    )
}

/// Applies a partial update to a vehicle. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the vehicle does not
/// exist, or the new location is blank.
pub fn update_vehicle(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    vehicle_id: VehicleId,
    patch: VehiclePatch,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor, "update_vehicle")?;
    run_fleet_command(
        persistence,
        cache,
        authenticated_actor,
        Command::UpdateVehicle { vehicle_id, patch },
        now,
    )
}

/// Sets whether a vehicle is bookable. Admin only; bookings are not touched.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the vehicle does not exist.
pub fn set_vehicle_availability(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    vehicle_id: VehicleId,
    request: SetAvailabilityRequest,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor, "set_vehicle_availability")?;
    run_fleet_command(
        persistence,
        cache,
        authenticated_actor,
        Command::SetVehicleAvailability {
            vehicle_id,
            is_available: request.is_available,
        },
        now,
    )
}

/// Moves a vehicle. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the vehicle does not
/// exist, or the location is blank.
pub fn update_vehicle_location(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    vehicle_id: VehicleId,
    request: UpdateLocationRequest,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor, "update_vehicle_location")?;
    run_fleet_command(
        persistence,
        cache,
        authenticated_actor,
        Command::UpdateVehicleLocation {
            vehicle_id,
            location: request.location,
        },
        now,
    )
}

fn run_fleet_command(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    command: Command,
    now: Timestamp,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    let executed: Executed = execute(persistence, cache, authenticated_actor, command, now)?;
    Ok(ApiResult {
        response: CommandResponse {
            message: executed.result.summary,
        },
        invalidated: executed.invalidated,
    })
}

// ============================================================================
// Roles and profiles
// ============================================================================

/// Assigns a role to a principal. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the change would leave
/// the system without an admin.
pub fn assign_caller_user_role(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    target: &Principal,
    request: AssignRoleRequest,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_assign_role(authenticated_actor)?;
    let actor: Actor = authenticated_actor.to_core_actor("assign_user_role")?;

    let admins: Vec<Principal> = persistence.list_admins().map_err(store_failure)?;
    validate_role_assignment(&admins, &actor, target, request.role)
        .map_err(translate_core_error)?;
    persistence
        .set_role(target, request.role)
        .map_err(store_failure)?;

    let invalidated: Vec<Invalidation> = vec![QueryKey::CallerRole(target.clone()).into()];
    cache.invalidate(&invalidated);

    info!(
        principal = %actor.principal,
        target = %target,
        role = %request.role,
        "Assigned role"
    );

    Ok(ApiResult {
        response: CommandResponse {
            message: format!("Assigned role {} to {target}", request.role),
        },
        invalidated,
    })
}

/// Saves the caller's display profile.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user or the name is
/// blank or too long.
pub fn save_caller_user_profile(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    request: &SaveProfileRequest,
) -> Result<ApiResult<CommandResponse>, ApiError> {
    AuthorizationService::authorize_save_profile(authenticated_actor)?;
    let principal: Principal = authenticated_actor
        .require_principal("save_profile")?
        .clone();

    validate_profile_name(&request.name).map_err(translate_domain_error)?;
    let profile: UserProfile = UserProfile {
        principal: principal.clone(),
        name: request.name.trim().to_string(),
        job_role: request.job_role.trim().to_string(),
    };
    persistence.save_profile(&profile).map_err(store_failure)?;

    let invalidated: Vec<Invalidation> = vec![QueryKey::Profile(principal.clone()).into()];
    cache.invalidate(&invalidated);

    info!(principal = %principal, "Saved profile");

    Ok(ApiResult {
        response: CommandResponse {
            message: format!("Saved profile for {principal}"),
        },
        invalidated,
    })
}

/// Returns the caller's resolved role. Open to anyone.
#[must_use]
pub const fn get_caller_user_role(authenticated_actor: &AuthenticatedActor) -> RoleResponse {
    RoleResponse {
        role: authenticated_actor.role,
    }
}

/// Returns whether the caller is an administrator. Open to anyone.
#[must_use]
pub fn is_caller_admin(authenticated_actor: &AuthenticatedActor) -> IsAdminResponse {
    IsAdminResponse {
        is_admin: authenticated_actor.is_admin(),
    }
}

/// Returns the caller's advisory capabilities. Open to anyone.
#[must_use]
pub fn get_caller_capabilities(authenticated_actor: &AuthenticatedActor) -> CallerCapabilities {
    compute_caller_capabilities(authenticated_actor)
}

/// Returns the caller's profile, if one was saved. Open to anyone.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub fn get_caller_user_profile(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Option<ProfileInfo>, ApiError> {
    match &authenticated_actor.principal {
        Some(principal) => load_profile(persistence, cache, principal),
        None => Ok(None),
    }
}

/// Returns the profile of `target`.
///
/// # Errors
///
/// Returns an error if the caller is neither `target` nor an admin, or the
/// lookup fails.
pub fn get_user_profile(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    target: &Principal,
) -> Result<Option<ProfileInfo>, ApiError> {
    AuthorizationService::authorize_view_profile(authenticated_actor, target)?;
    load_profile(persistence, cache, target)
}

fn load_profile(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    principal: &Principal,
) -> Result<Option<ProfileInfo>, ApiError> {
    let key: QueryKey = QueryKey::Profile(principal.clone());
    let profile: Option<UserProfile> = if let Some(cached) = cache.get(&key) {
        cached
    } else {
        let loaded: Option<UserProfile> =
            persistence.get_profile(principal).map_err(store_failure)?;
        cache.insert(key, loaded.clone());
        loaded
    };
    Ok(profile.map(ProfileInfo::from))
}

// ============================================================================
// Booking queries
// ============================================================================

/// Lists the bookings the caller created.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user or the lookup fails.
pub fn get_user_bookings(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<BookingInfo>, ApiError> {
    AuthorizationService::authorize_view_own_bookings(authenticated_actor)?;
    let principal: &Principal = authenticated_actor.require_principal("view_bookings")?;

    let key: QueryKey = QueryKey::UserBookings(principal.clone());
    let bookings: Vec<Booking> = if let Some(cached) = cache.get(&key) {
        cached
    } else {
        let loaded: Vec<Booking> = persistence
            .list_bookings_for_principal(principal)
            .map_err(store_failure)?;
        cache.insert(key, loaded.clone());
        loaded
    };

    Ok(bookings
        .into_iter()
        .map(|b| booking_view(authenticated_actor, b))
        .collect())
}

/// Lists every booking. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the lookup fails.
pub fn get_all_bookings(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<BookingInfo>, ApiError> {
    AuthorizationService::authorize_view_all_bookings(authenticated_actor)?;

    let bookings: Vec<Booking> = if let Some(cached) = cache.get(&QueryKey::AllBookings) {
        cached
    } else {
        let loaded: Vec<Booking> = persistence.list_bookings().map_err(store_failure)?;
        cache.insert(QueryKey::AllBookings, loaded.clone());
        loaded
    };

    Ok(bookings
        .into_iter()
        .map(|b| booking_view(authenticated_actor, b))
        .collect())
}

/// Returns one booking, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user, the booking
/// belongs to someone else and the caller is not an admin, or the lookup fails.
pub fn get_booking(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    booking_id: BookingId,
) -> Result<Option<BookingInfo>, ApiError> {
    AuthorizationService::authorize_view_own_bookings(authenticated_actor)?;
    let principal: &Principal = authenticated_actor.require_principal("view_bookings")?;

    let key: QueryKey = QueryKey::Booking(booking_id);
    let booking: Option<Booking> = if let Some(cached) = cache.get(&key) {
        Some(cached)
    } else {
        let loaded: Option<Booking> = persistence.get_booking(booking_id).map_err(store_failure)?;
        if let Some(booking) = &loaded {
            cache.insert(key, booking.clone());
        }
        loaded
    };

    let Some(booking) = booking else {
        return Ok(None);
    };
    if !authenticated_actor.is_admin() && !booking.is_owned_by(principal) {
        return Err(translate_domain_error(DomainError::NotBookingOwner {
            booking_id,
            principal: principal.clone(),
        }));
    }
    Ok(Some(booking_view(authenticated_actor, booking)))
}

// ============================================================================
// Fleet queries
// ============================================================================

/// Lists vehicles that can currently be booked.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user or the lookup fails.
pub fn get_available_vehicles(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<VehicleInfo>, ApiError> {
    AuthorizationService::authorize_view_vehicles(authenticated_actor)?;

    let vehicles: Vec<Vehicle> = if let Some(cached) = cache.get(&QueryKey::AvailableVehicles) {
        cached
    } else {
        let loaded: Vec<Vehicle> = persistence
            .list_available_vehicles()
            .map_err(store_failure)?;
        cache.insert(QueryKey::AvailableVehicles, loaded.clone());
        loaded
    };

    Ok(vehicles.into_iter().map(VehicleInfo::from).collect())
}

/// Lists every vehicle.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user or the lookup fails.
pub fn get_all_vehicles(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<VehicleInfo>, ApiError> {
    AuthorizationService::authorize_view_vehicles(authenticated_actor)?;

    let vehicles: Vec<Vehicle> = if let Some(cached) = cache.get(&QueryKey::AllVehicles) {
        cached
    } else {
        let loaded: Vec<Vehicle> = persistence.list_vehicles().map_err(store_failure)?;
        cache.insert(QueryKey::AllVehicles, loaded.clone());
        loaded
    };

    Ok(vehicles.into_iter().map(VehicleInfo::from).collect())
}

/// Returns one vehicle, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the caller is not at least a user or the lookup fails.
pub fn get_vehicle(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
    vehicle_id: VehicleId,
) -> Result<Option<VehicleInfo>, ApiError> {
    AuthorizationService::authorize_view_vehicles(authenticated_actor)?;

    let key: QueryKey = QueryKey::Vehicle(vehicle_id);
    if let Some(cached) = cache.get::<Vehicle>(&key) {
        return Ok(Some(cached.into()));
    }
    let loaded: Option<Vehicle> = persistence.get_vehicle(vehicle_id).map_err(store_failure)?;
    if let Some(vehicle) = &loaded {
        cache.insert(key, vehicle.clone());
    }
    Ok(loaded.map(VehicleInfo::from))
}

// ============================================================================
// Dashboard
// ============================================================================

/// Returns booking and fleet figures. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the lookup fails.
pub fn get_dashboard_summary(
    persistence: &mut Persistence,
    cache: &mut QueryCache,
    authenticated_actor: &AuthenticatedActor,
) -> Result<DashboardInfo, ApiError> {
    AuthorizationService::authorize_view_dashboard(authenticated_actor)?;

    if let Some(cached) = cache.get::<DashboardSummary>(&QueryKey::DashboardSummary) {
        return Ok(cached.into());
    }
    let bookings: Vec<Booking> = persistence.list_bookings().map_err(store_failure)?;
    let vehicles: Vec<Vehicle> = persistence.list_vehicles().map_err(store_failure)?;
    let summary: DashboardSummary = summarize(&bookings, &vehicles);
    cache.insert(QueryKey::DashboardSummary, summary);
    Ok(summary.into())
}
