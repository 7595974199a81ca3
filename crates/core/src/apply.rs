// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Actor, EntityChange, NewBooking, NewVehicle, State, TransitionResult};
use fleetdesk_domain::{
    Booking, BookingDetails, BookingId, BookingPatch, BookingStatus, DomainError, Fare, FareInputs,
    Principal, Timestamp, UserRole, Vehicle, VehicleId, VehiclePatch, derive_fare,
    validate_booking_input, validate_location,
};

/// Applies a command to the current state, producing the writes that carry it out.
///
/// Checks run in a fixed order: role, existence, ownership, status, input
/// validation, then cross-entity conflicts. The first failing check decides
/// the error.
///
/// # Arguments
///
/// * `state` - The current fleet and bookings (immutable)
/// * `command` - The command to apply
/// * `actor` - The caller performing this action
/// * `now` - The instant recorded on created or modified bookings
///
/// # Errors
///
/// Returns an error if:
/// - The actor's role does not permit the command
/// - A referenced booking or vehicle does not exist
/// - The actor does not own the booking and is not an admin
/// - The booking is no longer active
/// - An input is blank or negative
/// - The vehicle is unavailable or still has active bookings
pub fn apply(
    state: &State,
    command: Command,
    actor: &Actor,
    now: Timestamp,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    match command {
        Command::CreateBooking {
            vehicle_id,
            details,
            fare_inputs,
        } => {
            require_role(actor, UserRole::User, name)?;
            create_booking(state, actor, vehicle_id, details, fare_inputs, now)
        }
        Command::UpdateBooking { booking_id, patch } => {
            require_role(actor, UserRole::User, name)?;
            update_booking(state, actor, booking_id, &patch, now)
        }
        Command::CancelBooking { booking_id } => {
            require_role(actor, UserRole::User, name)?;
            finish_booking(state, actor, booking_id, BookingStatus::Cancelled, now)
        }
        Command::CompleteBooking { booking_id } => {
            require_role(actor, UserRole::Admin, name)?;
            finish_booking(state, actor, booking_id, BookingStatus::Completed, now)
        }
        Command::AddVehicle {
            vehicle_type,
            current_location,
        } => {
            require_role(actor, UserRole::Admin, name)?;
            validate_location(&current_location)?;
            let summary: String = format!("Added {vehicle_type} at '{current_location}'");
            Ok(TransitionResult {
                changes: vec![EntityChange::InsertVehicle(NewVehicle {
                    vehicle_type,
                    is_available: true,
                    current_location,
                })],
                summary,
            })
        }
        Command::DeleteVehicle { vehicle_id } => {
            require_role(actor, UserRole::Admin, name)?;
            find_vehicle(state, vehicle_id)?;
            let active_bookings: usize = state.active_bookings_for(vehicle_id, None);
            if active_bookings > 0 {
                return Err(CoreError::DomainViolation(
                    DomainError::VehicleHasActiveBookings {
                        vehicle_id,
                        active_bookings,
                    },
                ));
            }
            Ok(TransitionResult {
                changes: vec![EntityChange::DeleteVehicle(vehicle_id)],
                summary: format!("Deleted vehicle {vehicle_id}"),
            })
        }
        Command::UpdateVehicle { vehicle_id, patch } => {
            require_role(actor, UserRole::Admin, name)?;
            update_vehicle(state, vehicle_id, &patch)
        }
        Command::SetVehicleAvailability {
            vehicle_id,
            is_available,
        } => {
            require_role(actor, UserRole::Admin, name)?;
            let mut vehicle: Vehicle = find_vehicle(state, vehicle_id)?.clone();
            vehicle.is_available = is_available;
            Ok(TransitionResult {
                changes: vec![EntityChange::UpdateVehicle(vehicle)],
                summary: format!("Set vehicle {vehicle_id} availability to {is_available}"),
            })
        }
        Command::UpdateVehicleLocation {
            vehicle_id,
            location,
        } => {
            require_role(actor, UserRole::Admin, name)?;
            let mut vehicle: Vehicle = find_vehicle(state, vehicle_id)?.clone();
            validate_location(&location)?;
            let summary: String = format!("Moved vehicle {vehicle_id} to '{location}'");
            vehicle.current_location = location;
            Ok(TransitionResult {
                changes: vec![EntityChange::UpdateVehicle(vehicle)],
                summary,
            })
        }
    }
}

/// Checks that a role change does not remove the last administrator.
///
/// # Arguments
///
/// * `admins` - Every principal currently holding the admin role
/// * `actor` - The caller performing the assignment
/// * `target` - The principal whose role changes
/// * `role` - The role being assigned
///
/// # Errors
///
/// Returns an error if the actor is not an admin, or if `target` is the only
/// admin and `role` is not admin.
pub fn validate_role_assignment(
    admins: &[Principal],
    actor: &Actor,
    target: &Principal,
    role: UserRole,
) -> Result<(), CoreError> {
    require_role(actor, UserRole::Admin, "AssignUserRole")?;
    if role != UserRole::Admin && admins.len() <= 1 && admins.contains(target) {
        return Err(CoreError::DomainViolation(DomainError::LastAdmin(
            target.clone(),
        )));
    }
    Ok(())
}

fn require_role(actor: &Actor, required: UserRole, command: &'static str) -> Result<(), CoreError> {
    if actor.role.satisfies(required) {
        Ok(())
    } else {
        Err(CoreError::Forbidden { command, required })
    }
}

fn find_vehicle(state: &State, id: VehicleId) -> Result<&Vehicle, CoreError> {
    state
        .vehicle(id)
        .ok_or(CoreError::DomainViolation(DomainError::VehicleNotFound(id)))
}

/// Finds a booking the actor may act on.
fn find_accessible_booking<'a>(
    state: &'a State,
    actor: &Actor,
    id: BookingId,
) -> Result<&'a Booking, CoreError> {
    let booking: &Booking = state
        .booking(id)
        .ok_or(CoreError::DomainViolation(DomainError::BookingNotFound(id)))?;
    if !actor.can_access(booking) {
        return Err(CoreError::DomainViolation(DomainError::NotBookingOwner {
            booking_id: id,
            principal: actor.principal.clone(),
        }));
    }
    Ok(booking)
}

/// Marks `vehicle` available again unless another active booking still uses it.
fn release_vehicle(
    state: &State,
    vehicle_id: VehicleId,
    booking_id: BookingId,
) -> Option<EntityChange> {
    let vehicle: &Vehicle = state.vehicle(vehicle_id)?;
    if vehicle.is_available || state.active_bookings_for(vehicle_id, Some(booking_id)) > 0 {
        return None;
    }
    let mut released: Vehicle = vehicle.clone();
    released.is_available = true;
    Some(EntityChange::UpdateVehicle(released))
}

/// Marks `vehicle` unavailable, failing if it is not bookable.
fn claim_vehicle(vehicle: &Vehicle) -> Result<EntityChange, CoreError> {
    if !vehicle.is_available {
        return Err(CoreError::DomainViolation(DomainError::VehicleUnavailable(
            vehicle.id,
        )));
    }
    let mut claimed: Vehicle = vehicle.clone();
    claimed.is_available = false;
    Ok(EntityChange::UpdateVehicle(claimed))
}

fn create_booking(
    state: &State,
    actor: &Actor,
    vehicle_id: VehicleId,
    details: BookingDetails,
    fare_inputs: FareInputs,
    now: Timestamp,
) -> Result<TransitionResult, CoreError> {
    let vehicle: &Vehicle = find_vehicle(state, vehicle_id)?;
    validate_booking_input(&details, &fare_inputs)?;
    let fare: Fare = derive_fare(&fare_inputs)?;
    let claim: EntityChange = claim_vehicle(vehicle)?;

    let booking: NewBooking = NewBooking {
        user: actor.principal.clone(),
        vehicle_id,
        status: BookingStatus::Active,
        details,
        fare_inputs,
        fare,
        created_at: now,
        updated_at: now,
    };

    Ok(TransitionResult {
        summary: format!(
            "Booked vehicle {vehicle_id} for '{}' ({} km, net {})",
            actor.principal, fare.total_km, fare.net_amount
        ),
        changes: vec![EntityChange::InsertBooking(booking), claim],
    })
}

fn update_booking(
    state: &State,
    actor: &Actor,
    booking_id: BookingId,
    patch: &BookingPatch,
    now: Timestamp,
) -> Result<TransitionResult, CoreError> {
    let current: &Booking = find_accessible_booking(state, actor, booking_id)?;
    if !current.status.is_active() {
        return Err(CoreError::DomainViolation(DomainError::BookingNotActive {
            booking_id,
            status: current.status,
        }));
    }

    let replacement: Option<&Vehicle> = match patch.vehicle_id.value() {
        Some(&id) if id != current.vehicle_id => Some(find_vehicle(state, id)?),
        _ => None,
    };

    let mut updated: Booking = current.clone();
    patch.apply_details(&mut updated.details);
    let inputs_changed: bool = patch.apply_fare_inputs(&mut updated.fare_inputs);
    validate_booking_input(&updated.details, &updated.fare_inputs)?;
    if inputs_changed {
        updated.fare = derive_fare(&updated.fare_inputs)?;
    }

    let mut changes: Vec<EntityChange> = Vec::new();
    if let Some(vehicle) = replacement {
        changes.push(claim_vehicle(vehicle)?);
        if let Some(release) = release_vehicle(state, current.vehicle_id, booking_id) {
            changes.push(release);
        }
        updated.vehicle_id = vehicle.id;
    }
    updated.updated_at = now;
    changes.insert(0, EntityChange::UpdateBooking(updated));

    Ok(TransitionResult {
        changes,
        summary: format!("Updated booking {booking_id}"),
    })
}

fn finish_booking(
    state: &State,
    actor: &Actor,
    booking_id: BookingId,
    status: BookingStatus,
    now: Timestamp,
) -> Result<TransitionResult, CoreError> {
    let current: &Booking = find_accessible_booking(state, actor, booking_id)?;
    current.status.validate_transition(booking_id, status)?;

    let mut updated: Booking = current.clone();
    updated.status = status;
    updated.updated_at = now;

    let mut changes: Vec<EntityChange> = vec![EntityChange::UpdateBooking(updated)];
    if let Some(release) = release_vehicle(state, current.vehicle_id, booking_id) {
        changes.push(release);
    }

    Ok(TransitionResult {
        changes,
        summary: format!("Booking {booking_id} is now {status}"),
    })
}

fn update_vehicle(
    state: &State,
    vehicle_id: VehicleId,
    patch: &VehiclePatch,
) -> Result<TransitionResult, CoreError> {
    let mut vehicle: Vehicle = find_vehicle(state, vehicle_id)?.clone();
    patch.vehicle_type.apply_to(&mut vehicle.vehicle_type);
    patch.current_location.apply_to(&mut vehicle.current_location);
    validate_location(&vehicle.current_location)?;
    Ok(TransitionResult {
        changes: vec![EntityChange::UpdateVehicle(vehicle)],
        summary: format!("Updated vehicle {vehicle_id}"),
    })
}
