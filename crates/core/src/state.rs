// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{
    Booking, BookingDetails, BookingId, BookingStatus, Fare, FareInputs, Principal, Timestamp,
    UserRole, Vehicle, VehicleId, VehicleType,
};

/// The authenticated caller a command runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The caller's identity.
    pub principal: Principal,
    /// The caller's resolved role.
    pub role: UserRole,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(principal: Principal, role: UserRole) -> Self {
        Self { principal, role }
    }

    /// Returns true if the actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns true if the actor may act on `booking`: it owns it or is an admin.
    #[must_use]
    pub fn can_access(&self, booking: &Booking) -> bool {
        self.is_admin() || booking.is_owned_by(&self.principal)
    }
}

/// The fleet and booking records a command is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// All vehicles.
    pub vehicles: Vec<Vehicle>,
    /// All bookings, including completed and cancelled ones.
    pub bookings: Vec<Booking>,
}

impl State {
    /// Creates a state from stored records.
    #[must_use]
    pub const fn new(vehicles: Vec<Vehicle>, bookings: Vec<Booking>) -> Self {
        Self { vehicles, bookings }
    }

    /// Looks up a vehicle by id.
    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Looks up a booking by id.
    #[must_use]
    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Counts active bookings that use `vehicle_id`, ignoring `except`.
    #[must_use]
    pub fn active_bookings_for(&self, vehicle_id: VehicleId, except: Option<BookingId>) -> usize {
        self.bookings
            .iter()
            .filter(|b| b.vehicle_id == vehicle_id && b.status.is_active())
            .filter(|b| Some(b.id) != except)
            .count()
    }
}

/// A vehicle that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub vehicle_type: VehicleType,
    pub is_available: bool,
    pub current_location: String,
}

/// A booking that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user: Principal,
    pub vehicle_id: VehicleId,
    pub status: BookingStatus,
    pub details: BookingDetails,
    pub fare_inputs: FareInputs,
    pub fare: Fare,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewBooking {
    /// Attaches the id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: BookingId) -> Booking {
        Booking {
            id,
            user: self.user,
            vehicle_id: self.vehicle_id,
            status: self.status,
            details: self.details,
            fare_inputs: self.fare_inputs,
            fare: self.fare,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl NewVehicle {
    /// Attaches the id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: VehicleId) -> Vehicle {
        Vehicle {
            id,
            vehicle_type: self.vehicle_type,
            is_available: self.is_available,
            current_location: self.current_location,
        }
    }
}

/// A single record write produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityChange {
    /// Insert a vehicle; the store assigns its id.
    InsertVehicle(NewVehicle),
    /// Overwrite a stored vehicle.
    UpdateVehicle(Vehicle),
    /// Remove a vehicle.
    DeleteVehicle(VehicleId),
    /// Insert a booking; the store assigns its id.
    InsertBooking(NewBooking),
    /// Overwrite a stored booking.
    UpdateBooking(Booking),
}

/// The result of a successful state transition.
///
/// Transitions are atomic: the store applies every change or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The writes to apply, in order.
    pub changes: Vec<EntityChange>,
    /// Human-readable summary of what happened.
    pub summary: String,
}

impl TransitionResult {
    /// Returns the ids of every vehicle the transition touches.
    #[must_use]
    pub fn touched_vehicles(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = Vec::new();
        for change in &self.changes {
            let id: Option<VehicleId> = match change {
                EntityChange::UpdateVehicle(v) => Some(v.id),
                EntityChange::DeleteVehicle(id) => Some(*id),
                EntityChange::UpdateBooking(b) => Some(b.vehicle_id),
                EntityChange::InsertBooking(b) => Some(b.vehicle_id),
                EntityChange::InsertVehicle(_) => None,
            };
            if let Some(id) = id
                && !ids.contains(&id)
            {
                ids.push(id);
            }
        }
        ids
    }
}
