// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{
    BookingDetails, BookingId, BookingPatch, FareInputs, VehicleId, VehiclePatch, VehicleType,
};

/// A command represents user intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a booking owned by the acting principal.
    CreateBooking {
        /// The vehicle to book.
        vehicle_id: VehicleId,
        /// Descriptive fields.
        details: BookingDetails,
        /// Odometer and tariff inputs.
        fare_inputs: FareInputs,
    },
    /// Partially update an active booking.
    UpdateBooking {
        /// The booking to update.
        booking_id: BookingId,
        /// The fields to change.
        patch: BookingPatch,
    },
    /// Move an active booking to `cancelled`.
    CancelBooking {
        /// The booking to cancel.
        booking_id: BookingId,
    },
    /// Move an active booking to `completed`.
    CompleteBooking {
        /// The booking to complete.
        booking_id: BookingId,
    },
    /// Add a vehicle to the fleet.
    AddVehicle {
        /// The vehicle class.
        vehicle_type: VehicleType,
        /// Initial location.
        current_location: String,
    },
    /// Remove a vehicle from the fleet.
    DeleteVehicle {
        /// The vehicle to remove.
        vehicle_id: VehicleId,
    },
    /// Partially update a vehicle.
    UpdateVehicle {
        /// The vehicle to update.
        vehicle_id: VehicleId,
        /// The fields to change.
        patch: VehiclePatch,
    },
    /// Directly set whether a vehicle is bookable.
    SetVehicleAvailability {
        /// The vehicle to update.
        vehicle_id: VehicleId,
        /// The new availability.
        is_available: bool,
    },
    /// Move a vehicle to a new location.
    UpdateVehicleLocation {
        /// The vehicle to update.
        vehicle_id: VehicleId,
        /// The new location.
        location: String,
    },
}

impl Command {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateBooking { .. } => "CreateBooking",
            Self::UpdateBooking { .. } => "UpdateBooking",
            Self::CancelBooking { .. } => "CancelBooking",
            Self::CompleteBooking { .. } => "CompleteBooking",
            Self::AddVehicle { .. } => "AddVehicle",
            Self::DeleteVehicle { .. } => "DeleteVehicle",
            Self::UpdateVehicle { .. } => "UpdateVehicle",
            Self::SetVehicleAvailability { .. } => "SetVehicleAvailability",
            Self::UpdateVehicleLocation { .. } => "UpdateVehicleLocation",
        }
    }
}
