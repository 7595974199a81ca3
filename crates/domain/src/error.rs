// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::types::{BookingId, Principal, VehicleId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced vehicle does not exist.
    VehicleNotFound(VehicleId),
    /// The referenced booking does not exist.
    BookingNotFound(BookingId),
    /// A booking status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The booking being transitioned.
        booking_id: BookingId,
        /// The current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },
    /// A booking can only be edited while it is active.
    BookingNotActive {
        /// The booking being edited.
        booking_id: BookingId,
        /// The current (terminal) status.
        status: BookingStatus,
    },
    /// The caller does not own the booking and is not an admin.
    NotBookingOwner {
        /// The booking the caller tried to access.
        booking_id: BookingId,
        /// The caller.
        principal: Principal,
    },
    /// A vehicle cannot be deleted while active bookings reference it.
    VehicleHasActiveBookings {
        /// The vehicle.
        vehicle_id: VehicleId,
        /// Number of active bookings referencing the vehicle.
        active_bookings: usize,
    },
    /// The vehicle is not available for a new booking.
    VehicleUnavailable(VehicleId),
    /// The last admin cannot give up the admin role.
    LastAdmin(Principal),
    /// Vehicle type string is not one of the known types.
    InvalidVehicleType(String),
    /// Booking status string is not one of the known statuses.
    InvalidBookingStatus(String),
    /// User role string is not one of the known roles.
    InvalidUserRole(String),
    /// A principal identifier is empty or malformed.
    InvalidPrincipal(String),
    /// A vehicle location is empty.
    InvalidLocation(String),
    /// A required booking text field is empty.
    InvalidBookingField {
        /// The field name.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A numeric booking input is out of range.
    NegativeAmount {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Fare arithmetic does not fit the integer representation.
    FareOverflow {
        /// Description of the operation that failed.
        operation: &'static str,
    },
    /// A profile display name is empty or invalid.
    InvalidName(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VehicleNotFound(id) => write!(f, "Vehicle {id} not found"),
            Self::BookingNotFound(id) => write!(f, "Booking {id} not found"),
            Self::InvalidStatusTransition {
                booking_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Booking {booking_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::BookingNotActive { booking_id, status } => {
                write!(
                    f,
                    "Booking {booking_id} is '{status}' and can no longer be modified"
                )
            }
            Self::NotBookingOwner {
                booking_id,
                principal,
            } => {
                write!(f, "Booking {booking_id} does not belong to '{principal}'")
            }
            Self::VehicleHasActiveBookings {
                vehicle_id,
                active_bookings,
            } => {
                write!(
                    f,
                    "Vehicle {vehicle_id} has {active_bookings} active booking(s) and cannot be deleted"
                )
            }
            Self::VehicleUnavailable(id) => write!(f, "Vehicle {id} is not available"),
            Self::LastAdmin(principal) => {
                write!(
                    f,
                    "'{principal}' is the last admin and cannot give up the admin role"
                )
            }
            Self::InvalidVehicleType(value) => write!(f, "Invalid vehicle type: '{value}'"),
            Self::InvalidBookingStatus(value) => write!(f, "Invalid booking status: '{value}'"),
            Self::InvalidUserRole(value) => write!(f, "Invalid user role: '{value}'"),
            Self::InvalidPrincipal(msg) => write!(f, "Invalid principal: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidBookingField { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            Self::NegativeAmount { field, value } => {
                write!(f, "Invalid {field}: {value} must not be negative")
            }
            Self::FareOverflow { operation } => {
                write!(f, "Fare arithmetic overflow while {operation}")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
