// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response shapes of the API boundary.
//!
//! Every body uses camelCase field names. Partial updates reuse the domain
//! patch types directly.

use fleetdesk_domain::{
    Booking, BookingDetails, BookingId, BookingStatus, DashboardSummary, FareInputs, Principal,
    Timestamp, UserProfile, UserRole, Vehicle, VehicleId, VehicleType,
};

/// API request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// The vehicle to book.
    pub vehicle_id: VehicleId,
    /// Scheduled pickup instant, in nanoseconds since the Unix epoch.
    pub date_time: Timestamp,
    pub pickup_location: String,
    pub destination: String,
    pub vehicle_no: String,
    pub customer_name: String,
    pub customer_no: String,
    pub starting_km: i64,
    pub ending_km: i64,
    pub rate_per_km: i64,
    pub toll_tax: i64,
    pub diesel_or_gas_by_customer: i64,
}

impl CreateBookingRequest {
    /// Splits the request into descriptive fields and fare inputs.
    #[must_use]
    pub fn into_parts(self) -> (VehicleId, BookingDetails, FareInputs) {
        let details: BookingDetails = BookingDetails {
            date_time: self.date_time,
            pickup_location: self.pickup_location,
            destination: self.destination,
            vehicle_no: self.vehicle_no,
            customer_name: self.customer_name,
            customer_no: self.customer_no,
        };
        let fare_inputs: FareInputs = FareInputs {
            starting_km: self.starting_km,
            ending_km: self.ending_km,
            rate_per_km: self.rate_per_km,
            toll_tax: self.toll_tax,
            diesel_or_gas_by_customer: self.diesel_or_gas_by_customer,
        };
        (self.vehicle_id, details, fare_inputs)
    }
}

/// API response for a successful booking creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    /// The id assigned to the new booking.
    pub booking_id: BookingId,
    /// A success message.
    pub message: String,
}

/// API request to add a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub vehicle_type: VehicleType,
    pub current_location: String,
}

/// API response for a successful vehicle creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleResponse {
    /// The id assigned to the new vehicle.
    pub vehicle_id: VehicleId,
    /// A success message.
    pub message: String,
}

/// API request to set a vehicle's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailabilityRequest {
    pub is_available: bool,
}

/// API request to move a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub location: String,
}

/// API request to save the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub name: String,
    #[serde(default)]
    pub job_role: String,
}

/// API request to assign a role to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role: UserRole,
}

/// API response for commands that return no entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// A success message.
    pub message: String,
}

/// Vehicle as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
    pub is_available: bool,
    pub current_location: String,
}

impl From<Vehicle> for VehicleInfo {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_type: vehicle.vehicle_type,
            is_available: vehicle.is_available,
            current_location: vehicle.current_location,
        }
    }
}

/// Booking as returned to callers, with the caller's per-booking capabilities.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInfo {
    pub id: BookingId,
    pub user: Principal,
    pub vehicle_id: VehicleId,
    pub status: BookingStatus,
    pub date_time: Timestamp,
    pub pickup_location: String,
    pub destination: String,
    pub vehicle_no: String,
    pub customer_name: String,
    pub customer_no: String,
    pub starting_km: i64,
    pub ending_km: i64,
    pub rate_per_km: i64,
    pub toll_tax: i64,
    pub diesel_or_gas_by_customer: i64,
    pub total_km: i64,
    pub total_amount: i64,
    pub net_amount: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// What the caller may do with this booking.
    pub capabilities: BookingCapabilities,
}

impl BookingInfo {
    /// Builds the caller view of `booking`.
    #[must_use]
    pub fn new(booking: Booking, capabilities: BookingCapabilities) -> Self {
        Self {
            id: booking.id,
            user: booking.user,
            vehicle_id: booking.vehicle_id,
            status: booking.status,
            date_time: booking.details.date_time,
            pickup_location: booking.details.pickup_location,
            destination: booking.details.destination,
            vehicle_no: booking.details.vehicle_no,
            customer_name: booking.details.customer_name,
            customer_no: booking.details.customer_no,
            starting_km: booking.fare_inputs.starting_km,
            ending_km: booking.fare_inputs.ending_km,
            rate_per_km: booking.fare_inputs.rate_per_km,
            toll_tax: booking.fare_inputs.toll_tax,
            diesel_or_gas_by_customer: booking.fare_inputs.diesel_or_gas_by_customer,
            total_km: booking.fare.total_km,
            total_amount: booking.fare.total_amount,
            net_amount: booking.fare.net_amount,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            capabilities,
        }
    }
}

/// API response carrying the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role: UserRole,
}

/// API response telling whether the caller is an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

/// Profile as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub principal: Principal,
    pub name: String,
    pub job_role: String,
}

impl From<UserProfile> for ProfileInfo {
    fn from(profile: UserProfile) -> Self {
        Self {
            principal: profile.principal,
            name: profile.name,
            job_role: profile.job_role,
        }
    }
}

/// Administrator dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
    pub total_bookings: usize,
    pub active_bookings: usize,
    pub completed_bookings: usize,
    pub cancelled_bookings: usize,
    pub completion_rate_percent: u8,
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub active_gross_amount: i64,
    pub active_net_amount: i64,
}

impl From<DashboardSummary> for DashboardInfo {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            total_bookings: summary.total_bookings,
            active_bookings: summary.active_bookings,
            completed_bookings: summary.completed_bookings,
            cancelled_bookings: summary.cancelled_bookings,
            completion_rate_percent: summary.completion_rate_percent,
            total_vehicles: summary.total_vehicles,
            available_vehicles: summary.available_vehicles,
            active_gross_amount: summary.active_gross_amount,
            active_net_amount: summary.active_net_amount,
        }
    }
}

// ============================================================================
// Capability Model
// ============================================================================

/// Whether an action is permitted. Serializes as a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Caller-level capabilities.
///
/// Advisory only; every command re-checks authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerCapabilities {
    pub role: UserRole,
    pub can_create_booking: Capability,
    pub can_view_all_bookings: Capability,
    pub can_manage_fleet: Capability,
    pub can_assign_roles: Capability,
}

/// What the caller may do with one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCapabilities {
    pub can_edit: Capability,
    pub can_cancel: Capability,
    pub can_complete: Capability,
}
