// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use crate::fare::{Fare, FareInputs};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Canonical numeric identifier of a vehicle, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(i64);

impl VehicleId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical numeric identifier of a booking, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque authenticated identity supplied by the external identity provider.
///
/// The value is never interpreted, only compared. Surrounding whitespace is
/// stripped at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from its textual form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrincipal` if the value is empty or contains
    /// whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPrincipal(String::from(
                "Principal cannot be empty",
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPrincipal(format!(
                "'{trimmed}' contains whitespace"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An instant with nanosecond precision, stored as nanoseconds since the Unix epoch (UTC).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Returns the current wall-clock instant.
    ///
    /// Instants past the year 2262 saturate at `i64::MAX` nanoseconds.
    #[must_use]
    pub fn now() -> Self {
        let nanos: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        Self(i64::try_from(nanos).unwrap_or(i64::MAX))
    }

    /// Returns the raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> i64 {
        self.0
    }

    /// Formats the instant as RFC 3339, or `None` if it is outside the
    /// representable calendar range.
    #[must_use]
    pub fn to_rfc3339(&self) -> Option<String> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0))
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok())
    }
}

/// Vehicle classes in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Passenger car.
    Cab,
    /// Minivan.
    Van,
    /// Goods truck.
    Truck,
    /// Passenger bus.
    Bus,
}

impl VehicleType {
    /// Returns the lowercase string representation used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cab => "cab",
            Self::Van => "van",
            Self::Truck => "truck",
            Self::Bus => "bus",
        }
    }
}

impl FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cab" => Ok(Self::Cab),
            "van" => Ok(Self::Van),
            "truck" => Ok(Self::Truck),
            "bus" => Ok(Self::Bus),
            _ => Err(DomainError::InvalidVehicleType(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller roles.
///
/// Ordered by privilege: `Guest < User < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Unauthenticated or unregistered caller. Read-only access to its own role.
    Guest,
    /// Staff member: creates and manages their own bookings.
    User,
    /// Administrator: reviews all bookings and manages the fleet.
    Admin,
}

impl UserRole {
    /// Returns the lowercase string representation used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Returns true if this role grants at least the privileges of `required`.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self >= required
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Self::Guest),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidUserRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// The canonical identifier.
    pub id: VehicleId,
    /// The vehicle class.
    pub vehicle_type: VehicleType,
    /// Whether the vehicle is in the bookable pool.
    pub is_available: bool,
    /// Free-text current location.
    pub current_location: String,
}

/// The caller-supplied descriptive fields of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    /// Scheduled pickup instant.
    pub date_time: Timestamp,
    /// Pickup location.
    pub pickup_location: String,
    /// Destination.
    pub destination: String,
    /// Registration plate of the vehicle used.
    pub vehicle_no: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer contact number.
    pub customer_no: String,
}

/// A vehicle booking.
///
/// The `fare` always reflects the stored `fare_inputs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The canonical identifier.
    pub id: BookingId,
    /// The principal that created the booking.
    pub user: Principal,
    /// The vehicle used by the booking.
    pub vehicle_id: VehicleId,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Descriptive fields.
    pub details: BookingDetails,
    /// Odometer and tariff inputs.
    pub fare_inputs: FareInputs,
    /// Amounts derived from `fare_inputs`.
    pub fare: Fare,
    /// Creation instant.
    pub created_at: Timestamp,
    /// Last modification instant.
    pub updated_at: Timestamp,
}

impl Booking {
    /// Returns true if `principal` created this booking.
    #[must_use]
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.user == principal
    }
}

/// Display profile of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The principal this profile belongs to.
    pub principal: Principal,
    /// Display name.
    pub name: String,
    /// Free-text job description. Display only; carries no authorization meaning.
    pub job_role: String,
}
