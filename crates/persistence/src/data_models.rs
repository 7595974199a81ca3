// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes for the Diesel tables and their conversion to domain types.

use std::str::FromStr;

use diesel::prelude::*;
use fleetdesk::{NewBooking, NewVehicle};
use fleetdesk_domain::{
    Booking, BookingDetails, BookingId, BookingStatus, DomainError, Fare, FareInputs, Principal,
    Timestamp, UserProfile, UserRole, Vehicle, VehicleId, VehicleType,
};

use crate::diesel_schema::{bookings, role_assignments, user_profiles, vehicles};
use crate::error::PersistenceError;

/// Diesel Queryable struct for vehicle rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
pub struct VehicleRow {
    pub vehicle_id: i64,
    pub vehicle_type: String,
    pub is_available: i32,
    pub current_location: String,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = PersistenceError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VehicleId::new(row.vehicle_id),
            vehicle_type: VehicleType::from_str(&row.vehicle_type).map_err(corrupt)?,
            is_available: row.is_available != 0,
            current_location: row.current_location,
        })
    }
}

/// Column values written when inserting or overwriting a vehicle.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = vehicles)]
pub struct VehicleRecord<'a> {
    pub vehicle_type: &'a str,
    pub is_available: i32,
    pub current_location: &'a str,
}

impl<'a> From<&'a NewVehicle> for VehicleRecord<'a> {
    fn from(vehicle: &'a NewVehicle) -> Self {
        Self {
            vehicle_type: vehicle.vehicle_type.as_str(),
            is_available: i32::from(vehicle.is_available),
            current_location: &vehicle.current_location,
        }
    }
}

impl<'a> From<&'a Vehicle> for VehicleRecord<'a> {
    fn from(vehicle: &'a Vehicle) -> Self {
        Self {
            vehicle_type: vehicle.vehicle_type.as_str(),
            is_available: i32::from(vehicle.is_available),
            current_location: &vehicle.current_location,
        }
    }
}

/// Diesel Queryable struct for booking rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub booking_id: i64,
    pub principal: String,
    pub vehicle_id: i64,
    pub status: String,
    pub date_time: i64,
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
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::new(row.booking_id),
            user: Principal::new(&row.principal).map_err(corrupt)?,
            vehicle_id: VehicleId::new(row.vehicle_id),
            status: BookingStatus::from_str(&row.status).map_err(corrupt)?,
            details: BookingDetails {
                date_time: Timestamp::from_nanos(row.date_time),
                pickup_location: row.pickup_location,
                destination: row.destination,
                vehicle_no: row.vehicle_no,
                customer_name: row.customer_name,
                customer_no: row.customer_no,
            },
            fare_inputs: FareInputs {
                starting_km: row.starting_km,
                ending_km: row.ending_km,
                rate_per_km: row.rate_per_km,
                toll_tax: row.toll_tax,
                diesel_or_gas_by_customer: row.diesel_or_gas_by_customer,
            },
            fare: Fare {
                total_km: row.total_km,
                total_amount: row.total_amount,
                net_amount: row.net_amount,
            },
            created_at: Timestamp::from_nanos(row.created_at),
            updated_at: Timestamp::from_nanos(row.updated_at),
        })
    }
}

/// Column values written when inserting or overwriting a booking.
///
/// `principal` and `created_at` are written on insert only.
#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct BookingRecord<'a> {
    pub principal: &'a str,
    pub created_at: i64,
    #[diesel(embed)]
    pub body: BookingBody<'a>,
}

/// The mutable columns of a booking.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct BookingBody<'a> {
    pub vehicle_id: i64,
    pub status: &'a str,
    pub date_time: i64,
    pub pickup_location: &'a str,
    pub destination: &'a str,
    pub vehicle_no: &'a str,
    pub customer_name: &'a str,
    pub customer_no: &'a str,
    pub starting_km: i64,
    pub ending_km: i64,
    pub rate_per_km: i64,
    pub toll_tax: i64,
    pub diesel_or_gas_by_customer: i64,
    pub total_km: i64,
    pub total_amount: i64,
    pub net_amount: i64,
    pub updated_at: i64,
}

impl<'a> BookingBody<'a> {
    fn new(
        vehicle_id: VehicleId,
        status: BookingStatus,
        details: &'a BookingDetails,
        inputs: &FareInputs,
        fare: &Fare,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.value(),
            status: status.as_str(),
            date_time: details.date_time.nanos(),
            pickup_location: &details.pickup_location,
            destination: &details.destination,
            vehicle_no: &details.vehicle_no,
            customer_name: &details.customer_name,
            customer_no: &details.customer_no,
            starting_km: inputs.starting_km,
            ending_km: inputs.ending_km,
            rate_per_km: inputs.rate_per_km,
            toll_tax: inputs.toll_tax,
            diesel_or_gas_by_customer: inputs.diesel_or_gas_by_customer,
            total_km: fare.total_km,
            total_amount: fare.total_amount,
            net_amount: fare.net_amount,
            updated_at: updated_at.nanos(),
        }
    }
}

impl<'a> From<&'a NewBooking> for BookingRecord<'a> {
    fn from(booking: &'a NewBooking) -> Self {
        Self {
            principal: booking.user.as_str(),
            created_at: booking.created_at.nanos(),
            body: BookingBody::new(
                booking.vehicle_id,
                booking.status,
                &booking.details,
                &booking.fare_inputs,
                &booking.fare,
                booking.updated_at,
            ),
        }
    }
}

impl<'a> From<&'a Booking> for BookingBody<'a> {
    fn from(booking: &'a Booking) -> Self {
        Self::new(
            booking.vehicle_id,
            booking.status,
            &booking.details,
            &booking.fare_inputs,
            &booking.fare,
            booking.updated_at,
        )
    }
}

/// Diesel Queryable struct for role assignment rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = role_assignments)]
pub struct RoleAssignmentRow {
    pub principal: String,
    pub role: String,
}

impl RoleAssignmentRow {
    /// Parses the stored role.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is not a known role.
    pub fn role(&self) -> Result<UserRole, PersistenceError> {
        UserRole::from_str(&self.role).map_err(corrupt)
    }
}

/// Diesel Queryable struct for profile rows.
#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_profiles)]
pub struct UserProfileRow {
    pub principal: String,
    pub name: String,
    pub job_role: String,
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = PersistenceError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            principal: Principal::new(&row.principal).map_err(corrupt)?,
            name: row.name,
            job_role: row.job_role,
        })
    }
}

/// Maps a stored value that no longer parses to a reconstruction error.
fn corrupt(err: DomainError) -> PersistenceError {
    PersistenceError::InvalidRecord(err.to_string())
}
