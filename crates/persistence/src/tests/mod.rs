// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use fleetdesk::{Actor, Command, apply};
use fleetdesk_domain::{
    BookingDetails, BookingId, FareInputs, Principal, Timestamp, UserRole, VehicleId, VehicleType,
};

use crate::Persistence;

pub const NOW: Timestamp = Timestamp::from_nanos(1_767_225_600_000_000_000);

pub fn create_test_admin() -> Actor {
    Actor::new(Principal::new("admin-1").unwrap(), UserRole::Admin)
}

pub fn create_test_user() -> Actor {
    Actor::new(Principal::new("staff-1").unwrap(), UserRole::User)
}

pub fn create_test_details() -> BookingDetails {
    BookingDetails {
        date_time: Timestamp::from_nanos(1_767_312_000_000_000_000),
        pickup_location: String::from("Airport T2"),
        destination: String::from("Central Station"),
        vehicle_no: String::from("KA-01-AB-1234"),
        customer_name: String::from("Asha Rao"),
        customer_no: String::from("+91 98450 00000"),
    }
}

pub fn create_test_fare_inputs() -> FareInputs {
    FareInputs {
        starting_km: 100,
        ending_km: 150,
        rate_per_km: 10,
        toll_tax: 20,
        diesel_or_gas_by_customer: 5,
    }
}

/// Runs `command` against the stored state and persists the result.
pub fn run(persistence: &mut Persistence, command: Command, actor: &Actor) -> crate::PersistTransitionResult {
    let state = persistence.load_state().unwrap();
    let result = apply(&state, command, actor, NOW).unwrap();
    persistence.persist_transition(&result).unwrap()
}

pub fn add_vehicle(persistence: &mut Persistence, location: &str) -> VehicleId {
    run(
        persistence,
        Command::AddVehicle {
            vehicle_type: VehicleType::Cab,
            current_location: location.to_string(),
        },
        &create_test_admin(),
    )
    .vehicle_id
    .unwrap()
}

pub fn create_booking(persistence: &mut Persistence, vehicle_id: VehicleId, actor: &Actor) -> BookingId {
    run(
        persistence,
        Command::CreateBooking {
            vehicle_id,
            details: create_test_details(),
            fare_inputs: create_test_fare_inputs(),
        },
        actor,
    )
    .booking_id
    .unwrap()
}
