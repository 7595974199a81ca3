// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, EntityChange, State, TransitionResult};
use fleetdesk_domain::{
    Booking, BookingDetails, BookingId, BookingStatus, FareInputs, Principal, Timestamp, UserRole,
    Vehicle, VehicleId, VehicleType, derive_fare,
};

pub const NOW: Timestamp = Timestamp::from_nanos(1_767_225_600_000_000_000);
pub const LATER: Timestamp = Timestamp::from_nanos(1_767_229_200_000_000_000);

pub fn create_test_user() -> Actor {
    Actor::new(Principal::new("staff-1").unwrap(), UserRole::User)
}

pub fn create_other_user() -> Actor {
    Actor::new(Principal::new("staff-2").unwrap(), UserRole::User)
}

pub fn create_test_admin() -> Actor {
    Actor::new(Principal::new("admin-1").unwrap(), UserRole::Admin)
}

pub fn create_test_guest() -> Actor {
    Actor::new(Principal::new("anonymous").unwrap(), UserRole::Guest)
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

pub fn create_test_vehicle(id: i64, is_available: bool) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        vehicle_type: VehicleType::Cab,
        is_available,
        current_location: String::from("Depot A"),
    }
}

pub fn create_test_booking(id: i64, owner: &Actor, vehicle_id: i64, status: BookingStatus) -> Booking {
    let fare_inputs: FareInputs = create_test_fare_inputs();
    Booking {
        id: BookingId::new(id),
        user: owner.principal.clone(),
        vehicle_id: VehicleId::new(vehicle_id),
        status,
        details: create_test_details(),
        fare_inputs,
        fare: derive_fare(&fare_inputs).unwrap(),
        created_at: NOW,
        updated_at: NOW,
    }
}

/// One booked cab (vehicle 1, booking 1 owned by staff-1) and one free van (vehicle 2).
pub fn create_booked_state() -> State {
    let mut van: Vehicle = create_test_vehicle(2, true);
    van.vehicle_type = VehicleType::Van;
    State::new(
        vec![create_test_vehicle(1, false), van],
        vec![create_test_booking(
            1,
            &create_test_user(),
            1,
            BookingStatus::Active,
        )],
    )
}

pub fn updated_booking(result: &TransitionResult) -> &Booking {
    result
        .changes
        .iter()
        .find_map(|c| match c {
            EntityChange::UpdateBooking(b) => Some(b),
            _ => None,
        })
        .expect("transition should update a booking")
}

pub fn updated_vehicle(result: &TransitionResult, id: i64) -> Option<&Vehicle> {
    result.changes.iter().find_map(|c| match c {
        EntityChange::UpdateVehicle(v) if v.id == VehicleId::new(id) => Some(v),
        _ => None,
    })
}
