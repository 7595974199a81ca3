// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error;
mod stats;
mod types;

use crate::{
    Booking, BookingDetails, BookingId, BookingStatus, FareInputs, Principal, Timestamp, Vehicle,
    VehicleId, VehicleType, derive_fare,
};

pub fn create_test_details() -> BookingDetails {
    BookingDetails {
        date_time: Timestamp::from_nanos(1_767_225_600_000_000_000),
        pickup_location: String::from("Airport T2"),
        destination: String::from("Central Station"),
        vehicle_no: String::from("KA-01-AB-1234"),
        customer_name: String::from("Asha Rao"),
        customer_no: String::from("+91 98450 00000"),
    }
}

pub fn create_test_booking(id: i64, status: BookingStatus, inputs: FareInputs) -> Booking {
    Booking {
        id: BookingId::new(id),
        user: Principal::new("staff-1").unwrap(),
        vehicle_id: VehicleId::new(1),
        status,
        details: create_test_details(),
        fare_inputs: inputs,
        fare: derive_fare(&inputs).unwrap(),
        created_at: Timestamp::from_nanos(1),
        updated_at: Timestamp::from_nanos(1),
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
