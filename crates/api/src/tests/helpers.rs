// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{BookingId, Principal, Timestamp, VehicleId, VehicleType};
use fleetdesk_persistence::Persistence;

use crate::{AuthenticatedActor, CreateBookingRequest, CreateVehicleRequest, Desk, RoleResolver};

pub const NOW: i64 = 1_767_225_600_000_000_000;
pub const ADMIN: &str = "admin-1";

pub fn create_test_desk() -> Desk {
    let persistence = Persistence::new_in_memory().unwrap();
    let mut desk = Desk::with_clock(
        persistence,
        RoleResolver::default(),
        Box::new(|| Timestamp::from_nanos(NOW)),
    );
    desk.seed_admins(&[Principal::new(ADMIN).unwrap()]).unwrap();
    desk
}

pub fn admin(desk: &mut Desk) -> AuthenticatedActor {
    desk.resolve_caller(Some(ADMIN)).unwrap()
}

pub fn staff(desk: &mut Desk, name: &str) -> AuthenticatedActor {
    desk.resolve_caller(Some(name)).unwrap()
}

pub fn guest(desk: &mut Desk) -> AuthenticatedActor {
    desk.resolve_caller(None).unwrap()
}

pub fn booking_request(vehicle_id: VehicleId) -> CreateBookingRequest {
    CreateBookingRequest {
        vehicle_id,
        date_time: Timestamp::from_nanos(NOW),
        pickup_location: String::from("Depot A"),
        destination: String::from("Airport"),
        vehicle_no: String::from("KA-01-1234"),
        customer_name: String::from("R. Iyer"),
        customer_no: String::from("555-0100"),
        starting_km: 100,
        ending_km: 150,
        rate_per_km: 10,
        toll_tax: 20,
        diesel_or_gas_by_customer: 5,
    }
}

pub fn add_vehicle(
    desk: &mut Desk,
    actor: &AuthenticatedActor,
    vehicle_type: VehicleType,
    location: &str,
) -> VehicleId {
    desk.add_vehicle(
        actor,
        CreateVehicleRequest {
            vehicle_type,
            current_location: location.to_string(),
        },
    )
    .unwrap()
    .response
    .vehicle_id
}

pub fn book(desk: &mut Desk, actor: &AuthenticatedActor, vehicle_id: VehicleId) -> BookingId {
    desk.create_booking(actor, booking_request(vehicle_id))
        .unwrap()
        .response
        .booking_id
}
