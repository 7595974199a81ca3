// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingId, BookingStatus, DomainError, Principal, VehicleId};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::VehicleNotFound(VehicleId::new(4));
    assert_eq!(format!("{err}"), "Vehicle 4 not found");

    let err: DomainError = DomainError::BookingNotFound(BookingId::new(9));
    assert_eq!(format!("{err}"), "Booking 9 not found");

    let err: DomainError = DomainError::InvalidStatusTransition {
        booking_id: BookingId::new(2),
        from: BookingStatus::Cancelled,
        to: BookingStatus::Completed,
    };
    assert_eq!(
        format!("{err}"),
        "Booking 2 cannot move from 'cancelled' to 'completed'"
    );

    let err: DomainError = DomainError::BookingNotActive {
        booking_id: BookingId::new(2),
        status: BookingStatus::Completed,
    };
    assert_eq!(
        format!("{err}"),
        "Booking 2 is 'completed' and can no longer be modified"
    );

    let err: DomainError = DomainError::NotBookingOwner {
        booking_id: BookingId::new(5),
        principal: Principal::new("staff-2").unwrap(),
    };
    assert_eq!(format!("{err}"), "Booking 5 does not belong to 'staff-2'");

    let err: DomainError = DomainError::VehicleHasActiveBookings {
        vehicle_id: VehicleId::new(1),
        active_bookings: 2,
    };
    assert_eq!(
        format!("{err}"),
        "Vehicle 1 has 2 active booking(s) and cannot be deleted"
    );

    let err: DomainError = DomainError::VehicleUnavailable(VehicleId::new(3));
    assert_eq!(format!("{err}"), "Vehicle 3 is not available");

    let err: DomainError = DomainError::InvalidVehicleType(String::from("boat"));
    assert_eq!(format!("{err}"), "Invalid vehicle type: 'boat'");

    let err: DomainError = DomainError::NegativeAmount {
        field: "toll_tax",
        value: -5,
    };
    assert_eq!(format!("{err}"), "Invalid toll_tax: -5 must not be negative");

    let err: DomainError = DomainError::FareOverflow {
        operation: "computing total amount",
    };
    assert_eq!(
        format!("{err}"),
        "Fare arithmetic overflow while computing total amount"
    );
}
