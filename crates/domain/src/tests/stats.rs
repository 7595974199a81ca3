// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_booking, create_test_vehicle};
use crate::{BookingStatus, FareInputs, summarize};

fn trip(start: i64, end: i64, rate: i64, toll: i64) -> FareInputs {
    FareInputs {
        starting_km: start,
        ending_km: end,
        rate_per_km: rate,
        toll_tax: toll,
        diesel_or_gas_by_customer: 0,
    }
}

#[test]
fn test_summary_counts_statuses_and_sums_active_amounts() {
    let bookings = vec![
        create_test_booking(1, BookingStatus::Active, trip(100, 150, 10, 20)),
        create_test_booking(2, BookingStatus::Active, trip(0, 10, 5, 60)),
        create_test_booking(3, BookingStatus::Completed, trip(0, 100, 10, 0)),
        create_test_booking(4, BookingStatus::Cancelled, trip(0, 100, 10, 0)),
    ];
    let vehicles = vec![
        create_test_vehicle(1, false),
        create_test_vehicle(2, true),
        create_test_vehicle(3, true),
    ];

    let summary = summarize(&bookings, &vehicles);

    assert_eq!(summary.total_bookings, 4);
    assert_eq!(summary.active_bookings, 2);
    assert_eq!(summary.completed_bookings, 1);
    assert_eq!(summary.cancelled_bookings, 1);
    assert_eq!(summary.completion_rate_percent, 25);
    assert_eq!(summary.total_vehicles, 3);
    assert_eq!(summary.available_vehicles, 2);
    assert_eq!(summary.active_gross_amount, 550);
    assert_eq!(summary.active_net_amount, 470);
}
