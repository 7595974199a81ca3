// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate figures for the administrator dashboard.

use serde::{Deserialize, Serialize};

use crate::booking_status::BookingStatus;
use crate::types::{Booking, Vehicle};

/// Booking and fleet counts shown on the administrator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_bookings: usize,
    pub active_bookings: usize,
    pub completed_bookings: usize,
    pub cancelled_bookings: usize,
    /// Completed bookings as a rounded percentage of all bookings.
    pub completion_rate_percent: u8,
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    /// Sum of `total_amount` over active bookings.
    pub active_gross_amount: i64,
    /// Sum of `net_amount` over active bookings.
    pub active_net_amount: i64,
}

/// Computes dashboard figures from the full booking and vehicle lists.
///
/// Amount sums saturate instead of overflowing.
#[must_use]
pub fn summarize(bookings: &[Booking], vehicles: &[Vehicle]) -> DashboardSummary {
    let mut summary: DashboardSummary = DashboardSummary {
        total_bookings: bookings.len(),
        total_vehicles: vehicles.len(),
        available_vehicles: vehicles.iter().filter(|v| v.is_available).count(),
        ..DashboardSummary::default()
    };

    for booking in bookings {
        match booking.status {
            BookingStatus::Active => {
                summary.active_bookings += 1;
                summary.active_gross_amount = summary
                    .active_gross_amount
                    .saturating_add(booking.fare.total_amount);
                summary.active_net_amount = summary
                    .active_net_amount
                    .saturating_add(booking.fare.net_amount);
            }
            BookingStatus::Completed => summary.completed_bookings += 1,
            BookingStatus::Cancelled => summary.cancelled_bookings += 1,
        }
    }

    summary.completion_rate_percent =
        completion_rate_percent(summary.completed_bookings, summary.total_bookings);
    summary
}

/// Rounds `completed / total × 100` half-up, in integer arithmetic.
fn completion_rate_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled: usize = completed.saturating_mul(200).saturating_add(total) / total.saturating_mul(2);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}
