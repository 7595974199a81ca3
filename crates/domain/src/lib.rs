// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking_status;
mod error;
mod fare;
mod patch;
mod stats;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking_status::BookingStatus;
pub use error::DomainError;
pub use fare::{Fare, FareInputs, derive_fare};
pub use patch::{BookingPatch, Patch, VehiclePatch};
pub use stats::{DashboardSummary, summarize};
pub use types::{
    Booking, BookingDetails, BookingId, Principal, Timestamp, UserProfile, UserRole, Vehicle,
    VehicleId, VehicleType,
};
pub use validation::{
    validate_booking_details, validate_booking_input, validate_location, validate_profile_name,
};
