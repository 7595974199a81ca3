// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `vehicles`: fleet listing and lookup
//! - `bookings`: booking listing and lookup
//! - `users`: role assignments and profiles

pub mod bookings;
pub mod users;
pub mod vehicles;

pub use bookings::{get_booking, list_bookings, list_bookings_for_principal};
pub use users::{get_profile, get_role, list_admins};
pub use vehicles::{get_vehicle, list_available_vehicles, list_vehicles};
