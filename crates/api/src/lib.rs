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

//! API boundary of the fleet desk.
//!
//! Resolves callers, enforces the role matrix, serves reads through the
//! query cache and turns commands into persisted transitions.

mod auth;
mod cache;
mod capabilities;
mod desk;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, RoleResolver};
pub use cache::{
    CacheStats, Cacheable, CachedValue, Invalidation, QueryCache, QueryKey, invalidations_for,
};
pub use capabilities::{compute_booking_capabilities, compute_caller_capabilities};
pub use desk::{Clock, Desk};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    ApiResult, add_vehicle, assign_caller_user_role, cancel_booking, complete_booking,
    create_booking, delete_vehicle, get_all_bookings, get_all_vehicles, get_available_vehicles,
    get_booking, get_caller_capabilities, get_caller_user_profile, get_caller_user_role,
    get_dashboard_summary, get_user_bookings, get_user_profile, get_vehicle, is_caller_admin,
    save_caller_user_profile, set_vehicle_availability, update_booking, update_vehicle,
    update_vehicle_location,
};
pub use request_response::{
    AssignRoleRequest, BookingCapabilities, BookingInfo, CallerCapabilities, Capability,
    CommandResponse, CreateBookingRequest, CreateBookingResponse, CreateVehicleRequest,
    CreateVehicleResponse, DashboardInfo, IsAdminResponse, ProfileInfo, RoleResponse,
    SaveProfileRequest, SetAvailabilityRequest, UpdateLocationRequest, VehicleInfo,
};
