// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The query/command façade.
//!
//! A [`Desk`] owns the store, the query cache, the role resolver and the
//! clock. Each method is one independent request. Queries that only read
//! the resolved caller live in [`crate::handlers`].

use fleetdesk_domain::{
    BookingId, BookingPatch, Principal, Timestamp, UserRole, VehicleId, VehiclePatch,
};
use fleetdesk_persistence::Persistence;
use tracing::info;

use crate::auth::{AuthenticatedActor, RoleResolver};
use crate::cache::{CacheStats, Invalidation, QueryCache, QueryKey};
use crate::error::{ApiError, translate_domain_error};
use crate::handlers::{self, ApiResult};
use crate::request_response::{
    AssignRoleRequest, BookingInfo, CommandResponse, CreateBookingRequest, CreateBookingResponse,
    CreateVehicleRequest, CreateVehicleResponse, DashboardInfo, ProfileInfo, SaveProfileRequest,
    SetAvailabilityRequest, UpdateLocationRequest, VehicleInfo,
};

/// Source of the instants stamped on bookings.
pub type Clock = Box<dyn Fn() -> Timestamp + Send>;

/// Booking and fleet façade with a query cache.
pub struct Desk {
    persistence: Persistence,
    cache: QueryCache,
    resolver: RoleResolver,
    clock: Clock,
}

impl Desk {
    /// Creates a façade over `persistence` using the system clock.
    #[must_use]
    pub fn new(persistence: Persistence, resolver: RoleResolver) -> Self {
        Self::with_clock(persistence, resolver, Box::new(Timestamp::now))
    }

    /// Creates a façade with an explicit clock.
    #[must_use]
    pub fn with_clock(persistence: Persistence, resolver: RoleResolver, clock: Clock) -> Self {
        Self {
            persistence,
            cache: QueryCache::new(),
            resolver,
            clock,
        }
    }

    /// Resolves the caller of a request from the raw principal supplied by
    /// the identity provider. `None` yields a guest.
    ///
    /// # Errors
    ///
    /// Returns an error if the principal is malformed or the role lookup fails.
    pub fn resolve_caller(
        &mut self,
        principal: Option<&str>,
    ) -> Result<AuthenticatedActor, ApiError> {
        let principal: Option<Principal> = principal
            .map(Principal::new)
            .transpose()
            .map_err(translate_domain_error)?;
        self.resolver
            .resolve(&mut self.persistence, &mut self.cache, principal)
    }

    /// Grants the admin role to each of `principals`.
    ///
    /// Used at startup so a fresh store has at least one administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if a role cannot be stored.
    pub fn seed_admins(&mut self, principals: &[Principal]) -> Result<(), ApiError> {
        let mut invalidated: Vec<Invalidation> = Vec::with_capacity(principals.len());
        for principal in principals {
            self.persistence.set_role(principal, UserRole::Admin)?;
            invalidated.push(QueryKey::CallerRole(principal.clone()).into());
            info!(principal = %principal, "Seeded admin role");
        }
        self.cache.invalidate(&invalidated);
        Ok(())
    }

    /// Returns the query cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns true if `key` currently has a cached value.
    #[must_use]
    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.cache.contains(key)
    }

    fn now(&self) -> Timestamp {
        (self.clock)()
    }

    // Booking commands

    /// See [`handlers::create_booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn create_booking(
        &mut self,
        actor: &AuthenticatedActor,
        request: CreateBookingRequest,
    ) -> Result<ApiResult<CreateBookingResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::create_booking(&mut self.persistence, &mut self.cache, actor, request, now)
    }

    /// See [`handlers::update_booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn update_booking(
        &mut self,
        actor: &AuthenticatedActor,
        booking_id: BookingId,
        patch: BookingPatch,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::update_booking(
            &mut self.persistence,
            &mut self.cache,
            actor,
            booking_id,
            patch,
            now,
        )
    }

    /// See [`handlers::cancel_booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn cancel_booking(
        &mut self,
        actor: &AuthenticatedActor,
        booking_id: BookingId,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::cancel_booking(&mut self.persistence, &mut self.cache, actor, booking_id, now)
    }

    /// See [`handlers::complete_booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn complete_booking(
        &mut self,
        actor: &AuthenticatedActor,
        booking_id: BookingId,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::complete_booking(&mut self.persistence, &mut self.cache, actor, booking_id, now)
    }

    // Fleet commands

    /// See [`handlers::add_vehicle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn add_vehicle(
        &mut self,
        actor: &AuthenticatedActor,
        request: CreateVehicleRequest,
    ) -> Result<ApiResult<CreateVehicleResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::add_vehicle(&mut self.persistence, &mut self.cache, actor, request, now)
    }

    /// See [`handlers::delete_vehicle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn delete_vehicle(
        &mut self,
        actor: &AuthenticatedActor,
        vehicle_id: VehicleId,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::delete_vehicle(&mut self.persistence, &mut self.cache, actor, vehicle_id, now)
    }

    /// See [`handlers::update_vehicle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn update_vehicle(
        &mut self,
        actor: &AuthenticatedActor,
        vehicle_id: VehicleId,
        patch: VehiclePatch,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::update_vehicle(
            &mut self.persistence,
            &mut self.cache,
            actor,
            vehicle_id,
            patch,
            now,
        )
    }

    /// See [`handlers::set_vehicle_availability`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn set_vehicle_availability(
        &mut self,
        actor: &AuthenticatedActor,
        vehicle_id: VehicleId,
        request: SetAvailabilityRequest,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::set_vehicle_availability(
            &mut self.persistence,
            &mut self.cache,
            actor,
            vehicle_id,
            request,
            now,
        )
    }

    /// See [`handlers::update_vehicle_location`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be stored.
    pub fn update_vehicle_location(
        &mut self,
        actor: &AuthenticatedActor,
        vehicle_id: VehicleId,
        request: UpdateLocationRequest,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        let now: Timestamp = self.now();
        handlers::update_vehicle_location(
            &mut self.persistence,
            &mut self.cache,
            actor,
            vehicle_id,
            request,
            now,
        )
    }

    // Roles and profiles

    /// See [`handlers::assign_caller_user_role`].
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment is rejected or cannot be stored.
    pub fn assign_caller_user_role(
        &mut self,
        actor: &AuthenticatedActor,
        target: &Principal,
        request: AssignRoleRequest,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        handlers::assign_caller_user_role(
            &mut self.persistence,
            &mut self.cache,
            actor,
            target,
            request,
        )
    }

    /// See [`handlers::save_caller_user_profile`].
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is rejected or cannot be stored.
    pub fn save_caller_user_profile(
        &mut self,
        actor: &AuthenticatedActor,
        request: &SaveProfileRequest,
    ) -> Result<ApiResult<CommandResponse>, ApiError> {
        handlers::save_caller_user_profile(&mut self.persistence, &mut self.cache, actor, request)
    }

    /// See [`handlers::get_caller_user_profile`].
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub fn get_caller_user_profile(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Option<ProfileInfo>, ApiError> {
        handlers::get_caller_user_profile(&mut self.persistence, &mut self.cache, actor)
    }

    /// See [`handlers::get_user_profile`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not read the profile or the lookup fails.
    pub fn get_user_profile(
        &mut self,
        actor: &AuthenticatedActor,
        target: &Principal,
    ) -> Result<Option<ProfileInfo>, ApiError> {
        handlers::get_user_profile(&mut self.persistence, &mut self.cache, actor, target)
    }

    // Queries

    /// See [`handlers::get_user_bookings`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not run the query or the lookup fails.
    pub fn get_user_bookings(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<BookingInfo>, ApiError> {
        handlers::get_user_bookings(&mut self.persistence, &mut self.cache, actor)
    }

    /// See [`handlers::get_all_bookings`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not run the query or the lookup fails.
    pub fn get_all_bookings(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<BookingInfo>, ApiError> {
        handlers::get_all_bookings(&mut self.persistence, &mut self.cache, actor)
    }

    /// See [`handlers::get_booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not read the booking or the lookup fails.
    pub fn get_booking(
        &mut self,
        actor: &AuthenticatedActor,
        booking_id: BookingId,
    ) -> Result<Option<BookingInfo>, ApiError> {
        handlers::get_booking(&mut self.persistence, &mut self.cache, actor, booking_id)
    }

    /// See [`handlers::get_available_vehicles`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not run the query or the lookup fails.
    pub fn get_available_vehicles(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<VehicleInfo>, ApiError> {
        handlers::get_available_vehicles(&mut self.persistence, &mut self.cache, actor)
    }

    /// See [`handlers::get_all_vehicles`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not run the query or the lookup fails.
    pub fn get_all_vehicles(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<VehicleInfo>, ApiError> {
        handlers::get_all_vehicles(&mut self.persistence, &mut self.cache, actor)
    }

    /// See [`handlers::get_vehicle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller may not run the query or the lookup fails.
    pub fn get_vehicle(
        &mut self,
        actor: &AuthenticatedActor,
        vehicle_id: VehicleId,
    ) -> Result<Option<VehicleInfo>, ApiError> {
        handlers::get_vehicle(&mut self.persistence, &mut self.cache, actor, vehicle_id)
    }

    /// See [`handlers::get_dashboard_summary`].
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the lookup fails.
    pub fn get_dashboard_summary(
        &mut self,
        actor: &AuthenticatedActor,
    ) -> Result<DashboardInfo, ApiError> {
        handlers::get_dashboard_summary(&mut self.persistence, &mut self.cache, actor)
    }
}
