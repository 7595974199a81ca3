// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what a caller is permitted to do without leaking
//! domain internals. They are advisory only and do not replace the checks
//! each command performs.

use fleetdesk_domain::{Booking, UserRole};

use crate::auth::AuthenticatedActor;
use crate::request_response::{BookingCapabilities, CallerCapabilities, Capability};

/// Computes caller-level capabilities from the resolved role.
#[must_use]
pub fn compute_caller_capabilities(actor: &AuthenticatedActor) -> CallerCapabilities {
    let is_user: bool = actor.principal.is_some() && actor.role.satisfies(UserRole::User);
    let is_admin: bool = actor.principal.is_some() && actor.is_admin();

    CallerCapabilities {
        role: actor.role,
        can_create_booking: Capability::from_bool(is_user),
        can_view_all_bookings: Capability::from_bool(is_admin),
        can_manage_fleet: Capability::from_bool(is_admin),
        can_assign_roles: Capability::from_bool(is_admin),
    }
}

/// Computes what the caller may do with `booking`.
///
/// Depends on:
/// - the caller's role
/// - whether the caller owns the booking
/// - whether the booking is still active
#[must_use]
pub fn compute_booking_capabilities(
    actor: &AuthenticatedActor,
    booking: &Booking,
) -> BookingCapabilities {
    let active: bool = booking.status.is_active();
    let owns: bool = actor
        .principal
        .as_ref()
        .is_some_and(|p| booking.is_owned_by(p));
    let may_touch: bool = actor.role.satisfies(UserRole::User) && (owns || actor.is_admin());

    BookingCapabilities {
        can_edit: Capability::from_bool(active && may_touch),
        can_cancel: Capability::from_bool(active && may_touch),
        can_complete: Capability::from_bool(active && actor.is_admin()),
    }
}
