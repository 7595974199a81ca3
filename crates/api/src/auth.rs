// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity, role resolution and authorization.
//!
//! Identity comes from the external identity provider as an opaque
//! principal. Roles come from stored role assignments. Every operation is
//! gated here before any cache lookup or state change.

use fleetdesk::Actor;
use fleetdesk_domain::{Principal, UserRole};
use fleetdesk_persistence::Persistence;
use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ApiError, AuthError, role_label};

/// A caller whose role has been resolved for the current request.
///
/// `principal` is absent for callers the identity provider did not
/// authenticate; those always resolve to [`UserRole::Guest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's identity, if authenticated.
    pub principal: Option<Principal>,
    /// The caller's resolved role.
    pub role: UserRole,
}

impl AuthenticatedActor {
    /// Creates an actor for an authenticated principal.
    #[must_use]
    pub const fn new(principal: Principal, role: UserRole) -> Self {
        Self {
            principal: Some(principal),
            role,
        }
    }

    /// Creates an anonymous guest.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            principal: None,
            role: UserRole::Guest,
        }
    }

    /// Returns true if the caller is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Converts this caller into the actor a core command runs on behalf of.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationRequired` if the caller is anonymous.
    pub fn to_core_actor(&self, action: &str) -> Result<Actor, AuthError> {
        self.principal
            .clone()
            .map(|principal| Actor::new(principal, self.role))
            .ok_or_else(|| AuthError::AuthenticationRequired {
                action: action.to_string(),
            })
    }

    /// Returns the principal or fails for anonymous callers.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationRequired` if the caller is anonymous.
    pub fn require_principal(&self, action: &str) -> Result<&Principal, AuthError> {
        self.principal
            .as_ref()
            .ok_or_else(|| AuthError::AuthenticationRequired {
                action: action.to_string(),
            })
    }
}

/// Resolves the role of a caller once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleResolver {
    default_role: UserRole,
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new(UserRole::User)
    }
}

impl RoleResolver {
    /// Creates a resolver that grants `default_role` to authenticated
    /// principals without a stored role assignment.
    #[must_use]
    pub const fn new(default_role: UserRole) -> Self {
        Self { default_role }
    }

    /// Returns the role granted to principals without an assignment.
    #[must_use]
    pub const fn default_role(&self) -> UserRole {
        self.default_role
    }

    /// Resolves the caller's role.
    ///
    /// Anonymous callers are guests. A stored assignment wins over the
    /// default role. Resolved roles are cached under `CallerRole`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role lookup fails.
    pub fn resolve(
        &self,
        persistence: &mut Persistence,
        cache: &mut QueryCache,
        principal: Option<Principal>,
    ) -> Result<AuthenticatedActor, ApiError> {
        let Some(principal) = principal else {
            return Ok(AuthenticatedActor::guest());
        };

        let key: QueryKey = QueryKey::CallerRole(principal.clone());
        if let Some(role) = cache.get::<UserRole>(&key) {
            return Ok(AuthenticatedActor::new(principal, role));
        }

        let role: UserRole = persistence
            .get_role(&principal)?
            .unwrap_or(self.default_role);
        debug!(principal = %principal, role = %role, "Resolved caller role");
        cache.insert(key, role);
        Ok(AuthenticatedActor::new(principal, role))
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Admins satisfy every check that requires the user role.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the caller holds at least `required`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationRequired` for anonymous callers and
    /// `Unauthorized` for authenticated callers with too little privilege.
    pub fn require_role(
        actor: &AuthenticatedActor,
        required: UserRole,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role.satisfies(required) {
            return Ok(());
        }
        let err: AuthError = match actor.principal {
            None => AuthError::AuthenticationRequired {
                action: action.to_string(),
            },
            Some(_) => AuthError::Unauthorized {
                action: action.to_string(),
                required_role: role_label(required),
            },
        };
        warn!(
            principal = ?actor.principal.as_ref().map(Principal::as_str),
            role = %actor.role,
            action,
            "Rejected caller"
        );
        Err(err)
    }

    /// Checks if a caller may create a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_create_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "create_booking")
    }

    /// Checks if a caller may update a booking. Ownership is checked later.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_update_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "update_booking")
    }

    /// Checks if a caller may cancel a booking. Ownership is checked later.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_cancel_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "cancel_booking")
    }

    /// Checks if a caller may complete a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_complete_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::Admin, "complete_booking")
    }

    /// Checks if a caller may list their own bookings or read one booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_view_own_bookings(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "view_bookings")
    }

    /// Checks if a caller may list every booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_view_all_bookings(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::Admin, "view_all_bookings")
    }

    /// Checks if a caller may read the fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_view_vehicles(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "view_vehicles")
    }

    /// Checks if a caller may change the fleet.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_manage_fleet(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::Admin, action)
    }

    /// Checks if a caller may assign roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_assign_role(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::Admin, "assign_user_role")
    }

    /// Checks if a caller may save their own profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not at least a user.
    pub fn authorize_save_profile(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::User, "save_profile")
    }

    /// Checks if a caller may read the profile of `target`.
    ///
    /// Callers may always read their own profile; other profiles need admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is neither `target` nor an admin.
    pub fn authorize_view_profile(
        actor: &AuthenticatedActor,
        target: &Principal,
    ) -> Result<(), AuthError> {
        if actor.principal.as_ref() == Some(target) {
            return Ok(());
        }
        Self::require_role(actor, UserRole::Admin, "view_user_profile")
    }

    /// Checks if a caller may read the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin.
    pub fn authorize_view_dashboard(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_role(actor, UserRole::Admin, "view_dashboard")
    }
}
