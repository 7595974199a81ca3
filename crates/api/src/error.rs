// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fleetdesk::CoreError;
use fleetdesk_domain::{DomainError, UserRole};
use fleetdesk_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller has no authenticated principal.
    AuthenticationRequired {
        /// The action that was attempted.
        action: String,
    },
    /// The caller's role does not permit the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired { action } => {
                write!(f, "Authentication required: '{action}' needs a signed-in caller")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller has no authenticated principal.
    AuthenticationRequired {
        /// The action that was attempted.
        action: String,
    },
    /// Authorization failed - the caller may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The resource is in a lifecycle state that does not allow the operation.
    InvalidState {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The operation conflicts with another entity.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired { action } => {
                write!(f, "Authentication required: '{action}' needs a signed-in caller")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired { action } => Self::AuthenticationRequired { action },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::VehicleNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Vehicle"),
            message,
        },
        DomainError::BookingNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message,
        },
        DomainError::InvalidStatusTransition { .. } | DomainError::BookingNotActive { .. } => {
            ApiError::InvalidState { message }
        }
        DomainError::NotBookingOwner { booking_id, .. } => ApiError::Unauthorized {
            action: format!("access booking {booking_id}"),
            required_role: String::from("owner or admin"),
        },
        DomainError::VehicleHasActiveBookings { .. } => ApiError::Conflict {
            rule: String::from("vehicle_in_use"),
            message,
        },
        DomainError::VehicleUnavailable(_) => ApiError::Conflict {
            rule: String::from("vehicle_available"),
            message,
        },
        DomainError::LastAdmin(_) => ApiError::Conflict {
            rule: String::from("last_admin"),
            message,
        },
        DomainError::InvalidVehicleType(_) => ApiError::InvalidInput {
            field: String::from("vehicleType"),
            message,
        },
        DomainError::InvalidBookingStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidUserRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message,
        },
        DomainError::InvalidPrincipal(_) => ApiError::InvalidInput {
            field: String::from("principal"),
            message,
        },
        DomainError::InvalidLocation(_) => ApiError::InvalidInput {
            field: String::from("currentLocation"),
            message,
        },
        DomainError::InvalidBookingField { field, .. }
        | DomainError::NegativeAmount { field, .. } => ApiError::InvalidInput {
            field: String::from(field),
            message,
        },
        DomainError::FareOverflow { .. } => ApiError::InvalidInput {
            field: String::from("fare"),
            message,
        },
        DomainError::InvalidName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Forbidden { command, required } => ApiError::Unauthorized {
            action: command.to_string(),
            required_role: role_label(required),
        },
    }
}

/// Capitalized role name used in authorization messages.
pub(crate) fn role_label(role: UserRole) -> String {
    match role {
        UserRole::Guest => String::from("Guest"),
        UserRole::User => String::from("User"),
        UserRole::Admin => String::from("Admin"),
    }
}
