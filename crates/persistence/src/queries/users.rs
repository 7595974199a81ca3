// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role assignment and profile lookups.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fleetdesk_domain::{Principal, UserProfile, UserRole};

use crate::data_models::{RoleAssignmentRow, UserProfileRow};
use crate::diesel_schema::{role_assignments, user_profiles};
use crate::error::PersistenceError;

/// Returns the stored role of `principal`, if one was assigned.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is invalid.
pub fn get_role(
    conn: &mut SqliteConnection,
    principal: &Principal,
) -> Result<Option<UserRole>, PersistenceError> {
    role_assignments::table
        .filter(role_assignments::principal.eq(principal.as_str()))
        .select(RoleAssignmentRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| row.role())
        .transpose()
}

/// Lists every principal assigned the admin role.
///
/// # Errors
///
/// Returns an error if the query fails or a stored principal is invalid.
pub fn list_admins(conn: &mut SqliteConnection) -> Result<Vec<Principal>, PersistenceError> {
    let principals: Vec<String> = role_assignments::table
        .filter(role_assignments::role.eq(UserRole::Admin.as_str()))
        .order(role_assignments::principal.asc())
        .select(role_assignments::principal)
        .load(conn)?;
    principals
        .iter()
        .map(|p| {
            Principal::new(p).map_err(|e| PersistenceError::InvalidRecord(e.to_string()))
        })
        .collect()
}

/// Returns the profile of `principal`, if one was saved.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn get_profile(
    conn: &mut SqliteConnection,
    principal: &Principal,
) -> Result<Option<UserProfile>, PersistenceError> {
    user_profiles::table
        .filter(user_profiles::principal.eq(principal.as_str()))
        .select(UserProfileRow::as_select())
        .first(conn)
        .optional()?
        .map(UserProfile::try_from)
        .transpose()
}
