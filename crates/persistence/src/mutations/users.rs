// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role assignment and profile writes.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::upsert::excluded;
use fleetdesk_domain::{Principal, UserProfile, UserRole};
use tracing::info;

use crate::data_models::UserProfileRow;
use crate::diesel_schema::{role_assignments, user_profiles};
use crate::error::PersistenceError;

/// Stores `role` for `principal`, replacing any previous assignment.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_role(
    conn: &mut SqliteConnection,
    principal: &Principal,
    role: UserRole,
) -> Result<(), PersistenceError> {
    diesel::insert_into(role_assignments::table)
        .values((
            role_assignments::principal.eq(principal.as_str()),
            role_assignments::role.eq(role.as_str()),
        ))
        .on_conflict(role_assignments::principal)
        .do_update()
        .set(role_assignments::role.eq(excluded(role_assignments::role)))
        .execute(conn)?;

    info!(principal = %principal, role = %role, "Stored role assignment");
    Ok(())
}

/// Stores `profile`, replacing any previous profile of the same principal.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_profile(
    conn: &mut SqliteConnection,
    profile: &UserProfile,
) -> Result<(), PersistenceError> {
    let row: UserProfileRow = UserProfileRow {
        principal: profile.principal.as_str().to_string(),
        name: profile.name.clone(),
        job_role: profile.job_role.clone(),
    };

    diesel::insert_into(user_profiles::table)
        .values(&row)
        .on_conflict(user_profiles::principal)
        .do_update()
        .set((
            user_profiles::name.eq(excluded(user_profiles::name)),
            user_profiles::job_role.eq(excluded(user_profiles::job_role)),
        ))
        .execute(conn)?;

    info!(principal = %profile.principal, "Saved user profile");
    Ok(())
}
