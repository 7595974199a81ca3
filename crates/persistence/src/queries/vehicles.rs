// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fleetdesk_domain::{Vehicle, VehicleId};
use tracing::debug;

use crate::data_models::VehicleRow;
use crate::diesel_schema::vehicles;
use crate::error::PersistenceError;

/// Lists every vehicle, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_vehicles(conn: &mut SqliteConnection) -> Result<Vec<Vehicle>, PersistenceError> {
    let rows: Vec<VehicleRow> = vehicles::table
        .order(vehicles::vehicle_id.asc())
        .select(VehicleRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded vehicles");
    rows.into_iter().map(Vehicle::try_from).collect()
}

/// Lists vehicles that are in the bookable pool, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_available_vehicles(
    conn: &mut SqliteConnection,
) -> Result<Vec<Vehicle>, PersistenceError> {
    let rows: Vec<VehicleRow> = vehicles::table
        .filter(vehicles::is_available.eq(1))
        .order(vehicles::vehicle_id.asc())
        .select(VehicleRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Vehicle::try_from).collect()
}

/// Looks up a vehicle by id.
///
/// Returns `Ok(None)` if it does not exist.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn get_vehicle(
    conn: &mut SqliteConnection,
    id: VehicleId,
) -> Result<Option<Vehicle>, PersistenceError> {
    vehicles::table
        .filter(vehicles::vehicle_id.eq(id.value()))
        .select(VehicleRow::as_select())
        .first(conn)
        .optional()?
        .map(Vehicle::try_from)
        .transpose()
}
