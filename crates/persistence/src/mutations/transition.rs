// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Applies the entity changes produced by `fleetdesk::apply`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fleetdesk::{EntityChange, TransitionResult};
use fleetdesk_domain::{BookingId, VehicleId};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{BookingBody, BookingRecord, VehicleRecord};
use crate::diesel_schema::{bookings, vehicles};
use crate::error::PersistenceError;

/// Ids assigned by the store while persisting a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The id of the inserted booking, if the transition created one.
    pub booking_id: Option<BookingId>,
    /// The id of the inserted vehicle, if the transition created one.
    pub vehicle_id: Option<VehicleId>,
}

/// Writes every change of `result` inside a single transaction.
///
/// Either all changes are stored or none are.
///
/// # Errors
///
/// Returns an error if any write fails or an updated record no longer exists.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    let persisted: PersistTransitionResult = conn.transaction(|conn| {
        let mut persisted: PersistTransitionResult = PersistTransitionResult::default();
        for change in &result.changes {
            apply_change(conn, change, &mut persisted)?;
        }
        Ok::<_, PersistenceError>(persisted)
    })?;

    info!(
        changes = result.changes.len(),
        summary = %result.summary,
        "Persisted transition"
    );
    Ok(persisted)
}

fn apply_change(
    conn: &mut SqliteConnection,
    change: &EntityChange,
    persisted: &mut PersistTransitionResult,
) -> Result<(), PersistenceError> {
    match change {
        EntityChange::InsertVehicle(vehicle) => {
            diesel::insert_into(vehicles::table)
                .values(VehicleRecord::from(vehicle))
                .execute(conn)?;
            let id: VehicleId = VehicleId::new(conn.get_last_insert_rowid()?);
            debug!(vehicle_id = %id, "Inserted vehicle");
            persisted.vehicle_id = Some(id);
        }
        EntityChange::UpdateVehicle(vehicle) => {
            let updated: usize =
                diesel::update(vehicles::table.filter(vehicles::vehicle_id.eq(vehicle.id.value())))
                    .set(VehicleRecord::from(vehicle))
                    .execute(conn)?;
            require_row(updated, || format!("Vehicle {}", vehicle.id))?;
            debug!(vehicle_id = %vehicle.id, "Updated vehicle");
        }
        EntityChange::DeleteVehicle(id) => {
            let deleted: usize =
                diesel::delete(vehicles::table.filter(vehicles::vehicle_id.eq(id.value())))
                    .execute(conn)?;
            require_row(deleted, || format!("Vehicle {id}"))?;
            debug!(vehicle_id = %id, "Deleted vehicle");
        }
        EntityChange::InsertBooking(booking) => {
            diesel::insert_into(bookings::table)
                .values(BookingRecord::from(booking))
                .execute(conn)?;
            let id: BookingId = BookingId::new(conn.get_last_insert_rowid()?);
            debug!(booking_id = %id, principal = %booking.user, "Inserted booking");
            persisted.booking_id = Some(id);
        }
        EntityChange::UpdateBooking(booking) => {
            let updated: usize =
                diesel::update(bookings::table.filter(bookings::booking_id.eq(booking.id.value())))
                    .set(BookingBody::from(booking))
                    .execute(conn)?;
            require_row(updated, || format!("Booking {}", booking.id))?;
            debug!(booking_id = %booking.id, status = %booking.status, "Updated booking");
        }
    }
    Ok(())
}

fn require_row(affected: usize, what: impl FnOnce() -> String) -> Result<(), PersistenceError> {
    if affected == 0 {
        return Err(PersistenceError::MissingRow(what()));
    }
    Ok(())
}
