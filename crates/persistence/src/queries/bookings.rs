// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use fleetdesk_domain::{Booking, BookingId, Principal};
use tracing::debug;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Lists every booking, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded bookings");
    rows.into_iter().map(Booking::try_from).collect()
}

/// Lists the bookings created by `principal`, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_bookings_for_principal(
    conn: &mut SqliteConnection,
    principal: &Principal,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::principal.eq(principal.as_str()))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Booking::try_from).collect()
}

/// Looks up a booking by id.
///
/// Returns `Ok(None)` if it does not exist.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn get_booking(
    conn: &mut SqliteConnection,
    id: BookingId,
) -> Result<Option<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::booking_id.eq(id.value()))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?
        .map(Booking::try_from)
        .transpose()
}
