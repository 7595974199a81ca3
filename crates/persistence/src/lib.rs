// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Fleetdesk.
//!
//! Vehicles, bookings, role assignments and user profiles are stored in
//! `SQLite` through Diesel. Migrations are embedded and run when the adapter
//! is constructed.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fleetdesk::{State, TransitionResult};
use fleetdesk_domain::{
    Booking, BookingId, Principal, UserProfile, UserRole, Vehicle, VehicleId,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;

use backend::PersistenceBackend;

/// Persistence adapter for the fleet and its bookings.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_fleet_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path
            .as_ref()
            .to_str()
            .ok_or(PersistenceError::InvalidPath)?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Loads every vehicle and booking for evaluating a command.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn load_state(&mut self) -> Result<State, PersistenceError> {
        let vehicles: Vec<Vehicle> = queries::list_vehicles(&mut self.conn)?;
        let bookings: Vec<Booking> = queries::list_bookings(&mut self.conn)?;
        debug!(
            vehicles = vehicles.len(),
            bookings = bookings.len(),
            "Loaded state"
        );
        Ok(State::new(vehicles, bookings))
    }

    /// Persists the changes of a transition atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; nothing is written in that case.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    // ========================================================================
    // Vehicles
    // ========================================================================

    /// Lists every vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_vehicles(&mut self) -> Result<Vec<Vehicle>, PersistenceError> {
        queries::list_vehicles(&mut self.conn)
    }

    /// Lists bookable vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_available_vehicles(&mut self) -> Result<Vec<Vehicle>, PersistenceError> {
        queries::list_available_vehicles(&mut self.conn)
    }

    /// Looks up a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_vehicle(&mut self, id: VehicleId) -> Result<Option<Vehicle>, PersistenceError> {
        queries::get_vehicle(&mut self.conn, id)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Lists every booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(&mut self) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings(&mut self.conn)
    }

    /// Lists the bookings created by `principal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_for_principal(
        &mut self,
        principal: &Principal,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_for_principal(&mut self.conn, principal)
    }

    /// Looks up a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_booking(&mut self, id: BookingId) -> Result<Option<Booking>, PersistenceError> {
        queries::get_booking(&mut self.conn, id)
    }

    // ========================================================================
    // Roles & Profiles
    // ========================================================================

    /// Returns the stored role of `principal`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_role(&mut self, principal: &Principal) -> Result<Option<UserRole>, PersistenceError> {
        queries::get_role(&mut self.conn, principal)
    }

    /// Lists every principal holding the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_admins(&mut self) -> Result<Vec<Principal>, PersistenceError> {
        queries::list_admins(&mut self.conn)
    }

    /// Stores the role of `principal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_role(&mut self, principal: &Principal, role: UserRole) -> Result<(), PersistenceError> {
        mutations::set_role(&mut self.conn, principal, role)
    }

    /// Returns the profile of `principal`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile(
        &mut self,
        principal: &Principal,
    ) -> Result<Option<UserProfile>, PersistenceError> {
        queries::get_profile(&mut self.conn, principal)
    }

    /// Stores a profile, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_profile(&mut self, profile: &UserProfile) -> Result<(), PersistenceError> {
        mutations::save_profile(&mut self.conn, profile)
    }
}
