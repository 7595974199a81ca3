// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory query cache with explicit invalidation.
//!
//! Every read is keyed by a [`QueryKey`]. Successful commands return the
//! list of [`Invalidation`]s they make stale; the caller applies that list
//! before serving any further read.

use std::collections::HashMap;

use fleetdesk::{Command, TransitionResult};
use fleetdesk_domain::{
    Booking, BookingId, DashboardSummary, Principal, UserProfile, UserRole, Vehicle, VehicleId,
};
use fleetdesk_persistence::PersistTransitionResult;
use serde::Serialize;
use tracing::debug;

/// Identity of a cached read query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "query", content = "key", rename_all = "camelCase")]
pub enum QueryKey {
    /// Bookings owned by one principal.
    UserBookings(Principal),
    /// Every booking.
    AllBookings,
    /// One booking.
    Booking(BookingId),
    /// Vehicles currently available.
    AvailableVehicles,
    /// Every vehicle.
    AllVehicles,
    /// One vehicle.
    Vehicle(VehicleId),
    /// The resolved role of a principal.
    CallerRole(Principal),
    /// The profile of a principal.
    Profile(Principal),
    /// The administrator dashboard figures.
    DashboardSummary,
}

/// A stale-marking produced by a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "key", rename_all = "camelCase")]
pub enum Invalidation {
    /// Exactly one key.
    Key(QueryKey),
    /// Every `UserBookings` key, whatever the principal.
    AllUserBookings,
}

impl Invalidation {
    /// Returns true if `key` is made stale by this invalidation.
    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Key(k) => k == key,
            Self::AllUserBookings => matches!(key, QueryKey::UserBookings(_)),
        }
    }
}

impl From<QueryKey> for Invalidation {
    fn from(key: QueryKey) -> Self {
        Self::Key(key)
    }
}

/// A cached query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Bookings(Vec<Booking>),
    Booking(Booking),
    Vehicles(Vec<Vehicle>),
    Vehicle(Vehicle),
    Role(UserRole),
    Profile(Option<UserProfile>),
    Dashboard(DashboardSummary),
}

/// A value that can be stored in the [`QueryCache`].
pub trait Cacheable: Sized {
    /// Wraps the value for storage.
    fn into_cached(self) -> CachedValue;
    /// Unwraps a stored value of the matching kind.
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_cached(self) -> CachedValue {
                CachedValue::$variant(self)
            }

            fn from_cached(value: &CachedValue) -> Option<Self> {
                match value {
                    CachedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Vec<Booking>, Bookings);
cacheable!(Booking, Booking);
cacheable!(Vec<Vehicle>, Vehicles);
cacheable!(Vehicle, Vehicle);
cacheable!(UserRole, Role);
cacheable!(Option<UserProfile>, Profile);
cacheable!(DashboardSummary, Dashboard);

/// Hit and miss counters of a [`QueryCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Query results keyed by [`QueryKey`].
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CachedValue>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, if present and of type `T`.
    pub fn get<T: Cacheable>(&mut self, key: &QueryKey) -> Option<T> {
        let value: Option<T> = self.entries.get(key).and_then(T::from_cached);
        if value.is_some() {
            self.hits += 1;
            debug!(?key, "Query cache hit");
        } else {
            self.misses += 1;
            debug!(?key, "Query cache miss");
        }
        value
    }

    /// Stores `value` under `key`.
    pub fn insert<T: Cacheable>(&mut self, key: QueryKey, value: T) {
        self.entries.insert(key, value.into_cached());
    }

    /// Drops every entry matched by `invalidations`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, invalidations: &[Invalidation]) -> usize {
        let before: usize = self.entries.len();
        self.entries
            .retain(|key, _| !invalidations.iter().any(|inv| inv.matches(key)));
        let removed: usize = before - self.entries.len();
        debug!(
            invalidations = invalidations.len(),
            removed, "Invalidated query cache"
        );
        removed
    }

    /// Returns true if `key` has a cached value.
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

/// Computes the keys a persisted command makes stale.
///
/// `previous_vehicle` is the vehicle a booking used before the command, if
/// the command targets an existing booking.
#[must_use]
pub fn invalidations_for(
    command: &Command,
    previous_vehicle: Option<VehicleId>,
    result: &TransitionResult,
    persisted: &PersistTransitionResult,
) -> Vec<Invalidation> {
    let mut out: Vec<Invalidation> = Vec::new();

    let booking_id: Option<BookingId> = match command {
        Command::CreateBooking { .. } => persisted.booking_id,
        Command::UpdateBooking { booking_id, .. }
        | Command::CancelBooking { booking_id }
        | Command::CompleteBooking { booking_id } => Some(*booking_id),
        _ => None,
    };
    let touches_bookings: bool = booking_id.is_some()
        || matches!(command, Command::DeleteVehicle { .. });

    if touches_bookings {
        out.push(Invalidation::AllUserBookings);
        out.push(QueryKey::AllBookings.into());
    }
    if let Some(id) = booking_id {
        out.push(QueryKey::Booking(id).into());
    }

    out.push(QueryKey::AvailableVehicles.into());
    out.push(QueryKey::AllVehicles.into());

    let mut vehicles: Vec<VehicleId> = result.touched_vehicles();
    let targeted: Option<VehicleId> = match command {
        Command::AddVehicle { .. } => persisted.vehicle_id,
        Command::CreateBooking { vehicle_id, .. }
        | Command::DeleteVehicle { vehicle_id }
        | Command::UpdateVehicle { vehicle_id, .. }
        | Command::SetVehicleAvailability { vehicle_id, .. }
        | Command::UpdateVehicleLocation { vehicle_id, .. } => Some(*vehicle_id),
        _ => None,
    };
    for id in targeted.into_iter().chain(previous_vehicle) {
        if !vehicles.contains(&id) {
            vehicles.push(id);
        }
    }
    out.extend(vehicles.into_iter().map(|id| QueryKey::Vehicle(id).into()));

    out.push(QueryKey::DashboardSummary.into());
    out
}
