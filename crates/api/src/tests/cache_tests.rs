// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk::{Command, EntityChange, TransitionResult};
use fleetdesk_domain::{
    BookingId, BookingPatch, Patch, Principal, UserRole, Vehicle, VehicleId, VehiclePatch,
    VehicleType,
};
use fleetdesk_persistence::PersistTransitionResult;

use super::helpers::{add_vehicle, admin, book, booking_request, create_test_desk, staff};
use crate::{
    ApiError, AssignRoleRequest, Invalidation, QueryCache, QueryKey, SaveProfileRequest,
    UpdateLocationRequest, invalidations_for,
};

#[test]
fn test_repeated_read_hits_cache() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    add_vehicle(&mut desk, &admin, VehicleType::Cab, "Depot A");

    let before = desk.cache_stats();
    desk.get_all_vehicles(&admin).unwrap();
    desk.get_all_vehicles(&admin).unwrap();
    let after = desk.cache_stats();

    assert_eq!(after.hits, before.hits + 1);
    assert!(desk.is_cached(&QueryKey::AllVehicles));
}

#[test]
fn test_read_after_booking_write_is_fresh() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let user = staff(&mut desk, "staff-1");
    let vehicle = add_vehicle(&mut desk, &admin, VehicleType::Cab, "Depot A");

    assert_eq!(desk.get_available_vehicles(&user).unwrap().len(), 1);
    assert!(desk.get_user_bookings(&user).unwrap().is_empty());
    assert!(desk.get_all_bookings(&admin).unwrap().is_empty());
    assert!(desk.get_vehicle(&user, vehicle).unwrap().unwrap().is_available);

    let booking = book(&mut desk, &user, vehicle);
    assert!(desk.get_available_vehicles(&user).unwrap().is_empty());
    assert_eq!(desk.get_user_bookings(&user).unwrap().len(), 1);
    assert_eq!(desk.get_all_bookings(&admin).unwrap().len(), 1);
    assert!(!desk.get_vehicle(&user, vehicle).unwrap().unwrap().is_available);

    let before = desk.get_booking(&user, booking).unwrap().unwrap();
    assert_eq!(before.toll_tax, 20);
    desk.update_booking(
        &user,
        booking,
        BookingPatch {
            toll_tax: Patch::Set(0),
            ..BookingPatch::default()
        },
    )
    .unwrap();
    let after = desk.get_booking(&user, booking).unwrap().unwrap();
    assert_eq!(after.toll_tax, 0);
    assert_eq!(after.net_amount, 495);
    assert_eq!(desk.get_user_bookings(&user).unwrap()[0].net_amount, 495);

    desk.cancel_booking(&user, booking).unwrap();
    assert_eq!(desk.get_available_vehicles(&user).unwrap().len(), 1);
}

#[test]
fn test_read_after_fleet_write_is_fresh() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let vehicle = add_vehicle(&mut desk, &admin, VehicleType::Cab, "Depot A");

    assert_eq!(
        desk.get_vehicle(&admin, vehicle).unwrap().unwrap().current_location,
        "Depot A"
    );
    assert_eq!(desk.get_dashboard_summary(&admin).unwrap().total_vehicles, 1);

    desk.update_vehicle_location(
        &admin,
        vehicle,
        UpdateLocationRequest {
            location: String::from("Depot B"),
        },
    )
    .unwrap();
    assert_eq!(
        desk.get_vehicle(&admin, vehicle).unwrap().unwrap().current_location,
        "Depot B"
    );

    add_vehicle(&mut desk, &admin, VehicleType::Van, "Depot C");
    assert_eq!(desk.get_dashboard_summary(&admin).unwrap().total_vehicles, 2);
    assert_eq!(desk.get_all_vehicles(&admin).unwrap().len(), 2);

    desk.delete_vehicle(&admin, vehicle).unwrap();
    assert!(desk.get_vehicle(&admin, vehicle).unwrap().is_none());
    assert_eq!(desk.get_all_vehicles(&admin).unwrap().len(), 1);
}

#[test]
fn test_read_after_role_and_profile_write_is_fresh() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let user = staff(&mut desk, "staff-1");
    let principal = Principal::new("staff-1").unwrap();

    assert_eq!(desk.get_caller_user_profile(&user).unwrap(), None);
    desk.save_caller_user_profile(
        &user,
        &SaveProfileRequest {
            name: String::from("Asha"),
            job_role: String::from("Dispatcher"),
        },
    )
    .unwrap();
    let profile = desk.get_caller_user_profile(&user).unwrap().unwrap();
    assert_eq!(profile.name, "Asha");

    let result = desk
        .assign_caller_user_role(
            &admin,
            &principal,
            AssignRoleRequest {
                role: UserRole::Admin,
            },
        )
        .unwrap();
    assert_eq!(
        result.invalidated,
        vec![Invalidation::Key(QueryKey::CallerRole(principal.clone()))]
    );
    let promoted = desk.resolve_caller(Some("staff-1")).unwrap();
    assert_eq!(promoted.role, UserRole::Admin);
}

#[test]
fn test_failed_write_invalidates_nothing() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let user = staff(&mut desk, "staff-1");
    let vehicle = add_vehicle(&mut desk, &admin, VehicleType::Cab, "Depot A");
    book(&mut desk, &user, vehicle);

    desk.get_all_vehicles(&admin).unwrap();
    desk.get_all_bookings(&admin).unwrap();
    assert!(desk.is_cached(&QueryKey::AllVehicles));

    let result = desk.delete_vehicle(&admin, vehicle);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
    assert!(desk.is_cached(&QueryKey::AllVehicles));
    assert!(desk.is_cached(&QueryKey::AllBookings));

    let result = desk.create_booking(&user, booking_request(vehicle));
    assert!(result.is_err());
    assert!(desk.is_cached(&QueryKey::AllVehicles));
    assert_eq!(desk.get_all_bookings(&admin).unwrap().len(), 1);
}

#[test]
fn test_authorization_precedes_cache_lookup() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let user = staff(&mut desk, "staff-1");

    desk.get_all_bookings(&admin).unwrap();
    desk.get_dashboard_summary(&admin).unwrap();
    assert!(desk.is_cached(&QueryKey::AllBookings));

    assert!(matches!(
        desk.get_all_bookings(&user),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        desk.get_dashboard_summary(&user),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_cached_booking_still_checks_ownership() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let owner = staff(&mut desk, "staff-1");
    let other = staff(&mut desk, "staff-2");
    let vehicle = add_vehicle(&mut desk, &admin, VehicleType::Cab, "Depot A");
    let booking = book(&mut desk, &owner, vehicle);

    desk.get_booking(&owner, booking).unwrap();
    assert!(desk.is_cached(&QueryKey::Booking(booking)));
    assert!(matches!(
        desk.get_booking(&other, booking),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_all_user_bookings_matches_every_principal() {
    let staff_one = QueryKey::UserBookings(Principal::new("staff-1").unwrap());
    let staff_two = QueryKey::UserBookings(Principal::new("staff-2").unwrap());
    assert!(Invalidation::AllUserBookings.matches(&staff_one));
    assert!(Invalidation::AllUserBookings.matches(&staff_two));
    assert!(!Invalidation::AllUserBookings.matches(&QueryKey::AllBookings));
    assert!(Invalidation::Key(QueryKey::AllBookings).matches(&QueryKey::AllBookings));
}

#[test]
fn test_invalidate_removes_only_matching_entries() {
    let mut cache = QueryCache::new();
    cache.insert(QueryKey::AllVehicles, Vec::<Vehicle>::new());
    cache.insert(QueryKey::CallerRole(Principal::new("a").unwrap()), UserRole::User);

    let removed = cache.invalidate(&[QueryKey::AllVehicles.into()]);
    assert_eq!(removed, 1);
    assert!(!cache.contains(&QueryKey::AllVehicles));
    assert!(cache.contains(&QueryKey::CallerRole(Principal::new("a").unwrap())));
}

#[test]
fn test_mismatched_value_type_is_a_miss() {
    let mut cache = QueryCache::new();
    cache.insert(QueryKey::DashboardSummary, UserRole::Admin);
    assert_eq!(cache.get::<Vec<Vehicle>>(&QueryKey::DashboardSummary), None);
    assert_eq!(cache.stats().misses, 1);
}

fn vehicle(id: i64, is_available: bool) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        vehicle_type: VehicleType::Cab,
        is_available,
        current_location: String::from("Depot A"),
    }
}

#[test]
fn test_booking_move_invalidates_both_vehicles() {
    let command = Command::UpdateBooking {
        booking_id: BookingId::new(3),
        patch: BookingPatch {
            vehicle_id: Patch::Set(VehicleId::new(2)),
            ..BookingPatch::default()
        },
    };
    let result = TransitionResult {
        changes: vec![
            EntityChange::UpdateVehicle(vehicle(2, false)),
            EntityChange::UpdateVehicle(vehicle(1, true)),
        ],
        summary: String::from("Updated booking 3"),
    };
    let keys = invalidations_for(
        &command,
        Some(VehicleId::new(1)),
        &result,
        &PersistTransitionResult::default(),
    );

    for expected in [
        Invalidation::AllUserBookings,
        QueryKey::AllBookings.into(),
        QueryKey::Booking(BookingId::new(3)).into(),
        QueryKey::AvailableVehicles.into(),
        QueryKey::AllVehicles.into(),
        QueryKey::Vehicle(VehicleId::new(1)).into(),
        QueryKey::Vehicle(VehicleId::new(2)).into(),
        QueryKey::DashboardSummary.into(),
    ] {
        assert!(keys.contains(&expected), "missing {expected:?} in {keys:?}");
    }
}

#[test]
fn test_vehicle_update_does_not_invalidate_bookings() {
    let command = Command::UpdateVehicle {
        vehicle_id: VehicleId::new(4),
        patch: VehiclePatch::default(),
    };
    let result = TransitionResult {
        changes: vec![EntityChange::UpdateVehicle(vehicle(4, true))],
        summary: String::from("Updated vehicle 4"),
    };
    let keys = invalidations_for(&command, None, &result, &PersistTransitionResult::default());

    assert!(!keys.contains(&Invalidation::AllUserBookings));
    assert!(!keys.contains(&QueryKey::AllBookings.into()));
    assert!(keys.contains(&QueryKey::Vehicle(VehicleId::new(4)).into()));
    assert!(keys.contains(&QueryKey::DashboardSummary.into()));
}

#[test]
fn test_added_vehicle_uses_assigned_id() {
    let command = Command::AddVehicle {
        vehicle_type: VehicleType::Bus,
        current_location: String::from("Depot A"),
    };
    let result = TransitionResult {
        changes: Vec::new(),
        summary: String::new(),
    };
    let persisted = PersistTransitionResult {
        booking_id: None,
        vehicle_id: Some(VehicleId::new(9)),
    };
    let keys = invalidations_for(&command, None, &result, &persisted);
    assert!(keys.contains(&QueryKey::Vehicle(VehicleId::new(9)).into()));
}

#[test]
fn test_query_keys_serialize_for_subscribers() {
    let json = serde_json::to_value(Invalidation::Key(QueryKey::Vehicle(VehicleId::new(7)))).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"scope": "key", "key": {"query": "vehicle", "key": 7}})
    );
    let json = serde_json::to_value(Invalidation::AllUserBookings).unwrap();
    assert_eq!(json, serde_json::json!({"scope": "allUserBookings"}));
}
