// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{DomainError, Principal, Timestamp, UserRole, VehicleType};

#[test]
fn test_vehicle_type_parse_round_trip() {
    for vehicle_type in [
        VehicleType::Cab,
        VehicleType::Van,
        VehicleType::Truck,
        VehicleType::Bus,
    ] {
        assert_eq!(
            VehicleType::from_str(vehicle_type.as_str()).unwrap(),
            vehicle_type
        );
    }
}

#[test]
fn test_vehicle_type_is_a_closed_set() {
    assert_eq!(
        VehicleType::from_str("Cab"),
        Err(DomainError::InvalidVehicleType(String::from("Cab")))
    );
    assert!(serde_json::from_str::<VehicleType>("\"scooter\"").is_err());
}

#[test]
fn test_user_role_ordering() {
    assert!(UserRole::Admin.satisfies(UserRole::User));
    assert!(UserRole::Admin.satisfies(UserRole::Guest));
    assert!(UserRole::User.satisfies(UserRole::User));
    assert!(!UserRole::User.satisfies(UserRole::Admin));
    assert!(!UserRole::Guest.satisfies(UserRole::User));
}

#[test]
fn test_user_role_parse() {
    assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
    assert_eq!(UserRole::from_str("guest").unwrap(), UserRole::Guest);
    assert!(UserRole::from_str("root").is_err());
}

#[test]
fn test_principal_is_trimmed() {
    let principal = Principal::new("  rdmx6-jaaaa  ").unwrap();
    assert_eq!(principal.as_str(), "rdmx6-jaaaa");
}

#[test]
fn test_principal_rejects_blank_and_inner_whitespace() {
    assert!(matches!(
        Principal::new("   "),
        Err(DomainError::InvalidPrincipal(_))
    ));
    assert!(matches!(
        Principal::new("a b"),
        Err(DomainError::InvalidPrincipal(_))
    ));
}

#[test]
fn test_principal_deserialization_validates() {
    assert!(serde_json::from_str::<Principal>("\"\"").is_err());
    let principal: Principal = serde_json::from_str("\"staff-1\"").unwrap();
    assert_eq!(principal.to_string(), "staff-1");
}

#[test]
fn test_timestamp_formats_as_rfc3339() {
    let ts = Timestamp::from_nanos(1_767_225_600_000_000_000);
    assert_eq!(ts.to_rfc3339().as_deref(), Some("2026-01-01T00:00:00Z"));
}

#[test]
fn test_timestamp_now_is_after_2025() {
    assert!(Timestamp::now().nanos() > 1_735_689_600_000_000_000);
}
