// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::{Principal, UserRole};

use super::helpers::{ADMIN, admin, create_test_desk, staff};
use crate::{ApiError, AssignRoleRequest};

fn assign(role: UserRole) -> AssignRoleRequest {
    AssignRoleRequest { role }
}

#[test]
fn test_last_admin_cannot_step_down() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let me = Principal::new(ADMIN).unwrap();

    let result = desk.assign_caller_user_role(&admin, &me, assign(UserRole::User));
    assert!(
        matches!(result, Err(ApiError::Conflict { ref rule, .. }) if rule == "last_admin"),
        "{result:?}"
    );
    assert!(desk.resolve_caller(Some(ADMIN)).unwrap().is_admin());
}

#[test]
fn test_admin_may_step_down_once_another_admin_exists() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let me = Principal::new(ADMIN).unwrap();
    let deputy = Principal::new("deputy").unwrap();

    desk.assign_caller_user_role(&admin, &deputy, assign(UserRole::Admin))
        .unwrap();
    desk.assign_caller_user_role(&admin, &me, assign(UserRole::User))
        .unwrap();

    let demoted = desk.resolve_caller(Some(ADMIN)).unwrap();
    assert_eq!(demoted.role, UserRole::User);
    assert!(desk.get_dashboard_summary(&demoted).is_err());

    let deputy_actor = desk.resolve_caller(Some("deputy")).unwrap();
    assert!(deputy_actor.is_admin());
    let result = desk.assign_caller_user_role(&deputy_actor, &deputy, assign(UserRole::Guest));
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_assigning_guest_blocks_bookings() {
    let mut desk = create_test_desk();
    let admin = admin(&mut desk);
    let user = staff(&mut desk, "staff-1");
    assert!(desk.get_user_bookings(&user).is_ok());

    desk.assign_caller_user_role(
        &admin,
        &Principal::new("staff-1").unwrap(),
        assign(UserRole::Guest),
    )
    .unwrap();

    let downgraded = staff(&mut desk, "staff-1");
    assert_eq!(downgraded.role, UserRole::Guest);
    assert!(matches!(
        desk.get_user_bookings(&downgraded),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_seeding_is_idempotent() {
    let mut desk = create_test_desk();
    desk.seed_admins(&[Principal::new(ADMIN).unwrap()]).unwrap();
    assert!(admin(&mut desk).is_admin());
}
