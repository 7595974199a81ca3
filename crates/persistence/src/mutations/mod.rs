// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `transition`: applies the entity changes of a core transition atomically
//! - `users`: role assignments and profiles

pub mod transition;
pub mod users;

pub use transition::{PersistTransitionResult, persist_transition};
pub use users::{save_profile, set_role};
