// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip fare derivation.
//!
//! The derived amounts are a pure function of the five odometer and tariff
//! inputs. Bookings store both so the amounts can be displayed without
//! recomputation, and every create or update recomputes them.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Odometer readings and tariff components entered for a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FareInputs {
    /// Odometer reading at pickup.
    pub starting_km: i64,
    /// Odometer reading at drop-off.
    pub ending_km: i64,
    /// Tariff per kilometre.
    pub rate_per_km: i64,
    /// Toll tax deducted from the gross amount.
    pub toll_tax: i64,
    /// Fuel paid directly by the customer, deducted from the gross amount.
    pub diesel_or_gas_by_customer: i64,
}

/// Amounts derived from [`FareInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fare {
    /// Distance travelled; never negative.
    pub total_km: i64,
    /// `total_km × rate_per_km`.
    pub total_amount: i64,
    /// `total_amount − toll_tax − diesel_or_gas_by_customer`; may be negative.
    pub net_amount: i64,
}

impl FareInputs {
    /// Checks that every input is non-negative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeAmount` naming the first negative field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields: [(&'static str, i64); 5] = [
            ("starting_km", self.starting_km),
            ("ending_km", self.ending_km),
            ("rate_per_km", self.rate_per_km),
            ("toll_tax", self.toll_tax),
            ("diesel_or_gas_by_customer", self.diesel_or_gas_by_customer),
        ];
        match fields.into_iter().find(|(_, value)| *value < 0) {
            Some((field, value)) => Err(DomainError::NegativeAmount { field, value }),
            None => Ok(()),
        }
    }
}

/// Derives distance, gross amount and net amount from the trip inputs.
///
/// A drop in the odometer reading yields zero distance rather than an error.
/// The net amount is not clamped.
///
/// # Errors
///
/// Returns `DomainError::FareOverflow` if an intermediate result does not fit
/// in an `i64`.
pub fn derive_fare(inputs: &FareInputs) -> Result<Fare, DomainError> {
    let total_km: i64 = inputs
        .ending_km
        .checked_sub(inputs.starting_km)
        .ok_or(DomainError::FareOverflow {
            operation: "computing total distance",
        })?
        .max(0);

    let total_amount: i64 =
        total_km
            .checked_mul(inputs.rate_per_km)
            .ok_or(DomainError::FareOverflow {
                operation: "computing total amount",
            })?;

    let net_amount: i64 = total_amount
        .checked_sub(inputs.toll_tax)
        .and_then(|v| v.checked_sub(inputs.diesel_or_gas_by_customer))
        .ok_or(DomainError::FareOverflow {
            operation: "computing net amount",
        })?;

    Ok(Fare {
        total_km,
        total_amount,
        net_amount,
    })
}
