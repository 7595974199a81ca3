// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partial updates.
//!
//! A [`Patch`] distinguishes "not provided" from "explicitly cleared" from
//! "set to a value". Every field of a booking or vehicle is required, so both
//! `Unset` and `Clear` leave the stored value untouched; only `Set` changes it.

use serde::{Deserialize, Deserializer};

use crate::fare::FareInputs;
use crate::types::{BookingDetails, Timestamp, VehicleId, VehicleType};

/// A single field of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not provided.
    Unset,
    /// The field was provided as an explicit null.
    Clear,
    /// The field was provided with a value.
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Patch<T> {
    /// Returns the new value if one was provided.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            Self::Unset | Self::Clear => None,
        }
    }
}

impl<T: Clone + PartialEq> Patch<T> {
    /// Writes the patched value into `target`.
    ///
    /// Returns true if `target` changed.
    pub fn apply_to(&self, target: &mut T) -> bool {
        match self {
            Self::Set(v) if v != target => {
                *target = v.clone();
                true
            }
            _ => false,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

/// Deserializes a present field as `Clear` (null) or `Set`; pair with
/// `#[serde(default)]` so absent fields stay `Unset`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Into::into)
    }
}

/// Partial update of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(default)]
    pub vehicle_id: Patch<VehicleId>,
    #[serde(default)]
    pub date_time: Patch<Timestamp>,
    #[serde(default)]
    pub pickup_location: Patch<String>,
    #[serde(default)]
    pub destination: Patch<String>,
    #[serde(default)]
    pub vehicle_no: Patch<String>,
    #[serde(default)]
    pub customer_name: Patch<String>,
    #[serde(default)]
    pub customer_no: Patch<String>,
    #[serde(default)]
    pub starting_km: Patch<i64>,
    #[serde(default)]
    pub ending_km: Patch<i64>,
    #[serde(default)]
    pub rate_per_km: Patch<i64>,
    #[serde(default)]
    pub toll_tax: Patch<i64>,
    #[serde(default)]
    pub diesel_or_gas_by_customer: Patch<i64>,
}

impl BookingPatch {
    /// Applies the descriptive fields to `details`.
    pub fn apply_details(&self, details: &mut BookingDetails) {
        self.date_time.apply_to(&mut details.date_time);
        self.pickup_location.apply_to(&mut details.pickup_location);
        self.destination.apply_to(&mut details.destination);
        self.vehicle_no.apply_to(&mut details.vehicle_no);
        self.customer_name.apply_to(&mut details.customer_name);
        self.customer_no.apply_to(&mut details.customer_no);
    }

    /// Applies the fare inputs to `inputs`.
    ///
    /// Returns true if any of the five inputs changed.
    pub fn apply_fare_inputs(&self, inputs: &mut FareInputs) -> bool {
        self.starting_km.apply_to(&mut inputs.starting_km)
            | self.ending_km.apply_to(&mut inputs.ending_km)
            | self.rate_per_km.apply_to(&mut inputs.rate_per_km)
            | self.toll_tax.apply_to(&mut inputs.toll_tax)
            | self
                .diesel_or_gas_by_customer
                .apply_to(&mut inputs.diesel_or_gas_by_customer)
    }
}

/// Partial update of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePatch {
    #[serde(default)]
    pub vehicle_type: Patch<VehicleType>,
    #[serde(default)]
    pub current_location: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_and_clear_leave_value_unchanged() {
        let mut value = String::from("Depot A");
        assert!(!Patch::<String>::Unset.apply_to(&mut value));
        assert!(!Patch::<String>::Clear.apply_to(&mut value));
        assert_eq!(value, "Depot A");
    }

    #[test]
    fn test_set_reports_change_only_when_different() {
        let mut value: i64 = 10;
        assert!(!Patch::Set(10).apply_to(&mut value));
        assert!(Patch::Set(12).apply_to(&mut value));
        assert_eq!(value, 12);
    }

    #[test]
    fn test_json_distinguishes_absent_null_and_value() {
        let patch: BookingPatch =
            serde_json::from_str(r#"{"destination": null, "tollTax": 40}"#).unwrap();
        assert_eq!(patch.destination, Patch::Clear);
        assert_eq!(patch.toll_tax, Patch::Set(40));
        assert_eq!(patch.pickup_location, Patch::Unset);
        assert_eq!(patch.vehicle_id, Patch::Unset);
    }

    #[test]
    fn test_apply_fare_inputs_detects_changes() {
        let mut inputs = FareInputs {
            starting_km: 100,
            ending_km: 150,
            rate_per_km: 10,
            toll_tax: 20,
            diesel_or_gas_by_customer: 5,
        };
        let unchanged = BookingPatch {
            ending_km: Patch::Set(150),
            ..BookingPatch::default()
        };
        assert!(!unchanged.apply_fare_inputs(&mut inputs));

        let changed = BookingPatch {
            ending_km: Patch::Set(180),
            toll_tax: Patch::Clear,
            ..BookingPatch::default()
        };
        assert!(changed.apply_fare_inputs(&mut inputs));
        assert_eq!(inputs.ending_km, 180);
        assert_eq!(inputs.toll_tax, 20);
    }

    #[test]
    fn test_apply_details_writes_only_set_fields() {
        let mut details = BookingDetails {
            date_time: Timestamp::from_nanos(1_000),
            pickup_location: String::from("Depot A"),
            destination: String::from("Airport"),
            vehicle_no: String::from("KA-01-1234"),
            customer_name: String::from("R. Iyer"),
            customer_no: String::from("555-0100"),
        };
        let patch = BookingPatch {
            destination: Patch::Clear,
            pickup_location: Patch::Set(String::from("Depot B")),
            date_time: Patch::Set(Timestamp::from_nanos(2_000)),
            ..BookingPatch::default()
        };
        patch.apply_details(&mut details);
        assert_eq!(details.pickup_location, "Depot B");
        assert_eq!(details.destination, "Airport");
        assert_eq!(details.date_time, Timestamp::from_nanos(2_000));
        assert_eq!(details.customer_no, "555-0100");
    }

    #[test]
    fn test_vehicle_patch_rejects_unknown_type() {
        let result: Result<VehiclePatch, _> = serde_json::from_str(r#"{"vehicleType": "boat"}"#);
        assert!(result.is_err());
    }
}
