// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::fare::FareInputs;
use crate::types::BookingDetails;

/// Validates a vehicle location.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocation` if the location is blank.
pub fn validate_location(location: &str) -> Result<(), DomainError> {
    if location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the descriptive fields of a booking.
///
/// All text fields are required.
///
/// # Errors
///
/// Returns `DomainError::InvalidBookingField` naming the first blank field.
pub fn validate_booking_details(details: &BookingDetails) -> Result<(), DomainError> {
    let fields: [(&'static str, &str); 5] = [
        ("pickup_location", &details.pickup_location),
        ("destination", &details.destination),
        ("vehicle_no", &details.vehicle_no),
        ("customer_name", &details.customer_name),
        ("customer_no", &details.customer_no),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidBookingField {
                field,
                reason: String::from("must not be empty"),
            });
        }
    }

    Ok(())
}

/// Validates everything a caller supplies for a booking.
///
/// # Errors
///
/// Returns an error if a text field is blank or a numeric input is negative.
pub fn validate_booking_input(
    details: &BookingDetails,
    fare_inputs: &FareInputs,
) -> Result<(), DomainError> {
    validate_booking_details(details)?;
    fare_inputs.validate()
}

/// Validates a profile display name.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is blank or longer than 100 characters.
pub fn validate_profile_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    if trimmed.chars().count() > 100 {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot exceed 100 characters",
        )));
    }
    Ok(())
}
