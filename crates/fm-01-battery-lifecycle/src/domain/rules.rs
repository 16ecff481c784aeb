//! Field validation shared by create and update.

use fleet_types::{Battery, FleetError};

/// Upper bound of percentage fields.
pub const MAX_PERCENT: f64 = 100.0;

/// Trimmed copy of a required text field; rejects blank input.
pub fn require_text(field: &str, value: &str) -> Result<String, FleetError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FleetError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// `value` must be a finite percentage in `[0, 100]`.
pub fn check_percentage(field: &str, value: f64) -> Result<(), FleetError> {
    if !value.is_finite() || !(0.0..=MAX_PERCENT).contains(&value) {
        return Err(FleetError::invalid(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// `value` must be finite and strictly positive.
pub fn check_positive(field: &str, value: f64) -> Result<(), FleetError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FleetError::invalid(format!(
            "{field} must be greater than 0, got {value}"
        )));
    }
    Ok(())
}

/// Check every field-level invariant of a battery about to be stored.
pub fn validate_battery(battery: &Battery) -> Result<(), FleetError> {
    for (field, value) in [
        ("serialNumber", &battery.serial_number),
        ("model", &battery.model),
        ("manufacturer", &battery.manufacturer),
        ("location", &battery.location),
    ] {
        require_text(field, value)?;
    }
    check_positive("capacity", battery.capacity)?;
    check_positive("voltage", battery.voltage)?;
    check_percentage("healthStatus", battery.health_status)?;
    check_percentage("currentCharge", battery.current_charge)?;
    Ok(())
}
