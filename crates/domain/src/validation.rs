use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::{GymError, Name};

pub const MAX_WEIGHT: f64 = 300.0;
pub const MAX_HEIGHT: f64 = 3.0;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").ok());

/// Check the contact details of a new member and return the validated name.
pub fn validate_member_fields(name: &str, email: &str, phone: &str) -> Result<Name, GymError> {
    let name = Name::new(name)?;
    validate_email(email)?;
    validate_phone(phone)?;
    Ok(name)
}

pub fn validate_email(email: &str) -> Result<(), GymError> {
    if is_match(&EMAIL_PATTERN, email) {
        Ok(())
    } else {
        Err(GymError::invalid_data("email", "invalid email format"))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), GymError> {
    if is_match(&PHONE_PATTERN, phone) {
        Ok(())
    } else {
        Err(GymError::invalid_data("phone", "invalid phone format"))
    }
}

fn is_match(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

pub fn validate_measurements(weight: f64, height: f64) -> Result<(), GymError> {
    if !weight.is_finite() || !height.is_finite() {
        return Err(GymError::invalid_data(
            "measurements",
            "must be numeric values",
        ));
    }

    if weight <= 0.0 || weight > MAX_WEIGHT {
        return Err(GymError::invalid_data(
            "weight",
            format!("must be between 0 and {MAX_WEIGHT} kg"),
        ));
    }

    if height <= 0.0 || height > MAX_HEIGHT {
        return Err(GymError::invalid_data(
            "height",
            format!("must be between 0 and {MAX_HEIGHT} m"),
        ));
    }

    Ok(())
}

/// Parse a decimal number entered by a user, accepting a comma as decimal separator.
pub fn parse_measurement(field: &str, value: &str) -> Result<f64, GymError> {
    value
        .replace(',', ".")
        .trim()
        .parse::<f64>()
        .map_err(|_| GymError::invalid_data(field, "must be a decimal number"))
}

/// Parse a date (`YYYY-MM-DD`) or date and time (`YYYY-MM-DD HH:MM`) that must not lie in the
/// future.
pub fn validate_date(value: &str) -> Result<NaiveDateTime, GymError> {
    let value = value.trim();
    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| GymError::invalid_data("date", "invalid date"))?;

    if parsed > Local::now().naive_local() {
        return Err(GymError::invalid_data("date", "must not be in the future"));
    }

    Ok(parsed)
}
