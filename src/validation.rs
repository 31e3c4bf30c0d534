//! Presence and type checks for onboarding payloads.
//!
//! Runs before any external call. Numeric fields accept JSON integers, integral
//! floats (`30.0`) and numeric strings (`"30"`).

use crate::errors::AppError;
use crate::models::{ClientInput, NewClient};
use serde_json::Value;

/// Validate a raw payload into a [`ClientInput`].
///
/// All missing fields are reported together; malformed values are reported one
/// at a time in field order.
pub fn validate_client(payload: &NewClient) -> Result<ClientInput, AppError> {
    let missing: Vec<&str> = [
        ("name", payload.name.as_ref()),
        ("age", payload.age.as_ref()),
        ("income", payload.income.as_ref()),
        ("loans", payload.loans.as_ref()),
    ]
    .into_iter()
    .filter(|(_, value)| value.map_or(true, Value::is_null))
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    // Presence was checked above.
    let field = |value: &Option<Value>| value.clone().unwrap_or(Value::Null);

    let name = coerce_name(&field(&payload.name))?;
    let age = coerce_count("age", &field(&payload.age))?;
    if age == 0 {
        return Err(AppError::ValidationError(
            "age must be a positive integer".to_string(),
        ));
    }
    let income = coerce_count("income", &field(&payload.income))?;
    let loans = coerce_count("loans", &field(&payload.loans))?;

    Ok(ClientInput {
        name,
        age,
        income,
        loans,
    })
}

fn coerce_name(value: &Value) -> Result<String, AppError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(AppError::ValidationError(
            "name cannot be empty".to_string(),
        )),
        _ => Err(AppError::ValidationError(
            "name must be a string".to_string(),
        )),
    }
}

/// Coerce a JSON value into a non-negative integer.
fn coerce_count(field: &str, value: &Value) -> Result<u32, AppError> {
    let invalid = || {
        AppError::ValidationError(format!(
            "{} must be a non-negative integer, got {}",
            field, value
        ))
    };

    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).map_err(|_| invalid())
            } else if let Some(v) = n.as_f64() {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
                    Ok(v as u32)
                } else {
                    Err(invalid())
                }
            } else {
                Err(invalid())
            }
        }
        Value::String(s) => s.trim().parse::<u32>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
