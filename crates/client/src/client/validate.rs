//! Cheap local checks that run before any network call.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub(crate) fn require(present: bool, message: &str) -> Result<(), ApiError> {
    if present {
        Ok(())
    } else {
        Err(ApiError::Validation(message.to_string()))
    }
}

pub(crate) fn email(value: &str) -> Result<(), ApiError> {
    require(
        EMAIL_SHAPE.is_match(value),
        "El formato del email no es válido",
    )
}

pub(crate) fn min_password(value: &str, message: &str) -> Result<(), ApiError> {
    require(value.len() >= MIN_PASSWORD_LEN, message)
}

pub(crate) fn positive_amount(value: f64) -> Result<(), ApiError> {
    require(
        value.is_finite() && value > 0.0,
        "El monto debe ser un número positivo",
    )
}

pub(crate) fn finite_balance(value: f64) -> Result<(), ApiError> {
    require(value.is_finite(), "El saldo inicial debe ser un número válido")
}
