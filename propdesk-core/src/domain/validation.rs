//! Form validation performed before anything is sent to the backend

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::result::{Error, Result};

/// Minimum admin password length accepted by the backend
pub const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Reject empty or whitespace-only required fields
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}

/// Password plus confirmation must match and meet the length rule
pub fn confirm_password(password: &str, confirmation: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password != confirmation {
        return Err(Error::validation("Passwords do not match"));
    }
    Ok(())
}

/// Basic email shape check
pub fn email(value: &str) -> Result<&str> {
    let value = require("Email", value)?;
    if !email_regex().is_match(value) {
        return Err(Error::validation(format!("'{}' is not a valid email", value)));
    }
    Ok(value)
}

/// Amounts (prices, credits) must be strictly positive
pub fn positive_amount(field: &str, value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(Error::validation(format!("{} must be greater than zero", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require("Name", "  Ada ").unwrap(), "Ada");
        assert!(require("Name", "   ").is_err());
    }

    #[test]
    fn test_confirm_password() {
        assert!(confirm_password("longenough", "longenough").is_ok());
        let err = confirm_password("longenough", "different1").unwrap_err();
        assert!(err.to_string().contains("do not match"));
        let err = confirm_password("short", "short").unwrap_err();
        assert!(err.to_string().contains("at least 8"));
    }

    #[test]
    fn test_email() {
        assert!(email("admin@desk.io").is_ok());
        assert!(email("admin@desk").is_err());
        assert!(email("no spaces@desk.io").is_err());
        assert!(email("").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount("Price", Decimal::new(1, 0)).is_ok());
        assert!(positive_amount("Price", Decimal::ZERO).is_err());
        assert!(positive_amount("Price", Decimal::new(-5, 0)).is_err());
    }
}
