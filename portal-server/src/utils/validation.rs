//! Input validation helpers
//!
//! Length constants and checks for the API handlers. SQLite TEXT has no
//! built-in length enforcement, so the limits live here.

use crate::utils::AppError;

/// Payment method labels (`check`, `wire`, `ACH batch 42`, ...)
pub const MAX_METHOD_LEN: usize = 100;

/// External receipt / transaction references
pub const MAX_REFERENCE_LEN: usize = 200;

/// Gateway dashboard / endpoint URLs
pub const MAX_URL_LEN: usize = 2048;

/// Checkout embed snippets
pub const MAX_EMBED_LEN: usize = 10_000;

/// Validate an optional free-form field against a length limit.
///
/// `None` passes; an empty or whitespace-only value does not (senders should
/// omit the field instead).
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.trim().is_empty() {
        return Err(AppError::validation(format!(
            "{field} must not be empty when provided"
        )));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an ISO-4217-shaped currency code (three ASCII letters).
pub fn validate_currency_code(code: &str) -> Result<(), AppError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid currency code: {code}")).with_detail("currency", code))
    }
}

/// Validate a supported-currencies list: non-empty, every entry a valid code.
pub fn validate_currency_list(codes: &[String]) -> Result<(), AppError> {
    if codes.is_empty() {
        return Err(AppError::validation(
            "supportedCurrencies must not be empty",
        ));
    }
    for code in codes {
        validate_currency_code(code)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_allows_none_and_rejects_blank() {
        assert!(validate_optional_text(None, "paymentMethod", 10).is_ok());
        assert!(validate_optional_text(Some("check"), "paymentMethod", 10).is_ok());
        assert!(validate_optional_text(Some("   "), "paymentMethod", 10).is_err());
        assert!(validate_optional_text(Some("0123456789AB"), "paymentMethod", 10).is_err());
    }

    #[test]
    fn currency_codes_are_three_ascii_letters() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("eur").is_ok());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("USDT").is_err());
        assert!(validate_currency_code("U$D").is_err());
    }

    #[test]
    fn currency_list_must_not_be_empty() {
        assert!(validate_currency_list(&[]).is_err());
        assert!(validate_currency_list(&["USD".to_string(), "CAD".to_string()]).is_ok());
        assert!(validate_currency_list(&["USD".to_string(), "INVALID".to_string()]).is_err());
    }
}
