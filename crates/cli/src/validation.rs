use thiserror::Error;

/// Field-level checks run before any request goes out; a value that fails
/// here never reaches the backend.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("card suffix must be exactly 4 digits")]
    InvalidLast4,

    #[error("currency must be a 3-letter code")]
    InvalidCurrency,

    #[error("amount must be a number greater than zero")]
    InvalidAmount,
}

/// Normalizes a card suffix: separators are stripped, exactly four digits
/// must remain.
pub fn validate_last4(value: &str) -> Result<String, ValidationError> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return Err(ValidationError::InvalidLast4);
    }

    Ok(digits)
}

/// Normalizes a currency code to uppercase, requiring three ASCII letters.
pub fn validate_currency(value: &str) -> Result<String, ValidationError> {
    let code = value.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrency);
    }

    Ok(code.to_ascii_uppercase())
}

/// Parses an amount, requiring a finite value strictly greater than zero.
pub fn validate_amount(value: &str) -> Result<f64, ValidationError> {
    let amount: f64 = value.trim().parse().map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }

    Ok(amount)
}
