//! Fixed-point conversions between decimal HBAR amounts and integer units.
//!
//! Parsing is integer-only: the decimal text is split at the point and the
//! two halves are combined as `U256`, so no float rounding enters the result.
//! Digits beyond the requested precision are rounded half-up.

use alloy::primitives::U256;

use crate::PaymentError;

fn ten_pow(decimals: u8) -> Result<U256, PaymentError> {
    U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| PaymentError::Overflow(format!("10^{decimals} exceeds uint256")))
}

/// Parse a decimal string (e.g. `"1.5"`) into integer units at `decimals`
/// fractional digits.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, PaymentError> {
    let cleaned = value.trim();
    if cleaned.starts_with('-') {
        return Err(PaymentError::InvalidRequest(format!(
            "amount '{value}' is negative"
        )));
    }

    let (integer_part, fractional_part) = cleaned.split_once('.').unwrap_or((cleaned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer_part.is_empty() && fractional_part.is_empty())
        || !all_digits(integer_part)
        || !all_digits(fractional_part)
    {
        return Err(PaymentError::InvalidRequest(format!(
            "amount '{value}' is not a decimal number"
        )));
    }

    let integer: U256 = if integer_part.is_empty() {
        U256::ZERO
    } else {
        integer_part
            .parse()
            .map_err(|_| PaymentError::Overflow(format!("amount '{value}' exceeds uint256")))?
    };

    // Keep `decimals` digits, pad short fractions with zeros, and look at the
    // first dropped digit for rounding.
    let decimals_len = decimals as usize;
    let (kept, dropped) = if fractional_part.len() > decimals_len {
        fractional_part.split_at(decimals_len)
    } else {
        (fractional_part, "")
    };
    let mut fractional: U256 = if kept.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{kept:0<decimals_len$}");
        padded
            .parse()
            .map_err(|_| PaymentError::Overflow(format!("amount '{value}' exceeds uint256")))?
    };
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        fractional += U256::from(1u8);
    }

    let overflow = || PaymentError::Overflow(format!("amount '{value}' exceeds uint256"));
    integer
        .checked_mul(ten_pow(decimals)?)
        .ok_or_else(overflow)?
        .checked_add(fractional)
        .ok_or_else(overflow)
}

/// Convert a floating-point amount into integer units. The shortest decimal
/// text of the float is what gets parsed, so `0.1` becomes exactly
/// `10_000_000` at 8 decimals.
pub fn amount_to_units(amount: f64, decimals: u8) -> Result<U256, PaymentError> {
    if !amount.is_finite() {
        return Err(PaymentError::InvalidRequest(format!(
            "amount {amount} is not finite"
        )));
    }
    if amount == 0.0 {
        return Ok(U256::ZERO);
    }
    parse_units(&amount.to_string(), decimals)
}

/// Re-express an integer amount at `decimals` more fractional digits.
pub fn scale_units(value: U256, decimals: u8) -> Result<U256, PaymentError> {
    value
        .checked_mul(ten_pow(decimals)?)
        .ok_or_else(|| PaymentError::Overflow(format!("{value} scaled by 10^{decimals}")))
}

/// Render integer units as a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}
