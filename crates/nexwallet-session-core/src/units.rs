//! Exact conversion between smallest on-chain units and decimal display
//! strings. Integer arithmetic on `U256` throughout; no floating point.

use alloy::primitives::U256;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("invalid decimal amount: {0}")]
    InvalidNumber(String),
    #[error("amount requires more than {decimals} fractional digits")]
    PrecisionLoss { decimals: u8 },
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

fn scale_for(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Renders a smallest-unit integer as a decimal string in display units,
/// with trailing fractional zeros trimmed (`1500000000000000000` -> `1.5`).
pub fn format_units(raw: U256, decimals: u8) -> String {
    let scale = scale_for(decimals);
    let whole = raw / scale;
    let frac = raw % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let mut frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{whole}.{frac_str}")
}

/// Parses a decimal display amount into smallest units.
///
/// Rejects malformed input and significant fractional digits beyond the
/// asset's exponent; round-trips exactly with [`format_units`].
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
    let text = text.trim();
    let invalid = || UnitsError::InvalidNumber(text.to_owned());

    let (whole_str, frac_str) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole_str.is_empty()
        || frac_str.contains('.')
        || !whole_str.bytes().all(|b| b.is_ascii_digit())
        || !frac_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole = U256::from_str_radix(whole_str, 10).map_err(|_| UnitsError::Overflow)?;
    let frac_trimmed = frac_str.trim_end_matches('0');
    if frac_trimmed.len() > decimals as usize {
        return Err(UnitsError::PrecisionLoss { decimals });
    }

    let scale = scale_for(decimals);
    let mut value = whole.checked_mul(scale).ok_or(UnitsError::Overflow)?;
    if !frac_trimmed.is_empty() {
        let frac = U256::from_str_radix(frac_trimmed, 10).map_err(|_| UnitsError::Overflow)?;
        let shift = scale_for(decimals - frac_trimmed.len() as u8);
        let frac_units = frac.checked_mul(shift).ok_or(UnitsError::Overflow)?;
        value = value.checked_add(frac_units).ok_or(UnitsError::Overflow)?;
    }
    Ok(value)
}
