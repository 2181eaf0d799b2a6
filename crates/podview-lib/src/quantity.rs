//! Resource quantity normalization
//!
//! Parses orchestrator quantity strings ("500m", "2Gi", "1e3", ...) with
//! exact integer arithmetic and rounds up to whole units, the same way the
//! orchestrator reports an integral quantity value.

use crate::error::QuantityError;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::warn;

/// Longest mantissa accepted before the arithmetic would risk overflow
const MAX_MANTISSA_DIGITS: usize = 24;

/// Parse a quantity string and round it up (away from zero) to an integer
pub fn parse_quantity(raw: &str) -> Result<i64, QuantityError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(QuantityError::Empty);
    }

    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
        .unwrap_or(value.len());
    let (number, suffix) = value.split_at(split);

    let (negative, digits, fraction_exp) = parse_mantissa(number)?;
    let overflow = || QuantityError::Overflow(value.to_string());

    let (exp2, suffix_exp): (u32, i32) = match suffix {
        "" => (0, 0),
        "Ki" => (10, 0),
        "Mi" => (20, 0),
        "Gi" => (30, 0),
        "Ti" => (40, 0),
        "Pi" => (50, 0),
        "Ei" => (60, 0),
        "n" => (0, -9),
        "u" => (0, -6),
        "m" => (0, -3),
        "k" => (0, 3),
        "M" => (0, 6),
        "G" => (0, 9),
        "T" => (0, 12),
        "P" => (0, 15),
        "E" => (0, 18),
        s if s.starts_with(['e', 'E']) => {
            let exponent: i32 = s[1..]
                .parse()
                .map_err(|_| QuantityError::UnknownSuffix(s.to_string()))?;
            (0, exponent)
        }
        s => return Err(QuantityError::UnknownSuffix(s.to_string())),
    };
    let exp10 = fraction_exp.checked_add(suffix_exp).ok_or_else(overflow)?;

    let mut numerator = digits.checked_mul(1i128 << exp2).ok_or_else(overflow)?;
    let mut denominator: i128 = 1;
    if exp10 >= 0 {
        let scale = 10i128.checked_pow(exp10.unsigned_abs()).ok_or_else(overflow)?;
        numerator = numerator.checked_mul(scale).ok_or_else(overflow)?;
    } else {
        denominator = 10i128
            .checked_pow(exp10.unsigned_abs())
            .ok_or_else(overflow)?;
    }

    // Ceiling division of a non-negative numerator
    let whole = numerator / denominator;
    let rounded = if numerator % denominator == 0 {
        whole
    } else {
        whole + 1
    };
    let rounded = if negative { -rounded } else { rounded };
    i64::try_from(rounded).map_err(|_| overflow())
}

/// Split "-1.50" into (negative, 150, -2)
fn parse_mantissa(number: &str) -> Result<(bool, i128, i32), QuantityError> {
    let invalid = || QuantityError::InvalidNumber(number.to_string());

    let (negative, unsigned) = match number.as_bytes().first() {
        Some(b'-') => (true, &number[1..]),
        Some(b'+') => (false, &number[1..]),
        _ => (false, number),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let combined = format!("{whole}{fraction}");
    let trimmed = combined.trim_start_matches('0');
    if trimmed.len() > MAX_MANTISSA_DIGITS {
        return Err(QuantityError::Overflow(number.to_string()));
    }
    let digits: i128 = if trimmed.is_empty() {
        0
    } else {
        trimmed.parse().map_err(|_| invalid())?
    };

    Ok((negative, digits, -(fraction.len() as i32)))
}

/// Integer value of an optional quantity; missing or unparseable yields 0
fn quantity_value(quantity: Option<&Quantity>, resource: &str) -> i64 {
    let Some(quantity) = quantity else {
        return 0;
    };

    match parse_quantity(&quantity.0) {
        Ok(value) => value,
        Err(e) => {
            warn!(resource = %resource, quantity = %quantity.0, error = %e, "Unparseable resource quantity");
            0
        }
    }
}

/// Convert bytes to MiB, truncating
pub fn bytes_to_mib(bytes: i64) -> i64 {
    bytes / 1024 / 1024
}

fn limit<'a>(container: &'a Container, resource: &str) -> Option<&'a Quantity> {
    container
        .resources
        .as_ref()
        .and_then(|r| r.limits.as_ref())
        .and_then(|limits| limits.get(resource))
}

/// CPU limit of a container in whole cores
pub fn cpu_limit_cores(container: &Container) -> i64 {
    quantity_value(limit(container, "cpu"), "cpu")
}

/// Memory limit of a container in bytes
pub fn memory_limit_bytes(container: &Container) -> i64 {
    quantity_value(limit(container, "memory"), "memory")
}
