//! Numeric parsing and guarded arithmetic.
//!
//! Subgraph responses carry decimal quantities as strings to preserve
//! precision. Parsing goes through BigDecimal before narrowing to f64,
//! and every division that can hit a zero denominator is guarded.

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use serde_json::Value;
use std::str::FromStr;

// ============================================
// Decimal String Parsing
// ============================================

/// Parse a decimal string (e.g. "1234.000000000000000001") to f64.
///
/// Uses BigDecimal for the intermediate representation so very large
/// or very precise values do not round-trip through a lossy parse.
///
/// # Returns
/// * `Some(f64)` if the string parses and the value is finite and
///   non-negative, `None` otherwise
pub fn decimal_str_to_f64(value_str: &str) -> Option<f64> {
    let big_value = BigDecimal::from_str(value_str).ok()?;

    let result = big_value.to_f64()?;

    if result.is_finite() && result >= 0.0 {
        Some(result)
    } else {
        None
    }
}

// ============================================
// JSON Field Extraction
// ============================================

/// Extract an f64 from a JSON value that may be a string or a number.
///
/// The subgraph serializes BigDecimal fields as strings and Int fields
/// as numbers; alias-keyed responses are parsed untyped, so both shapes
/// show up.
pub fn json_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => decimal_str_to_f64(s),
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Extract a u64 from a JSON value that may be a string or a number.
pub fn json_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

// ============================================
// Guarded Arithmetic
// ============================================

/// Divide with a zero/non-finite guard.
///
/// Returns 0.0 when the denominator is zero or the quotient is not a
/// finite number, matching the dashboard's degrade-to-nothing policy.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() {
        quotient
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_str_parsing() {
        assert_eq!(decimal_str_to_f64("1.5"), Some(1.5));
        assert_eq!(decimal_str_to_f64("0"), Some(0.0));
        // 18-decimal token quantities survive the BigDecimal path
        assert_eq!(
            decimal_str_to_f64("1000000.000000000000000001"),
            Some(1_000_000.0)
        );
        assert_eq!(decimal_str_to_f64("not a number"), None);
        assert_eq!(decimal_str_to_f64("-1"), None);
    }

    #[test]
    fn test_json_extraction_accepts_both_shapes() {
        assert_eq!(json_to_f64(&json!("2.5")), Some(2.5));
        assert_eq!(json_to_f64(&json!(2.5)), Some(2.5));
        assert_eq!(json_to_f64(&json!(null)), None);
        assert_eq!(json_to_u64(&json!("12345678")), Some(12_345_678));
        assert_eq!(json_to_u64(&json!(12_345_678)), Some(12_345_678));
    }

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(10.0, 4.0), 2.5);
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(f64::NAN, 1.0), 0.0);
    }
}
