//! Rounding policy
//!
//! One rounding rule, applied only where values leave the engine
//! (database writes and tool responses). The calculation functions never round.

use crate::config::STORAGE_DECIMALS;

/// Round to `STORAGE_DECIMALS` decimal places; non-finite input becomes 0
pub fn round_to_storage(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(STORAGE_DECIMALS);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_storage() {
        assert_eq!(round_to_storage(195.0), 195.0);
        assert_eq!(round_to_storage(1.234), 1.23);
        assert_eq!(round_to_storage(1.236), 1.24);
        assert_eq!(round_to_storage(-12.344), -12.34);
    }

    #[test]
    fn test_round_non_finite() {
        assert_eq!(round_to_storage(f64::NAN), 0.0);
        assert_eq!(round_to_storage(f64::INFINITY), 0.0);
    }
}
