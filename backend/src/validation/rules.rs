//! Common validation rules applied at the HTTP edge.

use validator::ValidationError;

/// Upper bound for the idle-window update, in minutes (one year). Anything
/// larger is a client error, and unbounded values would overflow the
/// duration arithmetic downstream.
pub const MAX_TIMEOUT_MINUTES: i64 = 366 * 24 * 60;

/// Validates the idle-window update: the new timeout must be a positive,
/// bounded number of minutes. Out-of-range values never reach the lifecycle
/// service.
pub fn validate_timeout_minutes(minutes: i64) -> Result<(), ValidationError> {
    if !(1..=MAX_TIMEOUT_MINUTES).contains(&minutes) {
        return Err(ValidationError::new("timeout_minutes_out_of_range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_rejects_zero() {
        assert!(validate_timeout_minutes(0).is_err());
    }

    #[test]
    fn timeout_rejects_negative() {
        assert!(validate_timeout_minutes(-5).is_err());
    }

    #[test]
    fn timeout_rejects_values_past_the_upper_bound() {
        assert!(validate_timeout_minutes(MAX_TIMEOUT_MINUTES + 1).is_err());
        assert!(validate_timeout_minutes(i64::MAX).is_err());
    }

    #[test]
    fn timeout_accepts_positive_in_range() {
        assert!(validate_timeout_minutes(30).is_ok());
        assert!(validate_timeout_minutes(1).is_ok());
        assert!(validate_timeout_minutes(MAX_TIMEOUT_MINUTES).is_ok());
    }
}
