// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout input validation.
//!
//! Running: distance, duration and cadence must all be finite and > 0.
//! Cycling: distance, duration and elevation must be finite, but only
//! distance and duration must be > 0. Elevation gain may be zero or
//! negative for a net-downhill ride.

use crate::models::WorkoutKind;

/// User-facing rejection message.
pub const REJECTION_MESSAGE: &str = "Inputs must be a positive number";

/// True if every input is a finite number.
pub fn all_finite(inputs: &[f64]) -> bool {
    inputs.iter().all(|v| v.is_finite())
}

/// True if every input is strictly greater than zero.
pub fn all_positive(inputs: &[f64]) -> bool {
    inputs.iter().all(|v| *v > 0.0)
}

/// Check the numeric fields of a workout of the given kind.
///
/// `specific` is cadence for running and elevation gain for cycling.
pub fn validate(
    kind: WorkoutKind,
    distance: f64,
    duration: f64,
    specific: f64,
) -> Result<(), ValidationError> {
    let valid = match kind {
        WorkoutKind::Running => {
            let fields = [distance, duration, specific];
            all_finite(&fields) && all_positive(&fields)
        }
        WorkoutKind::Cycling => {
            all_finite(&[distance, duration, specific]) && all_positive(&[distance, duration])
        }
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError { kind })
    }
}

/// Coerce a raw form value to a number.
///
/// Whitespace is trimmed and an empty field reads as 0 (which the
/// positivity check then rejects where it applies). Anything that does not
/// parse reads as NaN.
pub fn parse_field(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Rejected workout input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Inputs must be a positive number ({kind} workout)")]
pub struct ValidationError {
    pub kind: WorkoutKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(all_finite(&[1.0, -2.0, 0.0]));
        assert!(!all_finite(&[1.0, f64::NAN]));
        assert!(!all_finite(&[f64::INFINITY]));
        assert!(all_positive(&[0.1, 3.0]));
        assert!(!all_positive(&[1.0, 0.0]));
        assert!(!all_positive(&[-1.0]));
        assert!(all_finite(&[]) && all_positive(&[]));
    }

    #[test]
    fn test_running_requires_all_positive() {
        assert!(validate(WorkoutKind::Running, 5.0, 30.0, 180.0).is_ok());
        assert!(validate(WorkoutKind::Running, 0.0, 30.0, 180.0).is_err());
        assert!(validate(WorkoutKind::Running, 5.0, -1.0, 180.0).is_err());
        assert!(validate(WorkoutKind::Running, 5.0, 30.0, 0.0).is_err());
        assert!(validate(WorkoutKind::Running, 5.0, 30.0, f64::NAN).is_err());
        assert!(validate(WorkoutKind::Running, f64::INFINITY, 30.0, 180.0).is_err());
    }

    #[test]
    fn test_cycling_elevation_may_be_non_positive() {
        assert!(validate(WorkoutKind::Cycling, 20.0, 60.0, -50.0).is_ok());
        assert!(validate(WorkoutKind::Cycling, 20.0, 60.0, 0.0).is_ok());
        assert!(validate(WorkoutKind::Cycling, 20.0, 60.0, 300.0).is_ok());

        assert!(validate(WorkoutKind::Cycling, 20.0, 60.0, f64::NAN).is_err());
        assert!(validate(WorkoutKind::Cycling, 20.0, 60.0, f64::NEG_INFINITY).is_err());
        assert!(validate(WorkoutKind::Cycling, 0.0, 60.0, 10.0).is_err());
        assert!(validate(WorkoutKind::Cycling, 20.0, -5.0, 10.0).is_err());
    }

    #[test]
    fn test_parse_field_coercion() {
        assert_eq!(parse_field("5"), 5.0);
        assert_eq!(parse_field(" 2.5 "), 2.5);
        assert_eq!(parse_field("-50"), -50.0);
        assert_eq!(parse_field(""), 0.0);
        assert_eq!(parse_field("   "), 0.0);
        assert!(parse_field("abc").is_nan());
        assert!(parse_field("5km").is_nan());
    }

    #[test]
    fn test_empty_elevation_is_accepted_for_cycling() {
        let elevation = parse_field("");
        assert!(validate(WorkoutKind::Cycling, 10.0, 30.0, elevation).is_ok());
    }

    #[test]
    fn test_error_message() {
        let err = validate(WorkoutKind::Running, 0.0, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inputs must be a positive number (running workout)"
        );
    }
}
