//! In-game clock
//!
//! One tick advances the hour by a fixed step; the lunch window raises
//! difficulty everywhere else in the sim. Pure functions only.

/// Hour advance per simulation tick
pub const HOUR_STEP: f32 = 0.1;
/// Lunch rush window (inclusive on both ends)
pub const LUNCH_START: f32 = 11.0;
pub const LUNCH_END: f32 = 14.0;

/// Result of advancing the clock by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    pub hour: f32,
    pub is_lunch_time: bool,
}

/// Advance the in-game hour by one step, wrapping at 24:00.
pub fn advance(hour: f32) -> ClockReading {
    let mut next = hour + HOUR_STEP;
    if next >= 24.0 {
        next -= 24.0;
    }
    ClockReading {
        hour: next,
        is_lunch_time: is_lunch_time(next),
    }
}

/// Whether an hour falls inside the lunch rush window
pub fn is_lunch_time(hour: f32) -> bool {
    (LUNCH_START..=LUNCH_END).contains(&hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advance_step() {
        let r = advance(9.0);
        assert!((r.hour - 9.1).abs() < 1e-5);
        assert!(!r.is_lunch_time);
    }

    #[test]
    fn test_advance_wraps_at_midnight() {
        let r = advance(23.95);
        assert!(r.hour < 0.1);
        assert!(!r.is_lunch_time);
    }

    #[test]
    fn test_lunch_window_boundaries() {
        assert!(is_lunch_time(11.0));
        assert!(is_lunch_time(14.0));
        assert!(is_lunch_time(12.5));
        assert!(!is_lunch_time(10.9));
        assert!(!is_lunch_time(14.1));
    }

    proptest! {
        #[test]
        fn prop_lunch_iff_in_window(hour in 0.0f32..24.0) {
            let r = advance(hour);
            prop_assert_eq!(
                r.is_lunch_time,
                r.hour >= LUNCH_START && r.hour <= LUNCH_END
            );
        }

        #[test]
        fn prop_hour_stays_in_range(hour in 0.0f32..24.0) {
            let r = advance(hour);
            prop_assert!(r.hour >= 0.0 && r.hour < 24.0);
        }
    }
}
