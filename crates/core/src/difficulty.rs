//! Difficulty module - score driven timing and generator weights
//!
//! Every value is a clamped linear interpolation of the current score, so the
//! state is fully derived and never set directly.

use crate::types::{
    ADVANCED_RAMP_START_SCORE, ADVANCED_WEIGHT_RANGE, CLASSIC_FALL_INTERVAL_RANGE_MS,
    FALL_INTERVAL_RANGE_MS, RAMP_END_SCORE, SPECIAL_RAMP_START_SCORE, SPECIAL_WEIGHT_RANGE,
};

/// Linear interpolation of `x` between two breakpoints, clamped outside them
pub fn interpolate(x: f64, (x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> f64 {
    if x <= x0 {
        y0
    } else if x >= x1 {
        y1
    } else {
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// Fall interval and generator weights for one score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub fall_interval_ms: f64,
    pub advanced_weight: f64,
    pub special_weight: f64,
}

impl Difficulty {
    pub fn for_score(score: u32, classic: bool) -> Self {
        let s = score as f64;
        let end = RAMP_END_SCORE as f64;

        if classic {
            return Self {
                fall_interval_ms: interpolate(s, (0.0, end), CLASSIC_FALL_INTERVAL_RANGE_MS),
                advanced_weight: 0.0,
                special_weight: 0.0,
            };
        }

        Self {
            fall_interval_ms: interpolate(s, (0.0, end), FALL_INTERVAL_RANGE_MS),
            advanced_weight: interpolate(
                s,
                (ADVANCED_RAMP_START_SCORE as f64, end),
                ADVANCED_WEIGHT_RANGE,
            ),
            special_weight: interpolate(
                s,
                (SPECIAL_RAMP_START_SCORE as f64, end),
                SPECIAL_WEIGHT_RANGE,
            ),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::for_score(0, false)
    }
}
