//! Deterministic-by-formula mock readings for absent sensor capabilities.
//!
//! Values are bounded periodic functions of wall-clock time, shaped to
//! resemble plausible device telemetry (gravity plus jitter, slow rotation,
//! a slow battery drain curve). Not physically authoritative.

use std::time::Duration;

use chrono::Utc;

use crate::sensor::{AccelReading, BatteryReading, OrientationReading};

/// Emission period for mock motion and orientation streams.
pub const MOCK_PERIOD: Duration = Duration::from_millis(100);

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn wall_clock_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Synthetic acceleration at time `t_ms`: gravity on z plus gentle sway.
pub fn acceleration_at(t_ms: u64) -> AccelReading {
    let t = t_ms as f64;
    AccelReading {
        x: 5.0 * (t / 1000.0).sin(),
        y: 5.0 * (t / 800.0).cos(),
        z: 9.8 + (t / 500.0).sin(),
    }
}

/// Synthetic orientation at time `t_ms`: steady alpha rotation, rocking
/// beta/gamma.
pub fn orientation_at(t_ms: u64) -> OrientationReading {
    let t = t_ms as f64;
    OrientationReading {
        alpha: (t / 100.0) % 360.0,
        beta: 90.0 * (t / 1000.0).sin(),
        gamma: 90.0 * (t / 1000.0).cos(),
    }
}

/// Synthetic battery state at time `t_ms`: slow sinusoidal drift around 80%,
/// never charging.
pub fn battery_at(t_ms: u64) -> BatteryReading {
    let t = t_ms as f64;
    BatteryReading {
        level: 80.0 + 10.0 * (t / 300_000.0).sin(),
        charging: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_z_stays_near_gravity() {
        for t in (0..600_000).step_by(97) {
            let r = acceleration_at(t);
            assert!(r.z >= 8.8 && r.z <= 10.8, "z out of bounds at t={t}: {}", r.z);
            assert!(r.x.abs() <= 5.0);
            assert!(r.y.abs() <= 5.0);
        }
    }

    #[test]
    fn orientation_axes_are_bounded() {
        for t in (0..600_000).step_by(113) {
            let r = orientation_at(t);
            assert!((0.0..360.0).contains(&r.alpha), "alpha out of range: {}", r.alpha);
            assert!(r.beta.abs() <= 90.0);
            assert!(r.gamma.abs() <= 90.0);
        }
    }

    #[test]
    fn battery_level_is_a_plausible_percentage() {
        for t in (0..3_600_000).step_by(1009) {
            let r = battery_at(t);
            assert!((70.0..=90.0).contains(&r.level));
            assert!(!r.charging);
        }
    }

    #[test]
    fn formulas_are_deterministic() {
        assert_eq!(acceleration_at(12_345), acceleration_at(12_345));
        assert_eq!(orientation_at(12_345), orientation_at(12_345));
    }
}
