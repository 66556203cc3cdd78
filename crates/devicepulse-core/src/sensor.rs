//! Sensor reading types emitted by the adapter streams.

use serde::{Deserialize, Serialize};

/// Linear acceleration in m/s² per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Angular orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationReading {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Network link state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub online: bool,
    /// Downstream bandwidth estimate in Mbps (0 when unknown).
    pub downlink: f64,
    /// Round-trip time estimate in ms (0 when unknown).
    pub rtt: f64,
    /// Coarse link-quality label, e.g. `"ethernet"`, `"wifi"`, `"unknown"`.
    #[serde(rename = "type")]
    pub link_type: String,
}

impl NetworkStatus {
    /// Snapshot with everything but the online flag defaulted, for platforms
    /// without link introspection.
    pub fn unknown(online: bool) -> Self {
        Self {
            online,
            downlink: 0.0,
            rtt: 0.0,
            link_type: "unknown".to_string(),
        }
    }
}

/// Battery state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    /// Charge percentage, 0-100.
    pub level: f64,
    pub charging: bool,
}
