//! Capability probing: decide once, per sensor class, whether a native
//! source exists or the adapter should synthesize readings.
//!
//! The probe result is computed at adapter construction and never revisited.
//! Capability absence is not an error — it selects [`Capability::Mock`]
//! silently. The probe itself is a trait so tests (and forced-mock callers)
//! can inject a fixed capability set.

use std::fs;
use std::path::{Path, PathBuf};

/// How a sensor class will be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A platform source exists; readings come from it.
    Native,
    /// No platform source; readings are synthesized deterministically.
    Mock,
}

impl Capability {
    pub fn is_native(self) -> bool {
        matches!(self, Self::Native)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Per-sensor-class capability decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub motion: Capability,
    pub orientation: Capability,
    pub network: Capability,
    pub battery: Capability,
}

impl Capabilities {
    pub const fn all_mock() -> Self {
        Self {
            motion: Capability::Mock,
            orientation: Capability::Mock,
            network: Capability::Mock,
            battery: Capability::Mock,
        }
    }

    pub const fn all_native() -> Self {
        Self {
            motion: Capability::Native,
            orientation: Capability::Native,
            network: Capability::Native,
            battery: Capability::Native,
        }
    }
}

/// Decides the capability set for this machine. Injectable for testing.
pub trait CapabilityProbe {
    fn probe(&self) -> Capabilities;
}

/// A fixed capability set; probes to exactly what it was built with.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Capabilities);

impl CapabilityProbe for FixedProbe {
    fn probe(&self) -> Capabilities {
        self.0
    }
}

/// Sysfs roots inspected for native sensor sources.
#[derive(Debug, Clone)]
pub struct SysfsPaths {
    /// IIO devices (accelerometer, gyroscope): `/sys/bus/iio/devices`.
    pub iio: PathBuf,
    /// Network interfaces: `/sys/class/net`.
    pub net: PathBuf,
    /// Power supplies: `/sys/class/power_supply`.
    pub power: PathBuf,
}

impl Default for SysfsPaths {
    fn default() -> Self {
        Self {
            iio: PathBuf::from("/sys/bus/iio/devices"),
            net: PathBuf::from("/sys/class/net"),
            power: PathBuf::from("/sys/class/power_supply"),
        }
    }
}

/// Probes Linux sysfs for each sensor class.
#[derive(Debug, Clone, Default)]
pub struct SysfsProbe {
    paths: SysfsPaths,
}

impl SysfsProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe against non-standard roots. Used by tests with fabricated trees.
    pub fn with_paths(paths: SysfsPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SysfsPaths {
        &self.paths
    }
}

impl CapabilityProbe for SysfsProbe {
    fn probe(&self) -> Capabilities {
        let caps = Capabilities {
            motion: available(find_iio_device(&self.paths.iio, "in_accel_x_raw").is_some()),
            orientation: available(find_iio_device(&self.paths.iio, "in_anglvel_x_raw").is_some()),
            network: available(!net_interfaces(&self.paths.net).is_empty()),
            battery: available(battery_supply(&self.paths.power).is_some()),
        };
        log::debug!(
            "probed capabilities: motion={} orientation={} network={} battery={}",
            caps.motion,
            caps.orientation,
            caps.network,
            caps.battery
        );
        caps
    }
}

fn available(present: bool) -> Capability {
    if present { Capability::Native } else { Capability::Mock }
}

/// First IIO device directory containing the given channel file.
pub(crate) fn find_iio_device(root: &Path, marker: &str) -> Option<PathBuf> {
    for entry in fs::read_dir(root).ok()?.flatten() {
        let dir = entry.path();
        if dir.join(marker).is_file() {
            return Some(dir);
        }
    }
    None
}

/// Physical network interface directories (everything but loopback).
pub(crate) fn net_interfaces(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .flatten()
        .filter(|e| e.file_name() != "lo")
        .map(|e| e.path())
        .filter(|p| p.join("operstate").is_file())
        .collect()
}

/// First power supply directory that reports a charge percentage.
pub(crate) fn battery_supply(root: &Path) -> Option<PathBuf> {
    for entry in fs::read_dir(root).ok()?.flatten() {
        let dir = entry.path();
        if dir.join("capacity").is_file() {
            return Some(dir);
        }
    }
    None
}
