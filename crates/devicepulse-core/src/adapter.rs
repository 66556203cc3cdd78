//! Sensor adapter: live reading streams with transparent mock fallback.
//!
//! Each `observe_*` call spawns a producing task and hands back a
//! [`Subscription`]. Dropping the subscription (or calling
//! [`Subscription::unsubscribe`]) aborts the task, which synchronously stops
//! emissions and releases its timers and file readers. Streams run
//! independently; nothing is shared between subscriptions.
//!
//! Which source backs a stream is decided once, at adapter construction,
//! by a [`CapabilityProbe`]. Native readings come from Linux sysfs (IIO
//! channels, `/sys/class/net`, `/sys/class/power_supply`); absent
//! capabilities fall back to the deterministic generators in [`mock`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::mock::{self, MOCK_PERIOD};
use crate::probe::{
    self, Capabilities, Capability, CapabilityProbe, SysfsPaths, SysfsProbe,
};
use crate::sensor::{AccelReading, BatteryReading, NetworkStatus, OrientationReading};

const CHANNEL_DEPTH: usize = 32;
/// Poll cadence for change-driven streams (link state, battery).
const CHANGE_POLL: Duration = Duration::from_secs(1);

/// Handle to one live sensor stream.
///
/// Readings arrive in emission order. The stream ends (recv returns `None`)
/// only if the producing task stops; unsubscribing is done by dropping.
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T> {
    /// Wait for the next reading.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Stop the stream. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Produces live sensor streams from native sources or mock generators.
pub struct SensorAdapter {
    caps: Capabilities,
    paths: SysfsPaths,
}

impl SensorAdapter {
    /// Probe this machine's sysfs and build an adapter for what it finds.
    pub fn detect() -> Self {
        let probe = SysfsProbe::new();
        let paths = probe.paths().clone();
        Self {
            caps: probe.probe(),
            paths,
        }
    }

    /// Build an adapter from an injected probe, reading native sources from
    /// the default sysfs roots.
    pub fn new(probe: &dyn CapabilityProbe) -> Self {
        Self::with_paths(probe, SysfsPaths::default())
    }

    /// Build an adapter from an injected probe and explicit sysfs roots.
    pub fn with_paths(probe: &dyn CapabilityProbe, paths: SysfsPaths) -> Self {
        Self {
            caps: probe.probe(),
            paths,
        }
    }

    /// Capability decisions this adapter was built with.
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Stream of linear acceleration readings (m/s²), one per sample period.
    ///
    /// Native mode samples the IIO accelerometer channels; axes without a
    /// channel file read as 0. Mock mode emits the synthetic gravity-plus-sway
    /// formula every 100 ms.
    pub fn observe_acceleration(&self) -> Subscription<AccelReading> {
        match self.caps.motion {
            Capability::Native => {
                let channels = AxisChannels::open(&self.paths.iio, "in_accel");
                spawn_periodic(move || {
                    let (x, y, z) = channels.read();
                    AccelReading { x, y, z }
                })
            }
            Capability::Mock => {
                spawn_periodic(|| mock::acceleration_at(mock::wall_clock_ms()))
            }
        }
    }

    /// Stream of angular orientation readings (degrees).
    ///
    /// Native mode samples the IIO angular-rate channels (x/y/z mapped to
    /// alpha/beta/gamma), missing axes coerced to 0. Mock mode emits the
    /// rotation formula every 100 ms.
    pub fn observe_orientation(&self) -> Subscription<OrientationReading> {
        match self.caps.orientation {
            Capability::Native => {
                let channels = AxisChannels::open(&self.paths.iio, "in_anglvel");
                spawn_periodic(move || {
                    let (alpha, beta, gamma) = channels.read();
                    OrientationReading { alpha, beta, gamma }
                })
            }
            Capability::Mock => {
                spawn_periodic(|| mock::orientation_at(mock::wall_clock_ms()))
            }
        }
    }

    /// Stream of network link snapshots: one emission immediately on
    /// subscribe, then one per observed link state change.
    ///
    /// Without link introspection a single defaulted snapshot is emitted and
    /// the stream stays open with no further emissions.
    pub fn observe_network_status(&self) -> Subscription<NetworkStatus> {
        match self.caps.network {
            Capability::Native => {
                let root = self.paths.net.clone();
                spawn_on_change(move || read_link_status(&root))
            }
            Capability::Mock => spawn_static(NetworkStatus::unknown(true)),
        }
    }

    /// Stream of battery snapshots: one emission immediately, then one per
    /// level or charging-state change.
    pub fn observe_battery(&self) -> Subscription<BatteryReading> {
        match self.caps.battery {
            Capability::Native => {
                let root = self.paths.power.clone();
                spawn_on_change(move || read_battery(&root))
            }
            Capability::Mock => spawn_on_change(|| {
                // Whole-percent quantization so "change" is meaningful.
                let reading = mock::battery_at(mock::wall_clock_ms());
                BatteryReading {
                    level: reading.level.round(),
                    charging: reading.charging,
                }
            }),
        }
    }
}

/// Emit `produce()` on a fixed period, first emission immediately.
fn spawn_periodic<T, F>(mut produce: F) -> Subscription<T>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(MOCK_PERIOD);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            if tx.send(produce()).await.is_err() {
                break;
            }
        }
    });
    Subscription { rx, task }
}

/// Emit the current value immediately, then re-read on a poll cadence and
/// emit only when the value changes.
fn spawn_on_change<T, F>(mut read: F) -> Subscription<T>
where
    T: Clone + PartialEq + Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    let task = tokio::spawn(async move {
        let mut last = read();
        if tx.send(last.clone()).await.is_err() {
            return;
        }
        loop {
            tokio::time::sleep(CHANGE_POLL).await;
            let current = read();
            if current != last {
                if tx.send(current.clone()).await.is_err() {
                    break;
                }
                last = current;
            }
        }
    });
    Subscription { rx, task }
}

/// Emit one value and keep the stream open with no further emissions.
fn spawn_static<T: Send + 'static>(value: T) -> Subscription<T> {
    let (tx, rx) = mpsc::channel(1);
    let task = tokio::spawn(async move {
        if tx.send(value).await.is_err() {
            return;
        }
        std::future::pending::<()>().await;
    });
    Subscription { rx, task }
}

// ---------------------------------------------------------------------------
// Native sysfs readers
// ---------------------------------------------------------------------------

/// Resolved IIO channel files for one three-axis sensor.
struct AxisChannels {
    x: Option<PathBuf>,
    y: Option<PathBuf>,
    z: Option<PathBuf>,
    scale: f64,
}

impl AxisChannels {
    /// Locate the first IIO device exposing `<prefix>_x_raw` and resolve its
    /// per-axis channel files. Axes without a file stay `None` and read as 0.
    fn open(iio_root: &Path, prefix: &str) -> Self {
        let device = probe::find_iio_device(iio_root, &format!("{prefix}_x_raw"));
        let channel = |axis: &str| -> Option<PathBuf> {
            let path = device.as_ref()?.join(format!("{prefix}_{axis}_raw"));
            path.is_file().then_some(path)
        };
        let scale = device
            .as_ref()
            .and_then(|d| read_trimmed(&d.join(format!("{prefix}_scale"))))
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        Self {
            x: channel("x"),
            y: channel("y"),
            z: channel("z"),
            scale,
        }
    }

    fn read(&self) -> (f64, f64, f64) {
        (
            self.read_axis(&self.x),
            self.read_axis(&self.y),
            self.read_axis(&self.z),
        )
    }

    fn read_axis(&self, channel: &Option<PathBuf>) -> f64 {
        channel
            .as_deref()
            .and_then(read_trimmed)
            .and_then(|s| s.parse::<f64>().ok())
            .map(|raw| raw * self.scale)
            .unwrap_or(0.0)
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Snapshot link state from `/sys/class/net`: online if any physical
/// interface is up, downlink from its `speed` file, link type from the
/// presence of a `wireless` directory. RTT is not observable here.
fn read_link_status(net_root: &Path) -> NetworkStatus {
    let up = probe::net_interfaces(net_root)
        .into_iter()
        .find(|dir| read_trimmed(&dir.join("operstate")).as_deref() == Some("up"));

    match up {
        Some(dir) => NetworkStatus {
            online: true,
            // speed reads -1 when the driver doesn't know
            downlink: read_trimmed(&dir.join("speed"))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|mbps| *mbps > 0.0)
                .unwrap_or(0.0),
            rtt: 0.0,
            link_type: if dir.join("wireless").is_dir() {
                "wifi".to_string()
            } else {
                "ethernet".to_string()
            },
        },
        None => NetworkStatus::unknown(false),
    }
}

/// Snapshot battery state from `/sys/class/power_supply`.
fn read_battery(power_root: &Path) -> BatteryReading {
    let Some(dir) = probe::battery_supply(power_root) else {
        return BatteryReading {
            level: 0.0,
            charging: false,
        };
    };
    BatteryReading {
        level: read_trimmed(&dir.join("capacity"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0),
        charging: read_trimmed(&dir.join("status")).as_deref() == Some("Charging"),
    }
}
