//! # devicepulse-core
//!
//! Core library for the devicepulse telemetry toolkit: live sensor streams
//! with transparent mock fallback, schema-validated entity inputs, and an
//! append-only store for diagnostic results and battery samples.
//!
//! ## Quick Start
//!
//! ```no_run
//! use devicepulse_core::{SensorAdapter, TelemetryStore};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! // Probe this machine once and stream readings; absent capabilities
//! // fall back to deterministic mock generation.
//! let adapter = SensorAdapter::detect();
//! let mut accel = adapter.observe_acceleration();
//! while let Some(reading) = accel.recv().await {
//!     println!("x={:.2} y={:.2} z={:.2}", reading.x, reading.y, reading.z);
//! }
//!
//! // Append-only telemetry store, journaled to disk.
//! let store = TelemetryStore::open("./data")?;
//! store.seed().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Probe → Adapter (streams) → consumers, and
//! validated input → Store (append) → list.
//!
//! Capability decisions happen once, at adapter construction; each
//! `observe_*` call owns its producing task and stops it on unsubscribe.
//! The store's only mutation is append: records are immutable, ids
//! monotonic, listing ordered by timestamp.

pub mod adapter;
pub mod error;
pub mod hardware;
pub mod mock;
pub mod model;
pub mod probe;
pub mod schema;
pub mod sensor;
pub mod store;

pub use adapter::{SensorAdapter, Subscription};
pub use error::{StoreError, ValidationError};
pub use hardware::{DeviceInfo, detect_device_info};
pub use model::{
    BATTERY_LOG_SCHEMA, BatteryLog, DIAG_STATUSES, DIAGNOSTIC_SCHEMA, DiagStatus,
    DiagnosticResult, NewBatteryLog, NewDiagnostic,
};
pub use probe::{Capabilities, Capability, CapabilityProbe, FixedProbe, SysfsPaths, SysfsProbe};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use sensor::{AccelReading, BatteryReading, NetworkStatus, OrientationReading};
pub use store::TelemetryStore;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
