//! Entity model for the two persisted record kinds.
//!
//! Wire names are camelCase (`toolName`, `createdAt`, `isCharging`) to match
//! the REST surface. Records are immutable after creation: the store assigns
//! `id` and defaults the timestamp, and no update or delete exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, FieldSpec, Schema};

/// Outcome of a diagnostic test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagStatus {
    Pass,
    Fail,
    Pending,
}

impl std::fmt::Display for DiagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for DiagStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown status {other:?} (expected pass, fail, or pending)")),
        }
    }
}

/// Result of one diagnostic test run, as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub id: i64,
    pub tool_name: String,
    pub status: DiagStatus,
    /// Optional free text; serialized as `null` when absent.
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a [`DiagnosticResult`]. The store assigns the id and
/// defaults `created_at` to the creation time when not supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiagnostic {
    pub tool_name: String,
    pub status: DiagStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One battery level sample, as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryLog {
    pub id: i64,
    /// Percentage encoded as a string, 0-100 by convention (not enforced).
    pub level: String,
    pub is_charging: bool,
    pub timestamp: DateTime<Utc>,
}

/// Input for creating a [`BatteryLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatteryLog {
    pub level: String,
    #[serde(default)]
    pub is_charging: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Accepted values for the diagnostic `status` field.
pub const DIAG_STATUSES: &[&str] = &["pass", "fail", "pending"];

/// Schema for diagnostic create payloads.
pub static DIAGNOSTIC_SCHEMA: Schema = Schema {
    entity: "diagnosticResult",
    fields: &[
        FieldSpec {
            name: "toolName",
            kind: FieldKind::Text,
            required: true,
            one_of: None,
        },
        FieldSpec {
            name: "status",
            kind: FieldKind::Text,
            required: true,
            one_of: Some(DIAG_STATUSES),
        },
        FieldSpec {
            name: "details",
            kind: FieldKind::Text,
            required: false,
            one_of: None,
        },
        FieldSpec {
            name: "createdAt",
            kind: FieldKind::Timestamp,
            required: false,
            one_of: None,
        },
    ],
};

/// Schema for battery log create payloads.
///
/// `level` carries no numeric range check; 0-100 is convention only.
pub static BATTERY_LOG_SCHEMA: Schema = Schema {
    entity: "batteryLog",
    fields: &[
        FieldSpec {
            name: "level",
            kind: FieldKind::Text,
            required: true,
            one_of: None,
        },
        FieldSpec {
            name: "isCharging",
            kind: FieldKind::Bool,
            required: false,
            one_of: None,
        },
        FieldSpec {
            name: "timestamp",
            kind: FieldKind::Timestamp,
            required: false,
            one_of: None,
        },
    ],
};
