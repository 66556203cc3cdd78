//! Language-neutral schema descriptions and the validator that interprets them.
//!
//! A [`Schema`] is a static list of [`FieldSpec`]s — field name, kind,
//! required flag, optional enum constraint. [`Schema::validate`] checks a raw
//! JSON body against the description before it is ever deserialized into a
//! typed input, so a malformed payload is rejected with the offending field
//! path instead of an opaque decode error. Unknown fields are ignored.

use serde_json::Value;

use crate::error::ValidationError;

/// Primitive kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string.
    Text,
    /// JSON boolean.
    Bool,
    /// JSON string holding an RFC 3339 timestamp.
    Timestamp,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "string"),
            Self::Bool => write!(f, "boolean"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Description of a single entity field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name of the field (camelCase, e.g. `"toolName"`).
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Closed set of accepted values, for enum-like text fields.
    pub one_of: Option<&'static [&'static str]>,
}

/// Static schema for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Entity name used in error messages (e.g. `"diagnosticResult"`).
    pub entity: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Validate a raw JSON body against this schema.
    ///
    /// Required fields must be present, non-null, and (for text) non-empty.
    /// Present fields must match their declared kind and enum constraint.
    pub fn validate(&self, body: &Value) -> Result<(), ValidationError> {
        let obj = body.as_object().ok_or_else(|| {
            ValidationError::new("", format!("{} payload must be a JSON object", self.entity))
        })?;

        for field in self.fields {
            match obj.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(ValidationError::new(
                            field.name,
                            format!("{} is required", field.name),
                        ));
                    }
                }
                Some(value) => field.check(value)?,
            }
        }
        Ok(())
    }
}

impl FieldSpec {
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match self.kind {
            FieldKind::Text => {
                let s = value.as_str().ok_or_else(|| self.kind_error())?;
                if self.required && s.trim().is_empty() {
                    return Err(ValidationError::new(
                        self.name,
                        format!("{} must not be empty", self.name),
                    ));
                }
                if let Some(allowed) = self.one_of {
                    if !allowed.contains(&s) {
                        return Err(ValidationError::new(
                            self.name,
                            format!("{} must be one of: {}", self.name, allowed.join(", ")),
                        ));
                    }
                }
            }
            FieldKind::Bool => {
                value.as_bool().ok_or_else(|| self.kind_error())?;
            }
            FieldKind::Timestamp => {
                let s = value.as_str().ok_or_else(|| self.kind_error())?;
                chrono::DateTime::parse_from_rfc3339(s).map_err(|e| {
                    ValidationError::new(
                        self.name,
                        format!("{} is not a valid RFC 3339 timestamp: {e}", self.name),
                    )
                })?;
            }
        }
        Ok(())
    }

    fn kind_error(&self) -> ValidationError {
        ValidationError::new(self.name, format!("{} must be a {}", self.name, self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BATTERY_LOG_SCHEMA, DIAGNOSTIC_SCHEMA};
    use serde_json::json;

    #[test]
    fn accepts_valid_diagnostic() {
        let body = json!({"toolName": "Speaker Test", "status": "pass"});
        assert!(DIAGNOSTIC_SCHEMA.validate(&body).is_ok());
    }

    #[test]
    fn accepts_optional_details_and_timestamp() {
        let body = json!({
            "toolName": "Vibration",
            "status": "fail",
            "details": "no motor response",
            "createdAt": "2026-08-30T12:00:00Z",
        });
        assert!(DIAGNOSTIC_SCHEMA.validate(&body).is_ok());
    }

    #[test]
    fn rejects_missing_tool_name() {
        let body = json!({"status": "pass"});
        let err = DIAGNOSTIC_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "toolName");
    }

    #[test]
    fn rejects_null_required_field() {
        let body = json!({"toolName": null, "status": "pass"});
        let err = DIAGNOSTIC_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "toolName");
    }

    #[test]
    fn rejects_empty_tool_name() {
        let body = json!({"toolName": "  ", "status": "pass"});
        let err = DIAGNOSTIC_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "toolName");
    }

    #[test]
    fn rejects_status_outside_enum() {
        let body = json!({"toolName": "Camera", "status": "maybe"});
        let err = DIAGNOSTIC_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "status");
        assert!(err.message.contains("pass"));
    }

    #[test]
    fn rejects_wrong_type() {
        let body = json!({"toolName": 42, "status": "pass"});
        let err = DIAGNOSTIC_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "toolName");
        assert!(err.message.contains("string"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let err = DIAGNOSTIC_SCHEMA.validate(&json!([1, 2, 3])).unwrap_err();
        assert!(err.message.contains("JSON object"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let body = json!({"toolName": "Mic", "status": "pending", "extra": 1});
        assert!(DIAGNOSTIC_SCHEMA.validate(&body).is_ok());
    }

    #[test]
    fn battery_level_has_no_range_check() {
        // Out-of-range levels pass schema validation; the 0-100 bound is
        // convention only.
        let body = json!({"level": "150"});
        assert!(BATTERY_LOG_SCHEMA.validate(&body).is_ok());
    }

    #[test]
    fn battery_rejects_numeric_level() {
        let body = json!({"level": 85});
        let err = BATTERY_LOG_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "level");
    }

    #[test]
    fn battery_rejects_non_bool_charging() {
        let body = json!({"level": "80", "isCharging": "yes"});
        let err = BATTERY_LOG_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "isCharging");
    }

    #[test]
    fn rejects_bad_timestamp() {
        let body = json!({"level": "80", "timestamp": "yesterday"});
        let err = BATTERY_LOG_SCHEMA.validate(&body).unwrap_err();
        assert_eq!(err.field, "timestamp");
    }
}
