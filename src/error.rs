//! Error types.
//!
//! Nothing here crosses a widget's `update` boundary: callers log these and
//! fall back to default behaviour.

use thiserror::Error;

use crate::widget::ComponentId;

/// A configuration value could not be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration must be a mapping, got {found}")]
    NotAMapping { found: &'static str },

    #[error("invalid value for `{key}`: {reason}")]
    InvalidField { key: String, reason: String },
}

/// A message could not be dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("targeted message to `{target}` nested deeper than {depth} levels")]
    UnwrapDepthExceeded { depth: usize, target: ComponentId },
}

/// A data backend could not complete an operation.
///
/// Reported to the widget as `{"error": "<message>"}` inside the completion
/// payload's `result`, with `failed: true` beside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("{operation} via `{endpoint}` failed: {reason}")]
    Rejected {
        operation: &'static str,
        endpoint: String,
        reason: String,
    },

    #[error("{operation} needs data but none was given")]
    MissingData { operation: &'static str },

    #[error("{operation} did not finish: {reason}")]
    Interrupted {
        operation: &'static str,
        reason: String,
    },
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::NotAMapping { found: "array" };
        assert_eq!(err.to_string(), "configuration must be a mapping, got array");

        let err = ConfigError::InvalidField {
            key: "bindings".into(),
            reason: "expected a list".into(),
        };
        assert_eq!(err.to_string(), "invalid value for `bindings`: expected a list");
    }

    #[test]
    fn dispatch_error_display() {
        let err = DispatchError::UnwrapDepthExceeded {
            depth: 32,
            target: ComponentId::new("crud"),
        };
        assert_eq!(
            err.to_string(),
            "targeted message to `crud` nested deeper than 32 levels"
        );
    }

    #[test]
    fn data_error_display() {
        let err = DataError::Rejected {
            operation: "save",
            endpoint: "/users".into(),
            reason: "conflict".into(),
        };
        assert_eq!(err.to_string(), "save via `/users` failed: conflict");
        assert_eq!(
            DataError::MissingData { operation: "delete" }.to_string(),
            "delete needs data but none was given"
        );
        let err = DataError::Interrupted {
            operation: "load",
            reason: "task panicked".into(),
        };
        assert_eq!(err.to_string(), "load did not finish: task panicked");
    }

    #[test]
    fn value_kind_names() {
        assert_eq!(value_kind(&serde_json::json!([])), "array");
        assert_eq!(value_kind(&serde_json::json!({})), "mapping");
        assert_eq!(value_kind(&serde_json::json!(null)), "null");
    }
}
