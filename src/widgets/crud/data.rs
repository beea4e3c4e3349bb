//! Data operations behind the record editor.
//!
//! A configured [`ApiDescriptor`] says how to load, save or delete records; a
//! [`DataBackend`] actually does it. Requests never run inside `update`: each
//! becomes a [`Cmd::Perform`] whose future yields a `DATA_<OP>_COMPLETED`
//! action carrying `{result, operation}`. A failed operation carries
//! `{"error": <message>}` as its result and adds `failed: true`.
//!
//! Backends may block: the call runs on tokio's blocking pool, never on the
//! thread driving the update loop.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::command::Cmd;
use crate::config::ApiDescriptor;
use crate::error::DataError;
use crate::event::message::{Message, Payload};
use crate::event::names;

/// One of the three data operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataOp {
    Load,
    Save,
    Delete,
}

impl DataOp {
    /// Lowercase name, as carried in the completion payload.
    pub fn as_str(self) -> &'static str {
        match self {
            DataOp::Load => "load",
            DataOp::Save => "save",
            DataOp::Delete => "delete",
        }
    }

    /// Action name delivered when the operation finishes.
    pub fn completion_event(self) -> &'static str {
        match self {
            DataOp::Load => names::DATA_LOAD_COMPLETED,
            DataOp::Save => names::DATA_SAVE_COMPLETED,
            DataOp::Delete => names::DATA_DELETE_COMPLETED,
        }
    }
}

impl fmt::Display for DataOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Executes data operations.
///
/// `data` is the submitted form values for saves and the selected row for
/// deletes; loads receive `None`. Called from a blocking-pool thread, so
/// implementations are free to do synchronous I/O.
pub trait DataBackend: Send + Sync {
    fn execute(&self, op: DataOp, api: &ApiDescriptor, data: Option<Value>) -> Result<Value, DataError>;
}

/// Backend without a server: loads return the descriptor's inline `data`,
/// saves and deletes echo what they were given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBackend;

impl DataBackend for StaticBackend {
    fn execute(&self, op: DataOp, api: &ApiDescriptor, data: Option<Value>) -> Result<Value, DataError> {
        match op {
            DataOp::Load => Ok(api.data.clone().unwrap_or_else(|| Value::Array(Vec::new()))),
            DataOp::Save | DataOp::Delete => data.ok_or(DataError::MissingData {
                operation: op.as_str(),
            }),
        }
    }
}

impl<F> DataBackend for F
where
    F: Fn(DataOp, &ApiDescriptor, Option<Value>) -> Result<Value, DataError> + Send + Sync,
{
    fn execute(&self, op: DataOp, api: &ApiDescriptor, data: Option<Value>) -> Result<Value, DataError> {
        self(op, api, data)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build the deferred command for `op`, or `Cmd::None` if `api` is absent.
pub fn request(
    backend: &Arc<dyn DataBackend>,
    op: DataOp,
    api: Option<&ApiDescriptor>,
    data: Option<Value>,
) -> Cmd {
    let Some(api) = api else {
        tracing::trace!(operation = %op, "no descriptor; nothing to request");
        return Cmd::None;
    };
    let backend = Arc::clone(backend);
    let api = api.clone();
    tracing::debug!(operation = %op, endpoint = %api.endpoint, "data request issued");
    Cmd::perform(async move {
        let outcome = tokio::task::spawn_blocking(move || backend.execute(op, &api, data))
            .await
            .unwrap_or_else(|join| {
                Err(DataError::Interrupted {
                    operation: op.as_str(),
                    reason: join.to_string(),
                })
            });
        let mut completion = Payload::new();
        match outcome {
            Ok(value) => {
                completion.insert("result".into(), value);
            }
            Err(err) => {
                tracing::warn!(operation = %op, error = %err, "data operation failed");
                completion.insert("result".into(), json!({ "error": err.to_string() }));
                completion.insert("failed".into(), Value::Bool(true));
            }
        }
        completion.insert("operation".into(), Value::from(op.as_str()));
        Message::action_with(op.completion_event(), completion)
    })
}

/// Whether a completion payload reports success.
pub fn succeeded(completion: &Payload) -> bool {
    !completion
        .get("failed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// ===========================================================================
// Tests
// ===========================================================================
