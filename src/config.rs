//! Widget configuration from generic property maps.
//!
//! Configuration arrives as a JSON-style mapping. Extraction is lenient: every
//! key is optional, a value of the wrong type falls back to its default with a
//! warning, and a malformed entry inside a list is dropped on its own.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{value_kind, ConfigError};
use crate::event::binding::{Binding, Bindings};
use crate::event::input::KeyEvent;
use crate::event::message::Payload;

/// Generic property map.
pub type Props = Map<String, Value>;

// ---------------------------------------------------------------------------
// Data API
// ---------------------------------------------------------------------------

/// Describes how to perform one data operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiDescriptor {
    pub endpoint: String,
    pub method: String,
    pub params: Payload,
    /// Inline data; the static backend serves this for loads.
    pub data: Option<Value>,
}

/// Which data operations are available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataApi {
    pub load: Option<ApiDescriptor>,
    pub save: Option<ApiDescriptor>,
    pub delete: Option<ApiDescriptor>,
}

impl DataApi {
    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            tracing::warn!(found = value_kind(value), "`data_api` is not a mapping; ignoring");
            return Self::default();
        };
        let descriptor = |key: &str| {
            map.get(key)
                .and_then(|v| parse_entry::<ApiDescriptor>("data_api", key, v))
        };
        Self {
            load: descriptor("load"),
            save: descriptor("save"),
            delete: descriptor("delete"),
        }
    }

    /// Whether no operation is configured.
    pub fn is_empty(&self) -> bool {
        self.load.is_none() && self.save.is_none() && self.delete.is_none()
    }
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Password,
    Number,
}

/// Describes one form field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: String,
    pub placeholder: String,
}

impl FieldSpec {
    /// A plain text field labelled with its name.
    pub fn text(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Label shown next to the input; falls back to the name.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// One table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Row key this column reads.
    pub key: String,
    pub title: String,
    pub width: Option<u16>,
}

impl ColumnSpec {
    /// A column titled with its key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            title: key.clone(),
            key,
            width: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumn {
    Key(String),
    Full {
        key: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        width: Option<u16>,
    },
}

impl From<RawColumn> for ColumnSpec {
    fn from(raw: RawColumn) -> Self {
        match raw {
            RawColumn::Key(key) => ColumnSpec::new(key),
            RawColumn::Full { key, title, width } => ColumnSpec {
                title: title.unwrap_or_else(|| key.clone()),
                key,
                width,
            },
        }
    }
}

/// Nested table configuration (`table_props`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableConfig {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Payload>,
    pub height: Option<u16>,
    pub bindings: Bindings,
}

impl TableConfig {
    /// Extract from a `table_props` mapping.
    pub fn from_props(props: &Props) -> Self {
        let columns = list_field::<RawColumn>(props, "columns")
            .unwrap_or_default()
            .into_iter()
            .map(ColumnSpec::from)
            .collect();
        let rows = list_field::<Payload>(props, "rows").unwrap_or_default();
        Self {
            columns,
            rows,
            height: u16_field(props, "height"),
            bindings: bindings_field(props).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A named action: publishing `event` with `payload`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionSpec {
    pub event: String,
    pub description: String,
    pub payload: Payload,
}

// ---------------------------------------------------------------------------
// WidgetConfig
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawBinding {
    key: String,
    event: String,
    #[serde(default)]
    description: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Typed configuration extracted from a property map.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub title: String,
    pub height: Option<u16>,
    pub width: Option<u16>,
    pub focused: bool,
    pub bindings: Bindings,
    pub data_api: DataApi,
    pub form_fields: Vec<FieldSpec>,
    pub table_props: TableConfig,
    pub actions: BTreeMap<String, ActionSpec>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            height: None,
            width: None,
            focused: false,
            bindings: Bindings::crud_defaults(),
            data_api: DataApi::default(),
            form_fields: Vec::new(),
            table_props: TableConfig::default(),
            actions: BTreeMap::new(),
        }
    }
}

impl WidgetConfig {
    /// Extract from a property map. Never fails; bad values become defaults.
    pub fn from_props(props: &Props) -> Self {
        let table_props = match props.get("table_props") {
            Some(Value::Object(nested)) => TableConfig::from_props(nested),
            Some(other) => {
                tracing::warn!(found = value_kind(other), "`table_props` is not a mapping; ignoring");
                TableConfig::default()
            }
            None => TableConfig::default(),
        };

        let actions = match props.get("actions") {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(name, v)| {
                    parse_entry::<ActionSpec>("actions", name, v).map(|spec| (name.clone(), spec))
                })
                .collect(),
            Some(other) => {
                tracing::warn!(found = value_kind(other), "`actions` is not a mapping; ignoring");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };

        Self {
            title: str_field(props, "title").unwrap_or_default(),
            height: u16_field(props, "height"),
            width: u16_field(props, "width"),
            focused: bool_field(props, "focused").unwrap_or(false),
            bindings: bindings_field(props).unwrap_or_else(Bindings::crud_defaults),
            data_api: props
                .get("data_api")
                .map(DataApi::from_value)
                .unwrap_or_default(),
            form_fields: list_field::<FieldSpec>(props, "form_fields")
                .unwrap_or_default()
                .into_iter()
                .filter(|f| !f.name.is_empty())
                .collect(),
            table_props,
            actions,
        }
    }

    /// Extract from any JSON value, which must be a mapping.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(props) => Ok(Self::from_props(props)),
            other => Err(ConfigError::NotAMapping {
                found: value_kind(other),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn str_field(props: &Props, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            tracing::warn!(key, found = value_kind(other), "expected a string; using default");
            None
        }
    }
}

fn bool_field(props: &Props, key: &str) -> Option<bool> {
    match props.get(key)? {
        Value::Bool(b) => Some(*b),
        other => {
            tracing::warn!(key, found = value_kind(other), "expected a boolean; using default");
            None
        }
    }
}

fn u16_field(props: &Props, key: &str) -> Option<u16> {
    let value = props.get(key)?;
    match value.as_u64().and_then(|n| u16::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            tracing::warn!(key, value = %value, "expected a small non-negative integer; using default");
            None
        }
    }
}

/// Deserialize each element of a list, dropping the ones that don't fit.
fn list_field<T: DeserializeOwned>(props: &Props, key: &str) -> Option<Vec<T>> {
    match props.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| parse_entry::<T>(key, &i.to_string(), item))
                .collect(),
        ),
        other => {
            tracing::warn!(key, found = value_kind(other), "expected a list; using default");
            None
        }
    }
}

fn parse_entry<T: DeserializeOwned>(section: &str, entry: &str, value: &Value) -> Option<T> {
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            let err = ConfigError::InvalidField {
                key: format!("{section}.{entry}"),
                reason: err.to_string(),
            };
            tracing::warn!(error = %err, "dropping malformed entry");
            None
        }
    }
}

/// `bindings` list, or `None` if absent or not a list.
fn bindings_field(props: &Props) -> Option<Bindings> {
    let raw = list_field::<RawBinding>(props, "bindings")?;
    let bindings = raw
        .into_iter()
        .filter_map(|b| match b.key.parse::<KeyEvent>() {
            Ok(key) => Some(Binding {
                key,
                event: b.event,
                description: b.description,
                enabled: b.enabled,
            }),
            Err(err) => {
                tracing::warn!(error = %err, event = %b.event, "dropping binding");
                None
            }
        })
        .collect::<Vec<_>>();
    Some(Bindings::from(bindings))
}

// ===========================================================================
// Tests
// ===========================================================================
