#![forbid(unsafe_code)]

//! Fallible parse boundary from untyped documents to [`State`].
//!
//! Construction rules:
//!
//! - unknown keys are ignored,
//! - missing keys take the documented defaults,
//! - leaf type mismatches and invalid enum strings fail with the dotted
//!   field path and the expected type,
//! - construction never partially applies: the caller gets either a fully
//!   validated [`State`] or a [`SchemaError`].
//!
//! This is the only place raw documents are coerced into the typed tree;
//! business logic never sees an untyped value.

use crate::state::{
    Colorbar, ColorbarLimits, EditMode, LayerMode, LayerSettings, Layers, Limits, LimitsOrigin,
    Position, Presets, State, Tile, Tools,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Schema violation found while coercing a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("{path}: unknown value `{value}`, expected {allowed}")]
    InvalidEnum {
        path: String,
        value: String,
        allowed: &'static str,
    },

    #[error("layers.mode: edit mode references missing layer index {index}")]
    DanglingEditIndex { index: u64 },

    #[error("{path}: selection `{value}` is not in the available options")]
    SelectionUnavailable { path: String, value: String },
}

impl State {
    /// Coerce an untyped document into a validated state tree.
    pub fn from_document(doc: &Value) -> Result<Self, SchemaError> {
        let obj = expect_object(doc, "")?;
        let mut state = State {
            pattern: string_field(obj, "", "pattern", "")?,
            patterns: string_list(obj, "", "patterns")?,
            variable: string_field(obj, "", "variable", "")?,
            variables: string_list(obj, "", "variables")?,
            initial_time: time_field(obj, "", "initial_time")?,
            initial_times: time_list(obj, "", "initial_times")?,
            valid_time: time_field(obj, "", "valid_time")?,
            valid_times: time_list(obj, "", "valid_times")?,
            pressure: f64_field(obj, "", "pressure", 0.0)?,
            pressures: f64_list(obj, "", "pressures")?,
            colorbar: parse_colorbar(obj, "colorbar")?,
            layers: parse_layers(obj, "layers")?,
            tile: parse_tile(obj, "tile")?,
            tools: parse_tools(obj, "tools")?,
            position: parse_position(obj, "position")?,
            presets: parse_presets(obj, "presets")?,
        };
        validate(&mut state)?;
        Ok(state)
    }
}

/// Post-construction checks: the edit-mode invariant must hold, string
/// selections must be members of their non-empty option lists, and numeric
/// selections snap to the first available option when stale.
fn validate(state: &mut State) -> Result<(), SchemaError> {
    if state.layers.mode.state == EditMode::Edit
        && !state.layers.index.contains_key(&state.layers.mode.index)
    {
        return Err(SchemaError::DanglingEditIndex {
            index: state.layers.mode.index,
        });
    }
    member_of(&state.pattern, &state.patterns, "pattern")?;
    member_of(&state.variable, &state.variables, "variable")?;
    snap(&mut state.initial_time, &state.initial_times);
    snap(&mut state.valid_time, &state.valid_times);
    snap(&mut state.pressure, &state.pressures);
    state.colorbar.resolve();
    Ok(())
}

fn member_of(value: &str, options: &[String], path: &str) -> Result<(), SchemaError> {
    if value.is_empty() || options.is_empty() || options.iter().any(|o| o == value) {
        Ok(())
    } else {
        Err(SchemaError::SelectionUnavailable {
            path: path.to_string(),
            value: value.to_string(),
        })
    }
}

fn snap<T: PartialEq + Clone>(value: &mut T, options: &[T]) {
    if !options.is_empty() && !options.contains(value) {
        *value = options[0].clone();
    }
}

// ---------------------------------------------------------------------------
// Leaf coercion helpers
// ---------------------------------------------------------------------------

fn kind_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string `{s}`"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn mismatch(path: String, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path,
        expected,
        found: kind_of(value),
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| {
        mismatch(
            if path.is_empty() {
                "document".to_string()
            } else {
                path.to_string()
            },
            "object",
            value,
        )
    })
}

fn string_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    default: &str,
) -> Result<String, SchemaError> {
    match obj.get(key) {
        None => Ok(default.to_string()),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(join(path, key), "string", value)),
    }
}

fn f64_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    default: f64,
) -> Result<f64, SchemaError> {
    match obj.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| mismatch(join(path, key), "number", value)),
    }
}

fn usize_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    default: usize,
) -> Result<usize, SchemaError> {
    match obj.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| mismatch(join(path, key), "non-negative integer", value)),
    }
}

fn u64_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    default: u64,
) -> Result<u64, SchemaError> {
    match obj.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| mismatch(join(path, key), "non-negative integer", value)),
    }
}

fn bool_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    default: bool,
) -> Result<bool, SchemaError> {
    match obj.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| mismatch(join(path, key), "boolean", value)),
    }
}

fn parse_time(value: &Value, path: String) -> Result<DateTime<Utc>, SchemaError> {
    let text = value
        .as_str()
        .ok_or_else(|| mismatch(path.clone(), "RFC 3339 timestamp string", value))?;
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| mismatch(path, "RFC 3339 timestamp string", value))
}

fn time_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<DateTime<Utc>, SchemaError> {
    match obj.get(key) {
        None => Ok(DateTime::UNIX_EPOCH),
        Some(value) => parse_time(value, join(path, key)),
    }
}

fn list_items<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<Option<&'a [Value]>, SchemaError> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_array()
            .map(|items| Some(items.as_slice()))
            .ok_or_else(|| mismatch(join(path, key), "array", value)),
    }
}

fn string_list(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Vec<String>, SchemaError> {
    let Some(items) = list_items(obj, path, key)? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(format!("{}[{i}]", join(path, key)), "string", item))
        })
        .collect()
}

fn f64_list(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Vec<f64>, SchemaError> {
    let Some(items) = list_items(obj, path, key)? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64()
                .ok_or_else(|| mismatch(format!("{}[{i}]", join(path, key)), "number", item))
        })
        .collect()
}

fn time_list(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<Vec<DateTime<Utc>>, SchemaError> {
    let Some(items) = list_items(obj, path, key)? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_time(item, format!("{}[{i}]", join(path, key))))
        .collect()
}

fn u64_list(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Vec<u64>, SchemaError> {
    let Some(items) = list_items(obj, path, key)? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_u64().ok_or_else(|| {
                mismatch(
                    format!("{}[{i}]", join(path, key)),
                    "non-negative integer",
                    item,
                )
            })
        })
        .collect()
}

fn id_key(key: &str, path: &str) -> Result<u64, SchemaError> {
    key.parse().map_err(|_| SchemaError::TypeMismatch {
        path: join(path, key),
        expected: "non-negative integer key",
        found: format!("string `{key}`"),
    })
}

// ---------------------------------------------------------------------------
// Record parsers
// ---------------------------------------------------------------------------

fn child<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, SchemaError> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => expect_object(value, key).map(Some),
    }
}

fn parse_limits(obj: &Map<String, Value>, path: &str) -> Result<Limits, SchemaError> {
    let default = Limits::default();
    Ok(Limits {
        low: f64_field(obj, path, "low", default.low)?,
        high: f64_field(obj, path, "high", default.high)?,
    })
}

fn parse_limits_field(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<Limits, SchemaError> {
    match obj.get(key) {
        None => Ok(Limits::default()),
        Some(value) => {
            let nested = expect_object(value, &join(path, key))?;
            parse_limits(nested, &join(path, key))
        }
    }
}

fn parse_origin(obj: &Map<String, Value>, path: &str) -> Result<LimitsOrigin, SchemaError> {
    match obj.get("origin") {
        None => Ok(LimitsOrigin::default()),
        Some(value) => {
            let text = value
                .as_str()
                .ok_or_else(|| mismatch(join(path, "origin"), "string", value))?;
            match text {
                "user" => Ok(LimitsOrigin::User),
                "data" => Ok(LimitsOrigin::Data),
                other => Err(SchemaError::InvalidEnum {
                    path: join(path, "origin"),
                    value: other.to_string(),
                    allowed: LimitsOrigin::ALLOWED,
                }),
            }
        }
    }
}

fn parse_colorbar_at(obj: &Map<String, Value>, path: &str) -> Result<Colorbar, SchemaError> {
    let default = Colorbar::default();
    let limits = match child(obj, "limits")? {
        None => ColorbarLimits::default(),
        Some(nested) => {
            let nested_path = join(path, "limits");
            ColorbarLimits {
                origin: parse_origin(nested, &nested_path)?,
                data: parse_limits_field(nested, &nested_path, "data")?,
                user: parse_limits_field(nested, &nested_path, "user")?,
            }
        }
    };
    Ok(Colorbar {
        name: string_field(obj, path, "name", &default.name)?,
        names: string_list(obj, path, "names")?,
        number: usize_field(obj, path, "number", default.number)?,
        numbers: {
            u64_list(obj, path, "numbers")?
                .into_iter()
                .map(|n| n as usize)
                .collect()
        },
        limits,
        low: f64_field(obj, path, "low", default.low)?,
        high: f64_field(obj, path, "high", default.high)?,
        reverse: bool_field(obj, path, "reverse", false)?,
        invisible_min: bool_field(obj, path, "invisible_min", false)?,
        invisible_max: bool_field(obj, path, "invisible_max", false)?,
    })
}

fn parse_colorbar(obj: &Map<String, Value>, key: &str) -> Result<Colorbar, SchemaError> {
    match child(obj, key)? {
        None => Ok(Colorbar::default()),
        Some(nested) => parse_colorbar_at(nested, key),
    }
}

fn parse_layer_settings(
    obj: &Map<String, Value>,
    path: &str,
) -> Result<LayerSettings, SchemaError> {
    Ok(LayerSettings {
        label: string_field(obj, path, "label", "")?,
        dataset: string_field(obj, path, "dataset", "")?,
        variable: string_field(obj, path, "variable", "")?,
    })
}

fn parse_layers(obj: &Map<String, Value>, key: &str) -> Result<Layers, SchemaError> {
    let Some(nested) = child(obj, key)? else {
        return Ok(Layers::default());
    };
    let mut index = BTreeMap::new();
    if let Some(entries) = child(nested, "index")? {
        let index_path = join(key, "index");
        for (id, value) in entries {
            let id = id_key(id, &index_path)?;
            let settings_path = format!("{index_path}.{id}");
            let settings_obj = expect_object(value, &settings_path)?;
            index.insert(id, parse_layer_settings(settings_obj, &settings_path)?);
        }
    }
    let mode = match child(nested, "mode")? {
        None => LayerMode::default(),
        Some(mode_obj) => {
            let mode_path = join(key, "mode");
            let state = match mode_obj.get("state") {
                None => EditMode::default(),
                Some(value) => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| mismatch(join(&mode_path, "state"), "string", value))?;
                    match text {
                        "add" => EditMode::Add,
                        "edit" => EditMode::Edit,
                        other => {
                            return Err(SchemaError::InvalidEnum {
                                path: join(&mode_path, "state"),
                                value: other.to_string(),
                                allowed: EditMode::ALLOWED,
                            });
                        }
                    }
                }
            };
            LayerMode {
                state,
                index: u64_field(mode_obj, &mode_path, "index", 0)?,
            }
        }
    };
    Ok(Layers {
        figures: usize_field(nested, key, "figures", 1)?,
        index,
        active: u64_list(nested, key, "active")?,
        mode,
    })
}

fn parse_tile(obj: &Map<String, Value>, key: &str) -> Result<Tile, SchemaError> {
    let Some(nested) = child(obj, key)? else {
        return Ok(Tile::default());
    };
    let default = Tile::default();
    Ok(Tile {
        name: string_field(nested, key, "name", &default.name)?,
        labels: bool_field(nested, key, "labels", default.labels)?,
    })
}

fn parse_tools(obj: &Map<String, Value>, key: &str) -> Result<Tools, SchemaError> {
    let Some(nested) = child(obj, key)? else {
        return Ok(Tools::default());
    };
    Ok(Tools {
        time_series: bool_field(nested, key, "time_series", false)?,
        profile: bool_field(nested, key, "profile", false)?,
    })
}

fn parse_position(obj: &Map<String, Value>, key: &str) -> Result<Position, SchemaError> {
    let Some(nested) = child(obj, key)? else {
        return Ok(Position::default());
    };
    Ok(Position {
        x: f64_field(nested, key, "x", 0.0)?,
        y: f64_field(nested, key, "y", 0.0)?,
    })
}

fn parse_presets(obj: &Map<String, Value>, key: &str) -> Result<Presets, SchemaError> {
    let Some(nested) = child(obj, key)? else {
        return Ok(Presets::default());
    };
    let active = match nested.get("active") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .ok_or_else(|| mismatch(join(key, "active"), "non-negative integer", value))?,
        ),
    };
    let mut labels = BTreeMap::new();
    if let Some(entries) = child(nested, "labels")? {
        let labels_path = join(key, "labels");
        for (id, value) in entries {
            let id = id_key(id, &labels_path)?;
            let label = value
                .as_str()
                .ok_or_else(|| mismatch(format!("{labels_path}.{id}"), "string", value))?;
            labels.insert(id, label.to_string());
        }
    }
    let mut meta = BTreeMap::new();
    if let Some(entries) = child(nested, "meta")? {
        let meta_path = join(key, "meta");
        for (id, value) in entries {
            let id = id_key(id, &meta_path)?;
            let snapshot_path = format!("{meta_path}.{id}");
            let snapshot_obj = expect_object(value, &snapshot_path)?;
            meta.insert(id, parse_colorbar_at(snapshot_obj, &snapshot_path)?);
        }
    }
    Ok(Presets {
        active,
        labels,
        meta,
    })
}
