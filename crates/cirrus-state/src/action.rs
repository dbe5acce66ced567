#![forbid(unsafe_code)]

//! Actions: tagged messages describing intended state transitions.
//!
//! Inside the process actions are plain enum values. At the edge they
//! arrive as tagged `{kind, payload}` records; [`Action::from_document`]
//! decodes those, mapping unrecognized kinds to [`Action::Unknown`] so the
//! reducer stays total across protocol versions.

use crate::document::SchemaError;
use crate::state::{LayerMode, LayerSettings, Limits, LimitsOrigin};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Analysis tools that can be toggled on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    TimeSeries,
    Profile,
}

/// A tagged message describing an intended state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPattern(String),
    SetPatterns(Vec<String>),
    SetVariable(String),
    SetVariables(Vec<String>),
    SetInitialTime(DateTime<Utc>),
    SetInitialTimes(Vec<DateTime<Utc>>),
    SetValidTime(DateTime<Utc>),
    SetValidTimes(Vec<DateTime<Utc>>),
    SetPressure(f64),
    SetPressures(Vec<f64>),

    SetFigures(usize),
    /// Allocate the next free layer id for `settings` and enter edit mode
    /// on it.
    AddLayer {
        settings: LayerSettings,
    },
    /// Overwrite the settings stored under an existing layer id.
    SaveLayer {
        index: u64,
        settings: LayerSettings,
    },
    RemoveLayer {
        index: u64,
    },
    SetActiveLayers(Vec<u64>),
    SetLayerMode(LayerMode),

    SetPalette(String),
    SetPaletteNames(Vec<String>),
    SetPaletteNumber(usize),
    SetPaletteNumbers(Vec<usize>),
    SetLimitsOrigin(LimitsOrigin),
    SetUserLimits(Limits),
    SetDataLimits(Limits),
    SetReverse(bool),
    SetInvisibleMin(bool),
    SetInvisibleMax(bool),

    SetTileName(String),
    SetTileLabels(bool),
    SetTool {
        tool: Tool,
        active: bool,
    },
    SetPosition {
        x: f64,
        y: f64,
    },

    /// Snapshot the current colorbar settings under `label` (overwriting a
    /// preset that already carries that label).
    SavePreset {
        label: String,
    },
    LoadPreset {
        id: u64,
    },
    RemovePreset {
        id: u64,
    },

    /// An action kind this build does not recognize. Always an identity
    /// transition, never an error.
    Unknown {
        kind: String,
    },
}

impl Action {
    /// Decode a tagged `{kind, payload}` record.
    ///
    /// Unknown kinds decode to [`Action::Unknown`]; malformed payloads for
    /// known kinds are schema errors.
    pub fn from_document(doc: &Value) -> Result<Self, SchemaError> {
        let obj = doc.as_object().ok_or_else(|| SchemaError::TypeMismatch {
            path: "action".to_string(),
            expected: "object",
            found: kind_name(doc),
        })?;
        let kind = obj
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::TypeMismatch {
                path: "action.kind".to_string(),
                expected: "string",
                found: kind_name(obj.get("kind").unwrap_or(&Value::Null)),
            })?;
        let payload = obj.get("payload").unwrap_or(&Value::Null);
        decode(kind, payload)
    }
}

fn kind_name(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn payload_error(kind: &str, expected: &'static str, payload: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path: format!("action.payload ({kind})"),
        expected,
        found: kind_name(payload),
    }
}

fn as_string(kind: &str, payload: &Value) -> Result<String, SchemaError> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| payload_error(kind, "string", payload))
}

fn as_f64(kind: &str, payload: &Value) -> Result<f64, SchemaError> {
    payload
        .as_f64()
        .ok_or_else(|| payload_error(kind, "number", payload))
}

fn as_u64(kind: &str, payload: &Value) -> Result<u64, SchemaError> {
    payload
        .as_u64()
        .ok_or_else(|| payload_error(kind, "non-negative integer", payload))
}

fn as_bool(kind: &str, payload: &Value) -> Result<bool, SchemaError> {
    payload
        .as_bool()
        .ok_or_else(|| payload_error(kind, "boolean", payload))
}

fn as_time(kind: &str, payload: &Value) -> Result<DateTime<Utc>, SchemaError> {
    let text = payload
        .as_str()
        .ok_or_else(|| payload_error(kind, "RFC 3339 timestamp string", payload))?;
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| payload_error(kind, "RFC 3339 timestamp string", payload))
}

fn as_list<'a>(kind: &str, payload: &'a Value) -> Result<&'a [Value], SchemaError> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| payload_error(kind, "array", payload))
}

fn string_list(kind: &str, payload: &Value) -> Result<Vec<String>, SchemaError> {
    as_list(kind, payload)?
        .iter()
        .map(|item| as_string(kind, item))
        .collect()
}

fn time_list(kind: &str, payload: &Value) -> Result<Vec<DateTime<Utc>>, SchemaError> {
    as_list(kind, payload)?
        .iter()
        .map(|item| as_time(kind, item))
        .collect()
}

fn f64_list(kind: &str, payload: &Value) -> Result<Vec<f64>, SchemaError> {
    as_list(kind, payload)?
        .iter()
        .map(|item| as_f64(kind, item))
        .collect()
}

fn u64_list(kind: &str, payload: &Value) -> Result<Vec<u64>, SchemaError> {
    as_list(kind, payload)?
        .iter()
        .map(|item| as_u64(kind, item))
        .collect()
}

fn field<'a>(kind: &str, payload: &'a Value, key: &'static str) -> Result<&'a Value, SchemaError> {
    payload
        .as_object()
        .and_then(|obj| obj.get(key))
        .ok_or_else(|| SchemaError::TypeMismatch {
            path: format!("action.payload.{key} ({kind})"),
            expected: "present field",
            found: "missing".to_string(),
        })
}

fn as_settings(kind: &str, payload: &Value) -> Result<LayerSettings, SchemaError> {
    Ok(LayerSettings {
        label: as_string(kind, field(kind, payload, "label")?)?,
        dataset: as_string(kind, field(kind, payload, "dataset")?)?,
        variable: as_string(kind, field(kind, payload, "variable")?)?,
    })
}

fn as_limits(kind: &str, payload: &Value) -> Result<Limits, SchemaError> {
    Ok(Limits {
        low: as_f64(kind, field(kind, payload, "low")?)?,
        high: as_f64(kind, field(kind, payload, "high")?)?,
    })
}

fn decode(kind: &str, payload: &Value) -> Result<Action, SchemaError> {
    let action = match kind {
        "set_pattern" => Action::SetPattern(as_string(kind, payload)?),
        "set_patterns" => Action::SetPatterns(string_list(kind, payload)?),
        "set_variable" => Action::SetVariable(as_string(kind, payload)?),
        "set_variables" => Action::SetVariables(string_list(kind, payload)?),
        "set_initial_time" => Action::SetInitialTime(as_time(kind, payload)?),
        "set_initial_times" => Action::SetInitialTimes(time_list(kind, payload)?),
        "set_valid_time" => Action::SetValidTime(as_time(kind, payload)?),
        "set_valid_times" => Action::SetValidTimes(time_list(kind, payload)?),
        "set_pressure" => Action::SetPressure(as_f64(kind, payload)?),
        "set_pressures" => Action::SetPressures(f64_list(kind, payload)?),
        "set_figures" => Action::SetFigures(as_u64(kind, payload)? as usize),
        "add_layer" => Action::AddLayer {
            settings: as_settings(kind, payload)?,
        },
        "save_layer" => Action::SaveLayer {
            index: as_u64(kind, field(kind, payload, "index")?)?,
            settings: as_settings(kind, field(kind, payload, "settings")?)?,
        },
        "remove_layer" => Action::RemoveLayer {
            index: as_u64(kind, payload)?,
        },
        "set_active_layers" => Action::SetActiveLayers(u64_list(kind, payload)?),
        "set_layer_mode" => {
            let state = match as_string(kind, field(kind, payload, "state")?)?.as_str() {
                "add" => crate::state::EditMode::Add,
                "edit" => crate::state::EditMode::Edit,
                other => {
                    return Err(SchemaError::InvalidEnum {
                        path: format!("action.payload.state ({kind})"),
                        value: other.to_string(),
                        allowed: crate::state::EditMode::ALLOWED,
                    });
                }
            };
            Action::SetLayerMode(LayerMode {
                state,
                index: as_u64(kind, field(kind, payload, "index")?)?,
            })
        }
        "set_palette" => Action::SetPalette(as_string(kind, payload)?),
        "set_palette_names" => Action::SetPaletteNames(string_list(kind, payload)?),
        "set_palette_number" => Action::SetPaletteNumber(as_u64(kind, payload)? as usize),
        "set_palette_numbers" => Action::SetPaletteNumbers(
            u64_list(kind, payload)?
                .into_iter()
                .map(|n| n as usize)
                .collect(),
        ),
        "set_limits_origin" => match as_string(kind, payload)?.as_str() {
            "user" => Action::SetLimitsOrigin(LimitsOrigin::User),
            "data" => Action::SetLimitsOrigin(LimitsOrigin::Data),
            other => {
                return Err(SchemaError::InvalidEnum {
                    path: format!("action.payload ({kind})"),
                    value: other.to_string(),
                    allowed: LimitsOrigin::ALLOWED,
                });
            }
        },
        "set_user_limits" => Action::SetUserLimits(as_limits(kind, payload)?),
        "set_data_limits" => Action::SetDataLimits(as_limits(kind, payload)?),
        "set_reverse" => Action::SetReverse(as_bool(kind, payload)?),
        "set_invisible_min" => Action::SetInvisibleMin(as_bool(kind, payload)?),
        "set_invisible_max" => Action::SetInvisibleMax(as_bool(kind, payload)?),
        "set_tile_name" => Action::SetTileName(as_string(kind, payload)?),
        "set_tile_labels" => Action::SetTileLabels(as_bool(kind, payload)?),
        "set_tool" => {
            let tool = match as_string(kind, field(kind, payload, "tool")?)?.as_str() {
                "time_series" => Tool::TimeSeries,
                "profile" => Tool::Profile,
                other => {
                    return Err(SchemaError::InvalidEnum {
                        path: format!("action.payload.tool ({kind})"),
                        value: other.to_string(),
                        allowed: "`time_series` or `profile`",
                    });
                }
            };
            Action::SetTool {
                tool,
                active: as_bool(kind, field(kind, payload, "active")?)?,
            }
        }
        "set_position" => Action::SetPosition {
            x: as_f64(kind, field(kind, payload, "x")?)?,
            y: as_f64(kind, field(kind, payload, "y")?)?,
        },
        "save_preset" => Action::SavePreset {
            label: as_string(kind, payload)?,
        },
        "load_preset" => Action::LoadPreset {
            id: as_u64(kind, payload)?,
        },
        "remove_preset" => Action::RemovePreset {
            id: as_u64(kind, payload)?,
        },
        other => Action::Unknown {
            kind: other.to_string(),
        },
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_scalar_payload() {
        let action =
            Action::from_document(&json!({"kind": "set_pattern", "payload": "ga6"})).unwrap();
        assert_eq!(action, Action::SetPattern("ga6".to_string()));
    }

    #[test]
    fn decodes_structured_payload() {
        let action = Action::from_document(&json!({
            "kind": "save_layer",
            "payload": {
                "index": 3,
                "settings": {"label": "wind", "dataset": "ga6", "variable": "u"},
            },
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::SaveLayer {
                index: 3,
                settings: LayerSettings {
                    label: "wind".to_string(),
                    dataset: "ga6".to_string(),
                    variable: "u".to_string(),
                },
            }
        );
    }

    #[test]
    fn unknown_kind_decodes_to_unknown() {
        let action =
            Action::from_document(&json!({"kind": "set_flux_capacitor", "payload": 88})).unwrap();
        assert_eq!(
            action,
            Action::Unknown {
                kind: "set_flux_capacitor".to_string()
            }
        );
    }

    #[test]
    fn malformed_payload_for_known_kind_is_an_error() {
        let err =
            Action::from_document(&json!({"kind": "set_pressure", "payload": "high"})).unwrap_err();
        assert!(err.to_string().contains("set_pressure"));
    }

    #[test]
    fn missing_kind_is_an_error() {
        let err = Action::from_document(&json!({"payload": 1})).unwrap_err();
        assert!(err.to_string().starts_with("action.kind"));
    }
}
