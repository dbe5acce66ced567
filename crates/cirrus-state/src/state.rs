#![forbid(unsafe_code)]

//! Application state tree.
//!
//! The state is a nested hierarchy of value records describing everything
//! the dashboard needs to render itself: dataset selection, active layers,
//! colorbar settings, basemap choice, tool flags, cursor position, and
//! saved presets. It is immutable by convention — the only component that
//! replaces it is the store, through the reducer.
//!
//! Each user-selectable scalar is paired with an `…s` sibling listing the
//! dataset-specific choices available for it. Once a sibling list is
//! non-empty, the selection is always a member of it; the reducer and the
//! parse boundary both maintain this.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Color map extent. `low` and `high` are the lower and upper limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Limits {
    pub low: f64,
    pub high: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
        }
    }
}

/// Which limits pair is authoritative for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitsOrigin {
    /// Limits supplied by the user.
    User,
    /// Limits derived from the plotted data.
    #[default]
    Data,
}

impl LimitsOrigin {
    pub const ALLOWED: &'static str = "`user` or `data`";

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Data => "data",
        }
    }
}

/// User and data-derived limit pairs, plus the origin selecting between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColorbarLimits {
    pub origin: LimitsOrigin,
    pub data: Limits,
    pub user: Limits,
}

impl ColorbarLimits {
    /// The pair `origin` points at.
    #[must_use]
    pub fn resolved(&self) -> Limits {
        match self.origin {
            LimitsOrigin::User => self.user,
            LimitsOrigin::Data => self.data,
        }
    }
}

/// Colorbar settings: palette choice, limit handling, and visibility flags.
///
/// `low`/`high` are the resolved values consumers read; they always mirror
/// whichever pair `limits.origin` selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colorbar {
    pub name: String,
    pub names: Vec<String>,
    pub number: usize,
    pub numbers: Vec<usize>,
    pub limits: ColorbarLimits,
    pub low: f64,
    pub high: f64,
    pub reverse: bool,
    pub invisible_min: bool,
    pub invisible_max: bool,
}

impl Default for Colorbar {
    fn default() -> Self {
        Self {
            name: "Viridis".to_string(),
            names: Vec::new(),
            number: 256,
            numbers: Vec::new(),
            limits: ColorbarLimits::default(),
            low: 0.0,
            high: 1.0,
            reverse: false,
            invisible_min: false,
            invisible_max: false,
        }
    }
}

impl Colorbar {
    /// Re-derive `low`/`high` from the authoritative limits pair.
    pub(crate) fn resolve(&mut self) {
        let limits = self.limits.resolved();
        self.low = limits.low;
        self.high = limits.high;
    }
}

/// Whether the layer dialog is adding a new layer or editing an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Add,
    Edit,
}

impl EditMode {
    pub const ALLOWED: &'static str = "`add` or `edit`";
}

/// Layer dialog mode. When `state` is [`EditMode::Edit`], `index` names the
/// layer whose settings are being overwritten — and is always a valid key
/// of [`Layers::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayerMode {
    pub state: EditMode,
    pub index: u64,
}

/// Per-layer settings edited through the layer dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerSettings {
    pub label: String,
    pub dataset: String,
    pub variable: String,
}

/// Layer bookkeeping: figure count, settings per layer id, active ordering,
/// and the dialog mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layers {
    pub figures: usize,
    pub index: BTreeMap<u64, LayerSettings>,
    pub active: Vec<u64>,
    pub mode: LayerMode,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            figures: 1,
            index: BTreeMap::new(),
            active: Vec::new(),
            mode: LayerMode::default(),
        }
    }
}

impl Layers {
    /// Next unused layer id.
    #[must_use]
    pub fn next_index(&self) -> u64 {
        self.index.keys().next_back().map_or(0, |last| last + 1)
    }
}

/// Web map tiling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub name: String,
    pub labels: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            name: "Open street map".to_string(),
            labels: false,
        }
    }
}

/// Flags for the optional analysis tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tools {
    pub time_series: bool,
    pub profile: bool,
}

/// X/Y position of the last tap, in map projection units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Saved colorbar presets, keyed by id. `meta` holds the snapshot applied
/// when a preset is loaded; `labels` holds the user-visible names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Presets {
    pub active: Option<u64>,
    pub labels: BTreeMap<u64, String>,
    pub meta: BTreeMap<u64, Colorbar>,
}

impl Presets {
    /// Next unused preset id.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.labels.keys().next_back().map_or(0, |last| last + 1)
    }

    /// Id of the preset with the given label, if any.
    #[must_use]
    pub fn id_of(&self, label: &str) -> Option<u64> {
        self.labels
            .iter()
            .find(|(_, name)| name.as_str() == label)
            .map(|(id, _)| *id)
    }
}

/// The application state container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct State {
    pub pattern: String,
    pub patterns: Vec<String>,
    pub variable: String,
    pub variables: Vec<String>,
    pub initial_time: DateTime<Utc>,
    pub initial_times: Vec<DateTime<Utc>>,
    pub valid_time: DateTime<Utc>,
    pub valid_times: Vec<DateTime<Utc>>,
    pub pressure: f64,
    pub pressures: Vec<f64>,
    pub colorbar: Colorbar,
    pub layers: Layers,
    pub tile: Tile,
    pub tools: Tools,
    pub position: Position,
    pub presets: Presets,
}

impl Default for State {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            patterns: Vec::new(),
            variable: String::new(),
            variables: Vec::new(),
            initial_time: DateTime::UNIX_EPOCH,
            initial_times: Vec::new(),
            valid_time: DateTime::UNIX_EPOCH,
            valid_times: Vec::new(),
            pressure: 0.0,
            pressures: Vec::new(),
            colorbar: Colorbar::default(),
            layers: Layers::default(),
            tile: Tile::default(),
            tools: Tools::default(),
            position: Position::default(),
            presets: Presets::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_limits_follow_origin() {
        let limits = ColorbarLimits {
            origin: LimitsOrigin::User,
            data: Limits {
                low: 0.0,
                high: 1.0,
            },
            user: Limits {
                low: -5.0,
                high: 5.0,
            },
        };
        assert_eq!(limits.resolved().low, -5.0);
        assert_eq!(limits.resolved().high, 5.0);
    }

    #[test]
    fn next_layer_index_skips_existing() {
        let mut layers = Layers::default();
        assert_eq!(layers.next_index(), 0);
        layers.index.insert(0, LayerSettings::default());
        layers.index.insert(3, LayerSettings::default());
        assert_eq!(layers.next_index(), 4);
    }

    #[test]
    fn preset_lookup_by_label() {
        let mut presets = Presets::default();
        presets.labels.insert(0, "default".to_string());
        presets.labels.insert(1, "stormy".to_string());
        assert_eq!(presets.id_of("stormy"), Some(1));
        assert_eq!(presets.id_of("missing"), None);
        assert_eq!(presets.next_id(), 2);
    }
}
