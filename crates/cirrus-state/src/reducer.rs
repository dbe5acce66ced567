#![forbid(unsafe_code)]

//! The pure, total state transition function.
//!
//! `reduce` never fails: unknown actions are the identity transition, and
//! actions that would break an invariant (editing a missing layer, loading
//! a missing preset) leave the state unchanged. Invariants maintained here:
//!
//! - a non-empty selection is a member of its non-empty sibling list,
//! - `layers.mode.state == Edit` implies `layers.mode.index` is a key of
//!   `layers.index`,
//! - `colorbar.low`/`high` always mirror the authoritative limits pair.

use crate::action::{Action, Tool};
use crate::state::{EditMode, LayerMode, State};

/// Compute the next state from the current state and an action.
#[must_use]
pub fn reduce(state: &State, action: &Action) -> State {
    let mut next = state.clone();
    match action {
        Action::SetPattern(value) => {
            select_string(&mut next.pattern, value, &next.patterns);
        }
        Action::SetPatterns(values) => {
            next.patterns = values.clone();
            reselect_string(&mut next.pattern, &next.patterns);
        }
        Action::SetVariable(value) => {
            select_string(&mut next.variable, value, &next.variables);
        }
        Action::SetVariables(values) => {
            next.variables = values.clone();
            reselect_string(&mut next.variable, &next.variables);
        }
        Action::SetInitialTime(value) => {
            select(&mut next.initial_time, value, &next.initial_times);
        }
        Action::SetInitialTimes(values) => {
            next.initial_times = values.clone();
            reselect(&mut next.initial_time, &next.initial_times);
        }
        Action::SetValidTime(value) => {
            select(&mut next.valid_time, value, &next.valid_times);
        }
        Action::SetValidTimes(values) => {
            next.valid_times = values.clone();
            reselect(&mut next.valid_time, &next.valid_times);
        }
        Action::SetPressure(value) => {
            select(&mut next.pressure, value, &next.pressures);
        }
        Action::SetPressures(values) => {
            next.pressures = values.clone();
            reselect(&mut next.pressure, &next.pressures);
        }

        Action::SetFigures(count) => next.layers.figures = *count,
        Action::AddLayer { settings } => {
            let index = next.layers.next_index();
            next.layers.index.insert(index, settings.clone());
            next.layers.active.push(index);
            next.layers.mode = LayerMode {
                state: EditMode::Edit,
                index,
            };
        }
        Action::SaveLayer { index, settings } => {
            next.layers.index.insert(*index, settings.clone());
        }
        Action::RemoveLayer { index } => {
            next.layers.index.remove(index);
            next.layers.active.retain(|id| id != index);
            if next.layers.mode.state == EditMode::Edit && next.layers.mode.index == *index {
                next.layers.mode = LayerMode::default();
            }
        }
        Action::SetActiveLayers(ids) => {
            next.layers.active = ids
                .iter()
                .copied()
                .filter(|id| next.layers.index.contains_key(id))
                .collect();
        }
        Action::SetLayerMode(mode) => {
            // Views cannot emit an edit action for a missing index, but the
            // reducer stays total: an inconsistent mode is dropped.
            if mode.state == EditMode::Add || next.layers.index.contains_key(&mode.index) {
                next.layers.mode = *mode;
            } else {
                tracing::warn!(index = mode.index, "ignored edit mode for missing layer");
            }
        }

        Action::SetPalette(name) => next.colorbar.name = name.clone(),
        Action::SetPaletteNames(names) => {
            next.colorbar.names = names.clone();
            reselect_string(&mut next.colorbar.name, &next.colorbar.names);
        }
        Action::SetPaletteNumber(number) => next.colorbar.number = *number,
        Action::SetPaletteNumbers(numbers) => {
            next.colorbar.numbers = numbers.clone();
            reselect(&mut next.colorbar.number, &next.colorbar.numbers);
        }
        Action::SetLimitsOrigin(origin) => {
            next.colorbar.limits.origin = *origin;
            next.colorbar.resolve();
        }
        Action::SetUserLimits(limits) => {
            next.colorbar.limits.user = *limits;
            next.colorbar.resolve();
        }
        Action::SetDataLimits(limits) => {
            next.colorbar.limits.data = *limits;
            next.colorbar.resolve();
        }
        Action::SetReverse(flag) => next.colorbar.reverse = *flag,
        Action::SetInvisibleMin(flag) => next.colorbar.invisible_min = *flag,
        Action::SetInvisibleMax(flag) => next.colorbar.invisible_max = *flag,

        Action::SetTileName(name) => next.tile.name = name.clone(),
        Action::SetTileLabels(flag) => next.tile.labels = *flag,
        Action::SetTool { tool, active } => match tool {
            Tool::TimeSeries => next.tools.time_series = *active,
            Tool::Profile => next.tools.profile = *active,
        },
        Action::SetPosition { x, y } => {
            next.position.x = *x;
            next.position.y = *y;
        }

        Action::SavePreset { label } => {
            let id = next
                .presets
                .id_of(label)
                .unwrap_or_else(|| next.presets.next_id());
            next.presets.labels.insert(id, label.clone());
            next.presets.meta.insert(id, next.colorbar.clone());
            next.presets.active = Some(id);
        }
        Action::LoadPreset { id } => {
            if let Some(snapshot) = next.presets.meta.get(id).cloned() {
                // Option lists are dataset-derived; the snapshot only
                // replaces the user-tunable settings.
                let names = std::mem::take(&mut next.colorbar.names);
                let numbers = std::mem::take(&mut next.colorbar.numbers);
                next.colorbar = snapshot;
                next.colorbar.names = names;
                next.colorbar.numbers = numbers;
                next.colorbar.resolve();
                next.presets.active = Some(*id);
            }
        }
        Action::RemovePreset { id } => {
            next.presets.labels.remove(id);
            next.presets.meta.remove(id);
            if next.presets.active == Some(*id) {
                next.presets.active = None;
            }
        }

        Action::Unknown { .. } => {}
    }
    next
}

/// Accept a string selection only if the sibling list offers it (or the
/// list is empty, or the selection is being cleared).
fn select_string(selection: &mut String, value: &str, options: &[String]) {
    if value.is_empty() || options.is_empty() || options.iter().any(|o| o == value) {
        *selection = value.to_string();
    } else {
        tracing::warn!(value, "ignored selection not offered by its option list");
    }
}

/// Accept a non-string selection only if the sibling list offers it.
fn select<T: PartialEq + Clone + std::fmt::Debug>(selection: &mut T, value: &T, options: &[T]) {
    if options.is_empty() || options.contains(value) {
        *selection = value.clone();
    } else {
        tracing::warn!(?value, "ignored selection not offered by its option list");
    }
}

/// Keep a string selection a member of its sibling list: a stale non-empty
/// selection falls back to the first available option.
fn reselect_string(selection: &mut String, options: &[String]) {
    if options.is_empty() || selection.is_empty() {
        return;
    }
    if !options.iter().any(|o| o == selection) {
        *selection = options[0].clone();
    }
}

/// Keep a non-string selection a member of its sibling list.
fn reselect<T: PartialEq + Clone>(selection: &mut T, options: &[T]) {
    if !options.is_empty() && !options.contains(selection) {
        *selection = options[0].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LayerSettings, Limits, LimitsOrigin};

    fn wind_layer() -> LayerSettings {
        LayerSettings {
            label: "wind".to_string(),
            dataset: "ga6".to_string(),
            variable: "u".to_string(),
        }
    }

    #[test]
    fn unknown_action_is_identity() {
        let state = State::default();
        let next = reduce(
            &state,
            &Action::Unknown {
                kind: "set_flux_capacitor".to_string(),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn add_layer_allocates_next_index_and_enters_edit_mode() {
        let state = State::default();
        let next = reduce(
            &state,
            &Action::AddLayer {
                settings: wind_layer(),
            },
        );
        assert_eq!(next.layers.index[&0], wind_layer());
        assert_eq!(next.layers.active, vec![0]);
        assert_eq!(
            next.layers.mode,
            LayerMode {
                state: EditMode::Edit,
                index: 0,
            }
        );

        let next = reduce(
            &next,
            &Action::AddLayer {
                settings: LayerSettings::default(),
            },
        );
        assert_eq!(next.layers.mode.index, 1);
    }

    #[test]
    fn remove_layer_resets_edit_mode_pointing_at_it() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::AddLayer {
                settings: wind_layer(),
            },
        );
        assert_eq!(state.layers.mode.state, EditMode::Edit);

        state = reduce(&state, &Action::RemoveLayer { index: 0 });
        assert!(state.layers.index.is_empty());
        assert!(state.layers.active.is_empty());
        assert_eq!(state.layers.mode, LayerMode::default());
    }

    #[test]
    fn edit_mode_for_missing_layer_is_dropped() {
        let state = State::default();
        let next = reduce(
            &state,
            &Action::SetLayerMode(LayerMode {
                state: EditMode::Edit,
                index: 9,
            }),
        );
        assert_eq!(next.layers.mode, LayerMode::default());
    }

    #[test]
    fn stale_selection_falls_back_to_first_option() {
        let mut state = State::default();
        state = reduce(&state, &Action::SetPatterns(vec!["ga6".into(), "ra2".into()]));
        state = reduce(&state, &Action::SetPattern("ra2".to_string()));
        state = reduce(&state, &Action::SetPatterns(vec!["ga7".into()]));
        assert_eq!(state.pattern, "ga7");
    }

    #[test]
    fn selection_not_offered_by_option_list_is_ignored() {
        let mut state = State::default();
        state = reduce(&state, &Action::SetPressures(vec![850.0, 500.0]));
        state = reduce(&state, &Action::SetPressure(500.0));
        assert_eq!(state.pressure, 500.0);
        state = reduce(&state, &Action::SetPressure(1013.0));
        assert_eq!(state.pressure, 500.0);
    }

    #[test]
    fn empty_selection_is_not_auto_filled_by_reducer() {
        // Auto-selecting the first option on an empty selection is a view
        // behavior; the reducer only repairs stale non-empty selections.
        let state = reduce(
            &State::default(),
            &Action::SetPatterns(vec!["ga6".to_string()]),
        );
        assert_eq!(state.pattern, "");
    }

    #[test]
    fn limits_resolve_from_authoritative_pair() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::SetUserLimits(Limits {
                low: -2.0,
                high: 2.0,
            }),
        );
        // Origin is still data, so resolved values are untouched.
        assert_eq!(state.colorbar.low, 0.0);
        assert_eq!(state.colorbar.high, 1.0);

        state = reduce(&state, &Action::SetLimitsOrigin(LimitsOrigin::User));
        assert_eq!(state.colorbar.low, -2.0);
        assert_eq!(state.colorbar.high, 2.0);
    }

    #[test]
    fn preset_save_load_round_trip() {
        let mut state = State::default();
        state = reduce(&state, &Action::SetReverse(true));
        state = reduce(
            &state,
            &Action::SavePreset {
                label: "stormy".to_string(),
            },
        );
        let id = state.presets.id_of("stormy").unwrap();
        assert_eq!(state.presets.active, Some(id));

        state = reduce(&state, &Action::SetReverse(false));
        state = reduce(&state, &Action::LoadPreset { id });
        assert!(state.colorbar.reverse);
    }

    #[test]
    fn load_preset_preserves_option_lists() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::SavePreset {
                label: "plain".to_string(),
            },
        );
        state = reduce(
            &state,
            &Action::SetPaletteNames(vec!["Viridis".into(), "Magma".into()]),
        );
        state = reduce(&state, &Action::LoadPreset { id: 0 });
        assert_eq!(state.colorbar.names.len(), 2);
    }

    #[test]
    fn save_preset_overwrites_same_label() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::SavePreset {
                label: "stormy".to_string(),
            },
        );
        state = reduce(
            &state,
            &Action::SavePreset {
                label: "stormy".to_string(),
            },
        );
        assert_eq!(state.presets.labels.len(), 1);
    }

    #[test]
    fn remove_preset_clears_active() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::SavePreset {
                label: "stormy".to_string(),
            },
        );
        state = reduce(&state, &Action::RemovePreset { id: 0 });
        assert_eq!(state.presets.active, None);
        assert!(state.presets.labels.is_empty());
    }

    #[test]
    fn set_active_layers_drops_missing_ids() {
        let mut state = State::default();
        state = reduce(
            &state,
            &Action::AddLayer {
                settings: wind_layer(),
            },
        );
        state = reduce(&state, &Action::SetActiveLayers(vec![0, 4]));
        assert_eq!(state.layers.active, vec![0]);
    }
}
