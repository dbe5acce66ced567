#![forbid(unsafe_code)]

//! Settings panel: basemap choice and tool toggles.

use crate::widgets::{Checkbox, Select};
use cirrus_state::{Action, Observe, State, Store, Subscription, Tool};
use std::cell::RefCell;
use std::rc::Rc;

struct SettingsPanelInner {
    tile_name: Select,
    tile_labels: Checkbox,
    time_series: Checkbox,
    profile: Checkbox,
    connections: Vec<Subscription>,
}

/// Cloneable handle to the settings panel.
pub struct SettingsPanel {
    inner: Rc<RefCell<SettingsPanelInner>>,
    emitter: Observe<Action>,
}

impl Clone for SettingsPanel {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            emitter: self.emitter.clone(),
        }
    }
}

impl SettingsPanel {
    /// Create a panel offering the given basemap names.
    #[must_use]
    pub fn new(tile_options: Vec<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SettingsPanelInner {
                tile_name: Select {
                    options: tile_options,
                    value: String::new(),
                },
                tile_labels: Checkbox::default(),
                time_series: Checkbox::default(),
                profile: Checkbox::default(),
                connections: Vec::new(),
            })),
            emitter: Observe::new(),
        }
    }

    /// Subscribe `render` to the store and route emitted actions into
    /// `store.dispatch`. Returns itself for chaining.
    pub fn connect(&self, store: &Store) -> Self {
        let this = self.clone();
        let render_sub = store.subscribe(move |state| this.render(state));
        let store = store.clone();
        let action_sub = self
            .emitter
            .subscribe(move |action: &Action| store.dispatch(action.clone()));
        self.inner
            .borrow_mut()
            .connections
            .extend([render_sub, action_sub]);
        self.clone()
    }

    /// Drop store connections, for component teardown.
    pub fn disconnect(&self) {
        self.inner.borrow_mut().connections.clear();
    }

    /// Project the state onto the panel's widgets.
    pub fn render(&self, state: &State) {
        let mut inner = self.inner.borrow_mut();
        inner.tile_name.value.clone_from(&state.tile.name);
        inner.tile_labels.checked = state.tile.labels;
        inner.time_series.checked = state.tools.time_series;
        inner.profile.checked = state.tools.profile;
    }

    pub fn on_tile_name(&self, value: impl Into<String>) {
        self.emitter.notify(&Action::SetTileName(value.into()));
    }

    pub fn on_tile_labels(&self, checked: bool) {
        self.emitter.notify(&Action::SetTileLabels(checked));
    }

    pub fn on_time_series(&self, active: bool) {
        self.emitter.notify(&Action::SetTool {
            tool: Tool::TimeSeries,
            active,
        });
    }

    pub fn on_profile(&self, active: bool) {
        self.emitter.notify(&Action::SetTool {
            tool: Tool::Profile,
            active,
        });
    }

    #[must_use]
    pub fn tile_name(&self) -> Select {
        self.inner.borrow().tile_name.clone()
    }

    #[must_use]
    pub fn tile_labels(&self) -> bool {
        self.inner.borrow().tile_labels.checked
    }

    #[must_use]
    pub fn time_series(&self) -> bool {
        self.inner.borrow().time_series.checked
    }

    #[must_use]
    pub fn profile(&self) -> bool {
        self.inner.borrow().profile.checked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> SettingsPanel {
        SettingsPanel::new(vec!["Open street map".to_string(), "Dark".to_string()])
    }

    #[test]
    fn toggling_a_tool_round_trips_through_the_store() {
        let store = Store::default();
        let panel = panel().connect(&store);

        panel.on_time_series(true);
        assert!(store.state().tools.time_series);
        assert!(panel.time_series());

        panel.on_time_series(false);
        assert!(!panel.time_series());
    }

    #[test]
    fn tile_choice_flows_both_ways() {
        let store = Store::default();
        let panel = panel().connect(&store);

        panel.on_tile_name("Dark");
        assert_eq!(store.state().tile.name, "Dark");
        assert_eq!(panel.tile_name().value, "Dark");

        panel.on_tile_labels(true);
        assert!(store.state().tile.labels);
        assert!(panel.tile_labels());
    }

    #[test]
    fn render_reflects_state_without_mutating_it() {
        let store = Store::default();
        let panel = panel();
        let state = store.state();
        panel.render(&state);
        assert_eq!(state, store.state());
        assert_eq!(panel.tile_name().value, "Open street map");
    }
}
