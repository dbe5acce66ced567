#![forbid(unsafe_code)]

//! Colorbar controls: palette choice, limits, visibility flags, presets.

use crate::widgets::{Checkbox, Select, TextInput};
use cirrus_state::{
    Action, Limits, LimitsOrigin, Observe, State, Store, Subscription,
};
use std::cell::RefCell;
use std::rc::Rc;

struct ColorbarControlsInner {
    palette_name: Select,
    palette_number: Select,
    reverse: Checkbox,
    invisible_min: Checkbox,
    invisible_max: Checkbox,
    origin: LimitsOrigin,
    low: TextInput,
    high: TextInput,
    preset: Select,
    preset_name: TextInput,
    connections: Vec<Subscription>,
}

/// Cloneable handle to the colorbar controls.
pub struct ColorbarControls {
    inner: Rc<RefCell<ColorbarControlsInner>>,
    emitter: Observe<Action>,
}

impl Clone for ColorbarControls {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            emitter: self.emitter.clone(),
        }
    }
}

impl Default for ColorbarControls {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorbarControls {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ColorbarControlsInner {
                palette_name: Select::default(),
                palette_number: Select::default(),
                reverse: Checkbox::default(),
                invisible_min: Checkbox::default(),
                invisible_max: Checkbox::default(),
                origin: LimitsOrigin::default(),
                low: TextInput::default(),
                high: TextInput::default(),
                preset: Select::default(),
                preset_name: TextInput::default(),
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

    /// Project the state onto the controls.
    pub fn render(&self, state: &State) {
        let mut inner = self.inner.borrow_mut();
        inner.palette_name.value.clone_from(&state.colorbar.name);
        inner.palette_name.set_options(state.colorbar.names.clone());
        inner.palette_number.value = state.colorbar.number.to_string();
        inner
            .palette_number
            .set_options(state.colorbar.numbers.iter().map(ToString::to_string).collect());
        inner.reverse.checked = state.colorbar.reverse;
        inner.invisible_min.checked = state.colorbar.invisible_min;
        inner.invisible_max.checked = state.colorbar.invisible_max;
        inner.origin = state.colorbar.limits.origin;
        inner.low.value = state.colorbar.limits.user.low.to_string();
        inner.high.value = state.colorbar.limits.user.high.to_string();
        inner.preset.set_options(state.presets.labels.values().cloned().collect());
        if let Some(active) = state.presets.active
            && let Some(label) = state.presets.labels.get(&active)
        {
            inner.preset.value.clone_from(label);
        }
    }

    pub fn on_palette_name(&self, value: impl Into<String>) {
        self.emitter.notify(&Action::SetPalette(value.into()));
    }

    /// Palette size comes in as dropdown text; non-numeric text is ignored.
    pub fn on_palette_number(&self, value: &str) {
        if let Ok(number) = value.parse::<usize>() {
            self.emitter.notify(&Action::SetPaletteNumber(number));
        }
    }

    pub fn on_reverse(&self, checked: bool) {
        self.emitter.notify(&Action::SetReverse(checked));
    }

    pub fn on_invisible_min(&self, checked: bool) {
        self.emitter.notify(&Action::SetInvisibleMin(checked));
    }

    pub fn on_invisible_max(&self, checked: bool) {
        self.emitter.notify(&Action::SetInvisibleMax(checked));
    }

    pub fn on_origin(&self, origin: LimitsOrigin) {
        self.emitter.notify(&Action::SetLimitsOrigin(origin));
    }

    /// User edited the lower limit. The pair is emitted only once both
    /// fields hold numbers; non-numeric input leaves the state untouched.
    pub fn on_low(&self, value: impl Into<String>) {
        self.inner.borrow_mut().low.value = value.into();
        self.emit_user_limits();
    }

    /// User edited the upper limit.
    pub fn on_high(&self, value: impl Into<String>) {
        self.inner.borrow_mut().high.value = value.into();
        self.emit_user_limits();
    }

    fn emit_user_limits(&self) {
        let parsed = {
            let inner = self.inner.borrow();
            match (inner.low.value.parse(), inner.high.value.parse()) {
                (Ok(low), Ok(high)) => Some(Limits { low, high }),
                _ => None,
            }
        };
        if let Some(limits) = parsed {
            self.emitter.notify(&Action::SetUserLimits(limits));
        }
    }

    /// User saved the current settings under the name in the preset field.
    pub fn on_save_preset(&self) {
        let label = self.inner.borrow().preset_name.value.clone();
        if !label.is_empty() {
            self.emitter.notify(&Action::SavePreset { label });
        }
    }

    pub fn on_preset_name(&self, value: impl Into<String>) {
        self.inner.borrow_mut().preset_name.value = value.into();
    }

    /// User picked a preset by label.
    pub fn on_preset(&self, label: &str, state: &State) {
        if let Some(id) = state.presets.id_of(label) {
            self.emitter.notify(&Action::LoadPreset { id });
        } else {
            tracing::warn!(label, "preset label not found");
        }
    }

    #[must_use]
    pub fn palette_name(&self) -> Select {
        self.inner.borrow().palette_name.clone()
    }

    #[must_use]
    pub fn palette_number(&self) -> Select {
        self.inner.borrow().palette_number.clone()
    }

    #[must_use]
    pub fn origin(&self) -> LimitsOrigin {
        self.inner.borrow().origin
    }

    #[must_use]
    pub fn limits_text(&self) -> (String, String) {
        let inner = self.inner.borrow();
        (inner.low.value.clone(), inner.high.value.clone())
    }

    #[must_use]
    pub fn preset(&self) -> Select {
        self.inner.borrow().preset.clone()
    }

    #[must_use]
    pub fn reverse(&self) -> bool {
        self.inner.borrow().reverse.checked
    }
}
