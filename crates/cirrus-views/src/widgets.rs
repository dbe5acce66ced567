#![forbid(unsafe_code)]

//! Plain widget-state records.
//!
//! Views project [`cirrus_state::State`] onto these structs; the rendering
//! surface reads them to draw actual controls. They carry no authoritative
//! state — rendering the same application state twice produces identical
//! widget state.

/// A dropdown: available options plus the currently chosen value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    pub options: Vec<String>,
    pub value: String,
}

impl Select {
    /// Replace the option list, applying the default-selection rule: when
    /// options arrive and nothing is chosen yet, choose the first option;
    /// a non-empty choice is never overridden.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        if self.value.is_empty()
            && let Some(first) = self.options.first()
        {
            self.value.clone_from(first);
        }
    }
}

/// A single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
}

/// An on/off toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
}
