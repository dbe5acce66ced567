#![forbid(unsafe_code)]

//! Reactive views for the Cirrus dashboard.
//!
//! Every view follows the same contract:
//!
//! - `connect(&store)` subscribes the view's `render` to the store and
//!   routes its emitted actions into `store.dispatch`, returning the view
//!   for chaining;
//! - `render(&state)` is an idempotent projection of application state
//!   onto plain widget-state records and never mutates state;
//! - user-input methods (`on_*`) emit actions — views hold no
//!   authoritative state beyond transient widget focus.

pub mod colorbar;
pub mod layer_editor;
pub mod settings;
pub mod widgets;

pub use colorbar::ColorbarControls;
pub use layer_editor::LayerEditor;
pub use settings::SettingsPanel;
pub use widgets::{Checkbox, Select, TextInput};
