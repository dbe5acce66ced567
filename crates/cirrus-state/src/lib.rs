#![forbid(unsafe_code)]

//! Cirrus state core.
//!
//! This crate is the single source of truth for the dashboard UI: an
//! application [`State`] tree, a tagged [`Action`] vocabulary, a pure
//! [`reduce`] transition function, and the [`Store`] that ties them
//! together with synchronous subscriber notification.
//!
//! # Data flow
//!
//! user interaction → [`Action`] → [`Store::dispatch`] → [`reduce`] →
//! next [`State`] → subscribers re-render and may emit further actions.
//!
//! # Role in Cirrus
//!
//! `cirrus-state` owns descriptive state only. Views (`cirrus-views`)
//! project it onto widgets; the annotation subsystem (`cirrus-barc`)
//! shares the [`Observe`] dispatch idiom but keeps its own buffers.

pub mod action;
pub mod document;
pub mod observe;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::{Action, Tool};
pub use document::SchemaError;
pub use observe::{Observe, Subscription};
pub use reducer::reduce;
pub use state::{
    Colorbar, ColorbarLimits, EditMode, LayerMode, LayerSettings, Layers, Limits, LimitsOrigin,
    Position, Presets, State, Tile, Tools,
};
pub use store::Store;
