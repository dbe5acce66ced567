#![forbid(unsafe_code)]

//! Map annotation subsystem for the Cirrus dashboard.
//!
//! Drawing tools for meteorological mark-up: freehand strokes, wind
//! barbs, symbol stamps from a private-use glyph font, and Bézier weather
//! fronts. The [`Barc`] toolbar owns the geometry buffers directly rather
//! than routing them through the application store; it shares the store's
//! observation idiom for viewport tracking and the same JSON document
//! style for save/restore.

pub mod buffer;
pub mod bundle;
pub mod front;
pub mod glyphs;
pub mod toolbar;
pub mod viewport;

pub use buffer::{BarbBuffer, BezierBuffer, PolylineBuffer, StampBuffer, SymbolBuffer};
pub use bundle::{RestoreError, restore, serialize};
pub use front::{BezierPath, FrontDrawing, FrontKind, FrontStyle, SymbolSeries, TextBaseline};
pub use glyphs::{GlyphGroup, glyph_code, glyph_table, icon_name};
pub use toolbar::{Barc, STARTING_FONT_SIZE};
pub use viewport::Viewport;
