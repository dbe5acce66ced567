#![forbid(unsafe_code)]

//! The annotation toolbar: drawing entry points, the style pickers, and
//! the back-fill rule that stamps picker values onto fresh records.
//!
//! # Design
//!
//! `Barc` is its own source of truth. It deliberately lives outside the
//! application store: geometry arrives point by point from drawing
//! gestures and would swamp the reducer, and no other component projects
//! it. It shares the store's observation idiom instead — the map surface
//! publishes extent changes through an `Observe<Viewport>` and the
//! toolbar subscribes.
//!
//! # Invariants
//!
//! - Back-fill writes only `None` style fields; a style set once, by a
//!   picker or a restored document, is never overwritten.
//! - Every stamp record with a `datasize` has a `fontsize` consistent
//!   with the current viewport.

use crate::buffer::{BarbBuffer, PolylineBuffer, StampBuffer};
use crate::front::{BezierPath, FrontDrawing, FrontKind};
use crate::glyphs::GlyphGroup;
use crate::viewport::Viewport;
use cirrus_state::{Observe, Subscription};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Pixel size of a stamp drawn at width 1.
pub const STARTING_FONT_SIZE: f64 = 15.0;

const MIN_WIDTH: f64 = 1.0;
const MAX_WIDTH: f64 = 10.0;

/// The annotation subsystem's root object.
pub struct Barc {
    colour: String,
    width: f64,
    group: GlyphGroup,
    viewport: Viewport,
    pub(crate) polyline: PolylineBuffer,
    pub(crate) barb: BarbBuffer,
    pub(crate) stamps: BTreeMap<char, StampBuffer>,
    pub(crate) fronts: BTreeMap<FrontKind, FrontDrawing>,
}

impl Default for Barc {
    fn default() -> Self {
        Self::new()
    }
}

impl Barc {
    #[must_use]
    pub fn new() -> Self {
        Self {
            colour: "black".to_string(),
            width: 2.0,
            group: GlyphGroup::default(),
            viewport: Viewport::default(),
            polyline: PolylineBuffer::default(),
            barb: BarbBuffer::default(),
            stamps: BTreeMap::new(),
            fronts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn colour(&self) -> &str {
        &self.colour
    }

    pub fn set_colour(&mut self, colour: impl Into<String>) {
        self.colour = colour.into();
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Stroke width from the slider, clamped to its 1–10 range.
    pub fn set_width(&mut self, width: f64) {
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    }

    #[must_use]
    pub fn group(&self) -> GlyphGroup {
        self.group
    }

    /// Switch the visible stamp palette. Placed stamps are untouched.
    pub fn select_group(&mut self, group: GlyphGroup) {
        self.group = group;
    }

    /// The glyphs the picker currently offers.
    #[must_use]
    pub fn palette(&self) -> Vec<char> {
        self.group.glyphs()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn polyline(&self) -> &PolylineBuffer {
        &self.polyline
    }

    #[must_use]
    pub fn barb(&self) -> &BarbBuffer {
        &self.barb
    }

    #[must_use]
    pub fn stamps(&self) -> &BTreeMap<char, StampBuffer> {
        &self.stamps
    }

    #[must_use]
    pub fn fronts(&self) -> &BTreeMap<FrontKind, FrontDrawing> {
        &self.fronts
    }

    /// Append a freehand stroke.
    pub fn draw_stroke(&mut self, xs: Vec<f64>, ys: Vec<f64>) {
        self.polyline.push(xs, ys);
        self.backfill();
    }

    /// Place a wind barb anchor.
    pub fn place_barb(&mut self, x: f64, y: f64) {
        self.barb.push(x, y);
    }

    /// Place one stamp of `glyph`, creating its buffer on first use.
    pub fn place_stamp(&mut self, glyph: char, x: f64, y: f64) {
        self.stamps.entry(glyph).or_default().push(x, y);
        self.backfill();
    }

    /// Append a front path, creating the kind's drawing on first use.
    pub fn draw_front(&mut self, kind: FrontKind, path: BezierPath) {
        self.fronts
            .entry(kind)
            .or_insert_with(|| FrontDrawing::new(kind))
            .add_path(path);
    }

    /// Stamp the current picker values onto records drawn with unset
    /// style. Runs after every buffer change, so a record picks up the
    /// style in force when it was drawn, not when it is next redrawn.
    fn backfill(&mut self) {
        for colour in &mut self.polyline.colour {
            colour.get_or_insert_with(|| self.colour.clone());
        }
        for width in &mut self.polyline.width {
            width.get_or_insert(self.width);
        }
        let fontsize = self.width * STARTING_FONT_SIZE;
        let datasize = self.viewport.datasize(fontsize);
        for stamp in self.stamps.values_mut() {
            for colour in &mut stamp.colour {
                colour.get_or_insert_with(|| self.colour.clone());
            }
            for slot in &mut stamp.fontsize {
                slot.get_or_insert(fontsize);
            }
            for slot in &mut stamp.datasize {
                slot.get_or_insert(datasize);
            }
        }
    }

    /// Adopt a new visible extent and re-derive every stamp fontsize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rescale_stamps();
    }

    pub(crate) fn rescale_stamps(&mut self) {
        debug!(
            stamps = self.stamps.len(),
            y_extent = self.viewport.y_extent(),
            "rescaling stamp buffers"
        );
        for stamp in self.stamps.values_mut() {
            stamp.rescale(&self.viewport);
        }
    }

    /// Subscribe a shared toolbar to a map surface's extent events. The
    /// toolbar tracks the extent for as long as the guard lives.
    pub fn bind_viewport(this: &Rc<RefCell<Barc>>, events: &Observe<Viewport>) -> Subscription {
        let this = Rc::clone(this);
        events.subscribe(move |viewport: &Viewport| {
            this.borrow_mut().set_viewport(*viewport);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(y_min: f64, y_max: f64, pixel_height: u32) -> Viewport {
        Viewport {
            y_min,
            y_max,
            pixel_height,
            ..Viewport::default()
        }
    }

    #[test]
    fn strokes_inherit_the_picker_values_in_force() {
        let mut barc = Barc::new();
        barc.draw_stroke(vec![0.0, 1.0], vec![0.0, 1.0]);
        assert_eq!(barc.polyline.colour[0].as_deref(), Some("black"));
        assert_eq!(barc.polyline.width[0], Some(2.0));

        barc.set_colour("crimson");
        barc.set_width(5.0);
        barc.draw_stroke(vec![1.0, 2.0], vec![1.0, 2.0]);
        assert_eq!(barc.polyline.colour[0].as_deref(), Some("black"));
        assert_eq!(barc.polyline.colour[1].as_deref(), Some("crimson"));
        assert_eq!(barc.polyline.width[1], Some(5.0));
    }

    #[test]
    fn width_slider_is_clamped() {
        let mut barc = Barc::new();
        barc.set_width(0.2);
        assert_eq!(barc.width(), 1.0);
        barc.set_width(40.0);
        assert_eq!(barc.width(), 10.0);
    }

    #[test]
    fn stamps_get_fontsize_from_width_and_datasize_from_the_viewport() {
        let mut barc = Barc::new();
        barc.set_viewport(view(0.0, 100.0, 500));
        barc.place_stamp('\u{F0000}', 3.0, 4.0);

        let stamp = &barc.stamps[&'\u{F0000}'];
        assert_eq!(stamp.fontsize[0], Some(30.0));
        // datasize = fontsize / pixel_height * y_extent
        assert_eq!(stamp.datasize[0], Some(6.0));
    }

    #[test]
    fn extent_change_rescales_placed_stamps() {
        let mut barc = Barc::new();
        barc.set_viewport(view(0.0, 100.0, 500));
        barc.place_stamp('\u{F0000}', 0.0, 0.0);
        assert_eq!(barc.stamps[&'\u{F0000}'].fontsize[0], Some(30.0));

        // Zoom in: same datasize, doubled fontsize.
        barc.set_viewport(view(0.0, 50.0, 500));
        let stamp = &barc.stamps[&'\u{F0000}'];
        assert_eq!(stamp.datasize[0], Some(6.0));
        assert_eq!(stamp.fontsize[0], Some(60.0));
    }

    #[test]
    fn selecting_a_group_changes_the_palette_only() {
        let mut barc = Barc::new();
        barc.place_stamp('\u{F0000}', 0.0, 0.0);
        barc.select_group(GlyphGroup::Group3);
        assert_eq!(barc.palette(), GlyphGroup::Group3.glyphs());
        assert_eq!(barc.stamps.len(), 1);
    }

    #[test]
    fn viewport_events_drive_the_toolbar() {
        let barc = Rc::new(RefCell::new(Barc::new()));
        let events = Observe::new();
        let guard = Barc::bind_viewport(&barc, &events);

        barc.borrow_mut().place_stamp('\u{F0000}', 0.0, 0.0);
        events.notify(&view(0.0, 100.0, 500));
        assert_eq!(barc.borrow().viewport().y_extent(), 100.0);

        drop(guard);
        events.notify(&view(0.0, 10.0, 500));
        assert_eq!(barc.borrow().viewport().y_extent(), 100.0);
    }

    #[test]
    fn restored_styles_are_never_overwritten() {
        let mut barc = Barc::new();
        barc.place_stamp('\u{F0000}', 0.0, 0.0);
        {
            let stamp = barc.stamps.get_mut(&'\u{F0000}').unwrap();
            stamp.colour[0] = Some("olive".to_string());
        }
        barc.place_stamp('\u{F0000}', 1.0, 1.0);
        let stamp = &barc.stamps[&'\u{F0000}'];
        assert_eq!(stamp.colour[0].as_deref(), Some("olive"));
        assert_eq!(stamp.colour[1].as_deref(), Some("black"));
    }
}
