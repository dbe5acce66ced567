#![forbid(unsafe_code)]

//! The map surface's visible extent and the stamp-size derivation rule.
//!
//! Stamps persist `datasize`, a scale-invariant quantity in map data units.
//! The pixel `fontsize` a renderer draws with is always derived:
//!
//! ```text
//! fontsize = datasize / (y_max - y_min) * pixel_height
//! ```
//!
//! so a stamp covers the same fraction of the map however far the user has
//! zoomed. The recompute runs on every vertical-extent change, outside the
//! store — the rule is a pure function of the buffer and the viewport.

/// Visible extent and pixel dimensions of a map figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            pixel_width: 800,
            pixel_height: 600,
        }
    }
}

impl Viewport {
    /// Vertical extent in map data units.
    #[must_use]
    pub fn y_extent(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Derived pixel size for a stamp of the given data size.
    #[must_use]
    pub fn fontsize(&self, datasize: f64) -> f64 {
        datasize / self.y_extent() * f64::from(self.pixel_height)
    }

    /// Inverse of [`Viewport::fontsize`]: the data size that renders at
    /// `fontsize` pixels in this viewport.
    #[must_use]
    pub fn datasize(&self, fontsize: f64) -> f64 {
        fontsize / f64::from(self.pixel_height) * self.y_extent()
    }
}
