#![forbid(unsafe_code)]

//! Column-oriented geometry buffers, one type per feature kind.
//!
//! Buffers are append-only tabular stores: every field is a column and all
//! columns of a buffer hold one entry per record. They serialize directly
//! as `{field: [values...]}` documents. Style columns are `Option`-valued:
//! a freshly drawn record carries `None` until the toolbar back-fills it
//! from the current picker values (see `toolbar`).

use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Freehand polyline strokes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolylineBuffer {
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<Vec<f64>>,
    #[serde(default)]
    pub colour: Vec<Option<String>>,
    #[serde(default)]
    pub width: Vec<Option<f64>>,
}

impl PolylineBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Append a stroke with unset style.
    pub fn push(&mut self, xs: Vec<f64>, ys: Vec<f64>) {
        self.xs.push(xs);
        self.ys.push(ys);
        self.colour.push(None);
        self.width.push(None);
    }

    /// Pad absent optional columns and check all columns line up.
    pub(crate) fn normalize(&mut self) -> bool {
        let n = self.xs.len();
        if self.ys.len() != n {
            return false;
        }
        if self.xs.iter().zip(&self.ys).any(|(x, y)| x.len() != y.len()) {
            return false;
        }
        pad(&mut self.colour, n) && pad(&mut self.width, n)
    }
}

/// Wind-barb anchor points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarbBuffer {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl BarbBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub(crate) fn normalize(&mut self) -> bool {
        self.y.len() == self.x.len()
    }
}

/// Placed symbol stamps for one glyph.
///
/// `datasize` is authoritative; `fontsize` is derived via
/// [`Viewport::fontsize`] and recomputed on every extent change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StampBuffer {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub colour: Vec<Option<String>>,
    #[serde(default)]
    pub datasize: Vec<Option<f64>>,
    #[serde(default)]
    pub fontsize: Vec<Option<f64>>,
}

impl StampBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Append a stamp with unset style and size.
    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
        self.colour.push(None);
        self.datasize.push(None);
        self.fontsize.push(None);
    }

    /// Re-derive every fontsize from its datasize. Records whose datasize
    /// was never back-filled are left alone.
    pub fn rescale(&mut self, viewport: &Viewport) {
        for (fontsize, datasize) in self.fontsize.iter_mut().zip(&self.datasize) {
            if let Some(datasize) = datasize {
                *fontsize = Some(viewport.fontsize(*datasize));
            }
        }
    }

    pub(crate) fn normalize(&mut self) -> bool {
        let n = self.x.len();
        self.y.len() == n
            && pad(&mut self.colour, n)
            && pad(&mut self.datasize, n)
            && pad(&mut self.fontsize, n)
    }
}

/// Cubic Bézier path records for weather fronts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BezierBuffer {
    pub x0: Vec<f64>,
    pub y0: Vec<f64>,
    pub x1: Vec<f64>,
    pub y1: Vec<f64>,
    pub cx0: Vec<f64>,
    pub cy0: Vec<f64>,
    pub cx1: Vec<f64>,
    pub cy1: Vec<f64>,
}

impl BezierBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x0.is_empty()
    }

    pub(crate) fn normalize(&mut self) -> bool {
        let n = self.x0.len();
        [
            self.y0.len(),
            self.x1.len(),
            self.y1.len(),
            self.cx0.len(),
            self.cy0.len(),
            self.cx1.len(),
            self.cy1.len(),
        ]
        .iter()
        .all(|len| *len == n)
    }
}

/// Repeated-symbol placements along a front, with the local path angle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolBuffer {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub angle: Vec<f64>,
}

impl SymbolBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, x: f64, y: f64, angle: f64) {
        self.x.push(x);
        self.y.push(y);
        self.angle.push(angle);
    }

    pub(crate) fn normalize(&mut self) -> bool {
        self.y.len() == self.x.len() && self.angle.len() == self.x.len()
    }
}

/// Pad an absent optional column to `n` entries; a partially present
/// column is ragged.
fn pad<T>(column: &mut Vec<Option<T>>, n: usize) -> bool {
    if column.is_empty() {
        column.resize_with(n, || None);
    }
    column.len() == n
}
