#![forbid(unsafe_code)]

//! Weather-front annotations: a cubic Bézier path decorated with a
//! repeating symbol sequence.
//!
//! Each front kind carries a fixed table of symbols, colours, and text
//! baselines. Generation produces one path record plus one `{x, y, angle}`
//! series per distinct symbol; colours and baselines cycle against the
//! symbol sequence, so a two-symbol front with one colour paints both
//! symbols the same and extra colours beyond the sequence go unused.

use crate::buffer::SymbolBuffer;

/// Symbol placements along one path.
const PLACEMENTS: usize = 10;

/// The recognized front kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrontKind {
    Warm,
    Cold,
    Occluded,
    Stationary,
    DryIntrusion,
}

/// Vertical anchoring of a symbol relative to the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Bottom,
    Top,
}

impl TextBaseline {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TextBaseline::Bottom => "bottom",
            TextBaseline::Top => "top",
        }
    }
}

/// Symbol/colour/baseline table for one front kind.
pub struct FrontStyle {
    pub symbols: Vec<char>,
    pub colours: Vec<&'static str>,
    pub baselines: Vec<TextBaseline>,
}

impl FrontKind {
    pub const ALL: [FrontKind; 5] = [
        FrontKind::Warm,
        FrontKind::Cold,
        FrontKind::Occluded,
        FrontKind::Stationary,
        FrontKind::DryIntrusion,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FrontKind::Warm => "warm",
            FrontKind::Cold => "cold",
            FrontKind::Occluded => "occluded",
            FrontKind::Stationary => "stationary",
            FrontKind::DryIntrusion => "dryintrusion",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<FrontKind> {
        FrontKind::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The kind's symbol table. The glyphs are semicircle and triangle
    /// marks from the annotation font's supplementary rows.
    #[must_use]
    pub fn style(self) -> FrontStyle {
        match self {
            FrontKind::Warm => FrontStyle {
                symbols: vec!['\u{F0187}'],
                colours: vec!["red"],
                baselines: vec![TextBaseline::Bottom],
            },
            FrontKind::Cold => FrontStyle {
                symbols: vec!['\u{F0186}'],
                colours: vec!["blue"],
                baselines: vec![TextBaseline::Bottom],
            },
            FrontKind::Occluded => FrontStyle {
                symbols: vec!['\u{F0187}', '\u{F0186}'],
                colours: vec!["purple"],
                baselines: vec![TextBaseline::Bottom],
            },
            FrontKind::Stationary => FrontStyle {
                symbols: vec!['\u{F0187}', '\u{F0188}'],
                colours: vec!["#ff0000", "#0000ff"],
                baselines: vec![TextBaseline::Bottom, TextBaseline::Top],
            },
            FrontKind::DryIntrusion => FrontStyle {
                symbols: vec!['▮'],
                colours: vec!["#0000aa"],
                baselines: vec![TextBaseline::Bottom],
            },
        }
    }
}

/// A single cubic Bézier segment in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierPath {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub cx0: f64,
    pub cy0: f64,
    pub cx1: f64,
    pub cy1: f64,
}

impl BezierPath {
    /// The point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point(&self, t: f64) -> (f64, f64) {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        (
            b0 * self.x0 + b1 * self.cx0 + b2 * self.cx1 + b3 * self.x1,
            b0 * self.y0 + b1 * self.cy0 + b2 * self.cy1 + b3 * self.y1,
        )
    }

    /// The local tangent direction at `t`, in radians.
    #[must_use]
    pub fn tangent_angle(&self, t: f64) -> f64 {
        let u = 1.0 - t;
        let dx = 3.0 * u * u * (self.cx0 - self.x0)
            + 6.0 * u * t * (self.cx1 - self.cx0)
            + 3.0 * t * t * (self.x1 - self.cx1);
        let dy = 3.0 * u * u * (self.cy0 - self.y0)
            + 6.0 * u * t * (self.cy1 - self.cy0)
            + 3.0 * t * t * (self.y1 - self.cy1);
        dy.atan2(dx)
    }
}

/// One repeated symbol of a drawn front.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    pub symbol: char,
    pub colour: String,
    pub baseline: TextBaseline,
    pub points: SymbolBuffer,
}

/// A front annotation: the path records plus one series per distinct
/// symbol of the kind's sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontDrawing {
    pub bezier: crate::buffer::BezierBuffer,
    pub symbols: Vec<SymbolSeries>,
}

impl FrontDrawing {
    /// Empty drawing with the kind's symbol series set up but no paths.
    #[must_use]
    pub fn new(kind: FrontKind) -> Self {
        let style = kind.style();
        let mut symbols: Vec<SymbolSeries> = Vec::new();
        for (i, &symbol) in style.symbols.iter().enumerate() {
            // First occurrence wins when a sequence repeats a glyph.
            if symbols.iter().any(|series| series.symbol == symbol) {
                continue;
            }
            symbols.push(SymbolSeries {
                symbol,
                colour: style.colours[i % style.colours.len()].to_string(),
                baseline: style.baselines[i % style.baselines.len()],
                points: SymbolBuffer::default(),
            });
        }
        Self {
            bezier: crate::buffer::BezierBuffer::default(),
            symbols,
        }
    }

    /// Append one path and distribute symbol placements along it.
    ///
    /// The path is sampled at equal parameter steps; placement `k` goes to
    /// the sequence's `k % len` symbol, with the local tangent angle so a
    /// renderer can rotate the glyph to follow the curve.
    pub fn add_path(&mut self, path: BezierPath) {
        self.bezier.x0.push(path.x0);
        self.bezier.y0.push(path.y0);
        self.bezier.x1.push(path.x1);
        self.bezier.y1.push(path.y1);
        self.bezier.cx0.push(path.cx0);
        self.bezier.cy0.push(path.cy0);
        self.bezier.cx1.push(path.cx1);
        self.bezier.cy1.push(path.cy1);

        let n_series = self.symbols.len();
        if n_series == 0 {
            return;
        }
        for k in 0..PLACEMENTS {
            let t = (k as f64 + 0.5) / PLACEMENTS as f64;
            let (x, y) = path.point(t);
            let angle = path.tangent_angle(t);
            self.symbols[k % n_series].points.push(x, y, angle);
        }
    }
}
