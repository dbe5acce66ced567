#![forbid(unsafe_code)]

//! Save and restore of the full annotation set as one JSON document.
//!
//! The document is a flat object mapping buffer name to column-oriented
//! contents:
//!
//! - `polyline`, `barb`
//! - `text_stamp<glyph>` for each placed stamp glyph
//! - `bezier<front>` and `text<front><symbol>` for each drawn front
//!
//! # Failure Modes
//!
//! Restore is atomic. The whole document is parsed and validated into a
//! staging area first; only when every named buffer is acceptable are the
//! live buffers swapped, then the fontsize rescale runs once over every
//! stamp buffer. A malformed document returns [`RestoreError`] and leaves
//! the toolbar exactly as it was.

use crate::buffer::{BarbBuffer, BezierBuffer, PolylineBuffer, StampBuffer, SymbolBuffer};
use crate::front::{FrontDrawing, FrontKind};
use crate::toolbar::Barc;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Why a saved annotation document was rejected.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("annotation document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("annotation document must be a JSON object")]
    NotAnObject,
    #[error("unknown buffer name `{name}`")]
    UnknownBuffer { name: String },
    #[error("buffer `{name}` has columns of unequal length")]
    RaggedColumns { name: String },
    #[error("unknown front kind in buffer name `{name}`")]
    UnknownFront { name: String },
}

/// Serialize every named buffer into one transportable document.
pub fn serialize(barc: &Barc) -> serde_json::Result<String> {
    let mut document = serde_json::Map::new();
    document.insert("polyline".to_string(), serde_json::to_value(&barc.polyline)?);
    document.insert("barb".to_string(), serde_json::to_value(&barc.barb)?);
    for (glyph, stamp) in &barc.stamps {
        document.insert(format!("text_stamp{glyph}"), serde_json::to_value(stamp)?);
    }
    for (kind, drawing) in &barc.fronts {
        document.insert(
            format!("bezier{}", kind.name()),
            serde_json::to_value(&drawing.bezier)?,
        );
        for series in &drawing.symbols {
            document.insert(
                format!("text{}{}", kind.name(), series.symbol),
                serde_json::to_value(&series.points)?,
            );
        }
    }
    serde_json::to_string(&Value::Object(document))
}

#[derive(Default)]
struct Staging {
    polyline: Option<PolylineBuffer>,
    barb: Option<BarbBuffer>,
    stamps: BTreeMap<char, StampBuffer>,
    beziers: BTreeMap<FrontKind, BezierBuffer>,
    texts: BTreeMap<FrontKind, BTreeMap<char, SymbolBuffer>>,
}

/// Replace the named buffers from a saved document.
///
/// Buffers absent from the document are left alone. After a successful
/// swap the fontsize rescale runs once, because a persisted fontsize is
/// stale whenever the view has changed since the save.
pub fn restore(barc: &mut Barc, document: &str) -> Result<(), RestoreError> {
    let document: Value = serde_json::from_str(document)?;
    let Value::Object(entries) = document else {
        return Err(RestoreError::NotAnObject);
    };

    let mut staging = Staging::default();
    for (name, value) in entries {
        stage(&mut staging, &name, value)?;
    }

    if let Some(polyline) = staging.polyline {
        barc.polyline = polyline;
    }
    if let Some(barb) = staging.barb {
        barc.barb = barb;
    }
    for (glyph, stamp) in staging.stamps {
        barc.stamps.insert(glyph, stamp);
    }
    for (kind, bezier) in staging.beziers {
        barc.fronts
            .entry(kind)
            .or_insert_with(|| FrontDrawing::new(kind))
            .bezier = bezier;
    }
    for (kind, series_points) in staging.texts {
        let drawing = barc
            .fronts
            .entry(kind)
            .or_insert_with(|| FrontDrawing::new(kind));
        for (symbol, points) in series_points {
            if let Some(series) = drawing
                .symbols
                .iter_mut()
                .find(|series| series.symbol == symbol)
            {
                series.points = points;
            } else {
                // The staging pass already rejected these.
                warn!(front = kind.name(), %symbol, "dropping unmatched symbol series");
            }
        }
    }

    barc.rescale_stamps();
    info!("annotation document restored");
    Ok(())
}

fn stage(staging: &mut Staging, name: &str, value: Value) -> Result<(), RestoreError> {
    if name == "polyline" {
        let mut buffer: PolylineBuffer = parse(value)?;
        check(name, buffer.normalize())?;
        staging.polyline = Some(buffer);
    } else if name == "barb" {
        let mut buffer: BarbBuffer = parse(value)?;
        check(name, buffer.normalize())?;
        staging.barb = Some(buffer);
    } else if let Some(rest) = name.strip_prefix("text_stamp") {
        let glyph = single_char(name, rest)?;
        let mut buffer: StampBuffer = parse(value)?;
        check(name, buffer.normalize())?;
        staging.stamps.insert(glyph, buffer);
    } else if let Some(rest) = name.strip_prefix("bezier") {
        let kind = FrontKind::from_name(rest).ok_or_else(|| RestoreError::UnknownFront {
            name: name.to_string(),
        })?;
        let mut buffer: BezierBuffer = parse(value)?;
        check(name, buffer.normalize())?;
        staging.beziers.insert(kind, buffer);
    } else if let Some(rest) = name.strip_prefix("text") {
        let (kind, symbol) = front_and_symbol(name, rest)?;
        let mut buffer: SymbolBuffer = parse(value)?;
        check(name, buffer.normalize())?;
        staging.texts.entry(kind).or_default().insert(symbol, buffer);
    } else {
        return Err(RestoreError::UnknownBuffer {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, RestoreError> {
    Ok(serde_json::from_value(value)?)
}

fn check(name: &str, aligned: bool) -> Result<(), RestoreError> {
    if aligned {
        Ok(())
    } else {
        Err(RestoreError::RaggedColumns {
            name: name.to_string(),
        })
    }
}

fn single_char(name: &str, rest: &str) -> Result<char, RestoreError> {
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok(glyph),
        _ => Err(RestoreError::UnknownBuffer {
            name: name.to_string(),
        }),
    }
}

/// Split `text<front><symbol>` after the `text` prefix is gone. The front
/// name and the trailing glyph must both be recognized; the glyph must be
/// one of the kind's configured symbols.
fn front_and_symbol(name: &str, rest: &str) -> Result<(FrontKind, char), RestoreError> {
    for kind in FrontKind::ALL {
        if let Some(tail) = rest.strip_prefix(kind.name()) {
            let symbol = single_char(name, tail)?;
            if kind.style().symbols.contains(&symbol) {
                return Ok((kind, symbol));
            }
            return Err(RestoreError::UnknownBuffer {
                name: name.to_string(),
            });
        }
    }
    Err(RestoreError::UnknownFront {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::BezierPath;
    use crate::viewport::Viewport;

    fn drawn_toolbar() -> Barc {
        let mut barc = Barc::new();
        barc.set_viewport(Viewport {
            y_min: 0.0,
            y_max: 100.0,
            pixel_height: 500,
            ..Viewport::default()
        });
        barc.draw_stroke(vec![0.0, 1.0], vec![0.0, 1.0]);
        barc.place_barb(2.0, 3.0);
        barc.place_stamp('\u{F0000}', 5.0, 6.0);
        barc.draw_front(
            FrontKind::Warm,
            BezierPath {
                x0: 0.0,
                y0: 0.0,
                x1: 3.0,
                y1: 0.0,
                cx0: 1.0,
                cy0: 0.0,
                cx1: 2.0,
                cy1: 0.0,
            },
        );
        barc
    }

    #[test]
    fn round_trip_restores_every_buffer() {
        let original = drawn_toolbar();
        let document = serialize(&original).unwrap();

        let mut restored = Barc::new();
        restored.set_viewport(original.viewport());
        restore(&mut restored, &document).unwrap();

        assert_eq!(restored.polyline, original.polyline);
        assert_eq!(restored.barb, original.barb);
        assert_eq!(restored.stamps, original.stamps);
        assert_eq!(
            restored.fronts[&FrontKind::Warm].bezier,
            original.fronts[&FrontKind::Warm].bezier
        );
        assert_eq!(
            restored.fronts[&FrontKind::Warm].symbols[0].points,
            original.fronts[&FrontKind::Warm].symbols[0].points
        );
    }

    #[test]
    fn restore_rescales_stamps_to_the_current_view() {
        let original = drawn_toolbar();
        let document = serialize(&original).unwrap();

        // The restoring session is zoomed in twice as far.
        let mut restored = Barc::new();
        restored.set_viewport(Viewport {
            y_min: 0.0,
            y_max: 50.0,
            pixel_height: 500,
            ..Viewport::default()
        });
        restore(&mut restored, &document).unwrap();

        let stamp = &restored.stamps[&'\u{F0000}'];
        assert_eq!(stamp.datasize[0], original.stamps[&'\u{F0000}'].datasize[0]);
        assert_eq!(stamp.fontsize[0], Some(60.0));
    }

    #[test]
    fn floats_without_a_short_decimal_form_round_trip_exactly() {
        // Symbol placements along a curve routinely produce values like
        // 0.45 - 1 ulp; restore must reproduce them bit for bit.
        let mut original = Barc::new();
        original.place_barb(0.449_999_999_999_999_96, -1.0e-17);
        let document = serialize(&original).unwrap();

        let mut restored = Barc::new();
        restore(&mut restored, &document).unwrap();
        assert_eq!(restored.barb, original.barb);
    }

    #[test]
    fn unknown_buffer_name_rejects_the_whole_document() {
        let mut barc = drawn_toolbar();
        let before_len = barc.polyline.len();
        let err = restore(
            &mut barc,
            r#"{"polyline": {"xs": [], "ys": []}, "doodle": {"x": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RestoreError::UnknownBuffer { name } if name == "doodle"));
        assert_eq!(barc.polyline.len(), before_len);
    }

    #[test]
    fn ragged_columns_reject_the_whole_document() {
        let mut barc = drawn_toolbar();
        let err = restore(&mut barc, r#"{"barb": {"x": [1.0, 2.0], "y": [1.0]}}"#).unwrap_err();
        assert!(matches!(err, RestoreError::RaggedColumns { name } if name == "barb"));
        assert_eq!(barc.barb.len(), 1);
    }

    #[test]
    fn unknown_front_is_rejected() {
        let mut barc = Barc::new();
        let err = restore(
            &mut barc,
            r#"{"bezierdrizzle": {"x0": [], "y0": [], "x1": [], "y1": [], "cx0": [], "cy0": [], "cx1": [], "cy1": []}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RestoreError::UnknownFront { .. }));
    }

    #[test]
    fn buffers_absent_from_the_document_survive() {
        let mut barc = drawn_toolbar();
        restore(&mut barc, r#"{"barb": {"x": [9.0], "y": [9.0]}}"#).unwrap();
        assert_eq!(barc.barb.x, vec![9.0]);
        assert_eq!(barc.polyline.len(), 1);
        assert_eq!(barc.stamps.len(), 1);
    }

    #[test]
    fn not_an_object_is_rejected() {
        let mut barc = Barc::new();
        assert!(matches!(
            restore(&mut barc, "[1, 2, 3]"),
            Err(RestoreError::NotAnObject)
        ));
        assert!(matches!(
            restore(&mut barc, "nonsense"),
            Err(RestoreError::Json(_))
        ));
    }
}
