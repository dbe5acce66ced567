//! Property tests for annotation save/restore.

use cirrus_barc::{Barc, BezierPath, FrontKind, Viewport, glyph_code, restore, serialize};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum DrawOp {
    Stroke { xs: Vec<f64>, ys: Vec<f64> },
    Barb { x: f64, y: f64 },
    Stamp { slot: usize, x: f64, y: f64 },
    Front { kind: FrontKind, path: BezierPath },
    Colour(String),
    Width(f64),
}

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

fn front_kind() -> impl Strategy<Value = FrontKind> {
    prop::sample::select(FrontKind::ALL.to_vec())
}

fn bezier_path() -> impl Strategy<Value = BezierPath> {
    (
        (coord(), coord(), coord(), coord()),
        (coord(), coord(), coord(), coord()),
    )
        .prop_map(|((x0, y0, x1, y1), (cx0, cy0, cx1, cy1))| BezierPath {
            x0,
            y0,
            x1,
            y1,
            cx0,
            cy0,
            cx1,
            cy1,
        })
}

fn draw_op() -> impl Strategy<Value = DrawOp> {
    prop_oneof![
        (
            prop::collection::vec(coord(), 2..6),
            prop::collection::vec(coord(), 2..6)
        )
            .prop_map(|(xs, mut ys)| {
                ys.resize(xs.len(), 0.0);
                DrawOp::Stroke { xs, ys }
            }),
        (coord(), coord()).prop_map(|(x, y)| DrawOp::Barb { x, y }),
        (0..100usize, coord(), coord()).prop_map(|(slot, x, y)| DrawOp::Stamp { slot, x, y }),
        (front_kind(), bezier_path()).prop_map(|(kind, path)| DrawOp::Front { kind, path }),
        prop::sample::select(vec!["black", "red", "#00ff7f"])
            .prop_map(|colour| DrawOp::Colour(colour.to_string())),
        (1.0..10.0f64).prop_map(DrawOp::Width),
    ]
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (coord(), 1.0..500.0f64, 100..2000u32).prop_map(|(y_min, extent, pixel_height)| Viewport {
        y_min,
        y_max: y_min + extent,
        pixel_height,
        ..Viewport::default()
    })
}

fn toolbar(ops: &[DrawOp], viewport: Viewport) -> Barc {
    let mut barc = Barc::new();
    barc.set_viewport(viewport);
    for op in ops {
        match op {
            DrawOp::Stroke { xs, ys } => barc.draw_stroke(xs.clone(), ys.clone()),
            DrawOp::Barb { x, y } => barc.place_barb(*x, *y),
            DrawOp::Stamp { slot, x, y } => barc.place_stamp(glyph_code(*slot), *x, *y),
            DrawOp::Front { kind, path } => barc.draw_front(*kind, *path),
            DrawOp::Colour(colour) => barc.set_colour(colour.clone()),
            DrawOp::Width(width) => barc.set_width(*width),
        }
    }
    barc
}

proptest! {
    /// Serialize then restore reproduces every buffer, with fontsize
    /// re-derived from datasize in the restoring session's viewport.
    #[test]
    fn round_trip_preserves_annotations(
        ops in prop::collection::vec(draw_op(), 0..20),
        view in viewport(),
        restoring_view in viewport(),
    ) {
        let original = toolbar(&ops, view);
        let document = serialize(&original).unwrap();

        let mut restored = Barc::new();
        restored.set_viewport(restoring_view);
        restore(&mut restored, &document).unwrap();

        prop_assert_eq!(restored.polyline(), original.polyline());
        prop_assert_eq!(restored.barb(), original.barb());
        prop_assert_eq!(restored.stamps().len(), original.stamps().len());
        for (glyph, stamp) in original.stamps() {
            let restored_stamp = &restored.stamps()[glyph];
            prop_assert_eq!(&restored_stamp.x, &stamp.x);
            prop_assert_eq!(&restored_stamp.y, &stamp.y);
            prop_assert_eq!(&restored_stamp.colour, &stamp.colour);
            prop_assert_eq!(&restored_stamp.datasize, &stamp.datasize);
            for (fontsize, datasize) in restored_stamp.fontsize.iter().zip(&restored_stamp.datasize) {
                let expected = datasize.map(|d| restoring_view.fontsize(d));
                prop_assert_eq!(*fontsize, expected);
            }
        }
        for (kind, drawing) in original.fronts() {
            let restored_drawing = &restored.fronts()[kind];
            prop_assert_eq!(&restored_drawing.bezier, &drawing.bezier);
            for (restored_series, series) in
                restored_drawing.symbols.iter().zip(&drawing.symbols)
            {
                prop_assert_eq!(restored_series.symbol, series.symbol);
                prop_assert_eq!(&restored_series.points, &series.points);
            }
        }
    }

    /// A document naming any unknown buffer leaves the toolbar untouched.
    #[test]
    fn rejected_documents_mutate_nothing(
        ops in prop::collection::vec(draw_op(), 0..20),
        view in viewport(),
    ) {
        let mut barc = toolbar(&ops, view);
        let before_polyline = barc.polyline().clone();
        let before_barb = barc.barb().clone();
        let before_stamps = barc.stamps().clone();

        let document =
            r#"{"polyline": {"xs": [[0.0]], "ys": [[0.0]]}, "zzz_bogus": {"x": []}}"#;
        prop_assert!(restore(&mut barc, document).is_err());
        prop_assert_eq!(barc.polyline(), &before_polyline);
        prop_assert_eq!(barc.barb(), &before_barb);
        prop_assert_eq!(barc.stamps(), &before_stamps);
    }
}
