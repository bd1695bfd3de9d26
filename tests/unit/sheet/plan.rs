use super::*;

fn times(v: &[i64]) -> Vec<FrameTime> {
    v.iter().copied().map(FrameTime).collect()
}

#[test]
fn plan_places_frames_in_selection_order() {
    let geometry = SpriteGeometry::new(16, 8, 1).unwrap();
    let plan = plan_sheet(&times(&[2, 7, 9]), LayoutMode::Rows, geometry).unwrap();

    assert_eq!(plan.grid, GridSize::new(2, 2));
    assert_eq!(plan.canvas, Canvas { width: 36, height: 20 });
    assert_eq!(plan.frame_count(), 3);

    let f = plan.frames[2];
    assert_eq!(f.ordinal, 2);
    assert_eq!(f.time, FrameTime(9));
    assert_eq!(f.offset, PixelOffset { x: 0, y: 10 });
}

#[test]
fn empty_selection_is_a_single_blank_cell() {
    let geometry = SpriteGeometry::new(4, 4, 2).unwrap();
    let plan = plan_sheet(&[], LayoutMode::VerticalStrip, geometry).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.grid, GridSize::new(1, 1));
    assert_eq!(plan.canvas, Canvas { width: 8, height: 8 });
}

#[test]
fn strip_canvas_matches_frame_count() {
    let geometry = SpriteGeometry::new(10, 10, 0).unwrap();
    let plan = plan_sheet(&times(&[0, 1, 2, 3]), LayoutMode::HorizontalStrip, geometry).unwrap();
    assert_eq!(plan.canvas, Canvas { width: 40, height: 10 });
    assert_eq!(plan.frames[3].offset, PixelOffset { x: 30, y: 0 });
}

#[test]
fn oversized_canvas_is_rejected() {
    let geometry = SpriteGeometry::new(9999, 9999, 0).unwrap();
    let many: Vec<FrameTime> = (0..1_000_000).map(FrameTime).collect();
    let err = plan_sheet(&many, LayoutMode::HorizontalStrip, geometry).unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn plan_serializes_to_json() {
    let geometry = SpriteGeometry::new(2, 2, 0).unwrap();
    let plan = plan_sheet(&times(&[1]), LayoutMode::Columns, geometry).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["layout"], "columns");
    assert_eq!(json["grid"]["columns"], 1);
    assert_eq!(json["frames"][0]["time"], 1);
    assert_eq!(json["frames"][0]["offset"]["x"], 0);
}
