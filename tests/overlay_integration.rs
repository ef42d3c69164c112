//! Integration tests for action parsing, coordinate transforms and overlay rendering

use std::fs;

use pretty_assertions::assert_eq;

use dataset_viewer::annotate::action_color;
use dataset_viewer::render::{self, RenderOptions};
use dataset_viewer::{
    ActionKind, Canvas, CoordError, Dataset, FileVariant, Point, Primitive, Size, compute_annotation_primitives,
    parse_action, pixel_to_ru, read_record_by_index, ru_to_pixel,
};

const CLICK_TURN: &str = r#"I will click the button.
<tool_call>{"name":"computer_use","arguments":{"action":"left_click","coordinate":[500,500]}}</tool_call>"#;

#[test]
fn test_parse_action_from_turn() {
    let action = parse_action(CLICK_TURN).expect("action should parse");
    assert_eq!(action.name, "computer_use");
    assert_eq!(action.arguments.action, ActionKind::LeftClick);
    assert_eq!(action.arguments.coordinate, Some(Point::new(500.0, 500.0)));

    assert!(parse_action("just text, no call").is_none());
    assert!(parse_action("<tool_call>{broken</tool_call>").is_none());
}

#[test]
fn test_full_hd_center() {
    let size = Size::new(1920.0, 1080.0);
    assert_eq!(ru_to_pixel(Point::new(500.0, 500.0), size).unwrap(), Point::new(960.0, 540.0));
    assert_eq!(pixel_to_ru(Point::new(1920.0, 1080.0), size).unwrap(), Point::new(1000.0, 1000.0));
    assert_eq!(pixel_to_ru(Point::ORIGIN, size).unwrap(), Point::ORIGIN);
}

#[test]
fn test_invalid_dimensions_fail() {
    assert!(matches!(
        ru_to_pixel(Point::ORIGIN, Size::new(0.0, 100.0)),
        Err(CoordError::InvalidDimension { .. })
    ));
    assert!(matches!(
        ru_to_pixel(Point::ORIGIN, Size::new(100.0, 0.0)),
        Err(CoordError::InvalidDimension { .. })
    ));
}

#[test]
fn test_geometry_on_non_square_image() {
    let action = parse_action(CLICK_TURN).unwrap();
    let primitives = compute_annotation_primitives(
        &action,
        Size::new(1920.0, 1080.0),
        0.5,
        Point::new(10.0, 20.0),
        Some(Point::new(50.0, 50.0)),
    )
    .unwrap();

    // tolerance box first, centered on the anchor at (490, 290)
    match &primitives[0] {
        Primitive::Rect { min, max, dashed, .. } => {
            assert!(*dashed);
            assert_eq!(*min, Point::new(10.0 + 432.0, 20.0 + 243.0));
            assert_eq!(*max, Point::new(10.0 + 528.0, 20.0 + 297.0));
        }
        other => panic!("expected tolerance rect, got {other:?}"),
    }
    assert!(primitives.iter().any(|p| matches!(
        p,
        Primitive::Circle { center, filled: true, .. } if *center == Point::new(490.0, 290.0)
    )));
}

#[test]
fn test_render_record_from_dataset() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("images")).unwrap();
    Canvas::with_color(320, 180, [255, 255, 255])
        .into_image()
        .unwrap()
        .save(dir.path().join("images/shot.png"))
        .unwrap();

    let line = serde_json::json!({
        "id": "ep1/step2",
        "image": "images/shot.png",
        "conversations": [
            {"from": "human", "value": "click it"},
            {"from": "gpt", "value": CLICK_TURN},
        ],
        "metadata": {"task_type": "click", "image_size": [1920, 1080], "tolerance": [20, 20]},
    });
    fs::write(dir.path().join("data.jsonl"), format!("{line}\n")).unwrap();

    let ds = Dataset::new(dir.path());
    let record = read_record_by_index(&ds, 0, FileVariant::Data).unwrap().unwrap();
    let overlay = render::render_record(&ds, &record, &RenderOptions::default()).unwrap();

    assert!(!overlay.placeholder);
    assert_eq!(overlay.canvas_size, (320, 180));
    assert_eq!(overlay.image_size, Size::new(1920.0, 1080.0));

    let canvas = Canvas::from_png_bytes(&overlay.png).unwrap();
    assert_eq!(canvas.get_pixel(160, 90), action_color(&ActionKind::LeftClick));
    assert_eq!(canvas.get_pixel(2, 2), [255, 255, 255]);

    let out = render::write_overlay(&dir.path().join("out"), &record.id, &overlay.png).unwrap();
    let name = out.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("overlay_ep1_step2_"));
    assert!(render::to_data_url(&overlay.png).starts_with("data:image/png;base64,iVBORw0KGgo"));
}
