use super::*;
use crate::foundation::core::Point;

fn square() -> ElementShape {
    ElementShape::from_path_data("M10 10 L30 10 L30 50 L10 50 Z").unwrap()
}

#[test]
fn fit_to_box_centers_and_scales_the_longer_side() {
    let shape = square();
    let a = fit_to_box(shape.bounds(), 80.0);
    let top_left = a * Point::new(10.0, 10.0);
    let bottom_right = a * Point::new(30.0, 50.0);
    assert!((top_left.x + 20.0).abs() < 1e-9 && (top_left.y + 40.0).abs() < 1e-9);
    assert!((bottom_right.x - 20.0).abs() < 1e-9 && (bottom_right.y - 40.0).abs() < 1e-9);
}

#[test]
fn recording_target_keeps_the_last_presented_frame() {
    let shape = square();
    let mut t = RecordingTarget::new(100, 100);
    t.begin_frame(Color::WHITE).unwrap();
    let cmd = DrawCommand {
        element_id: "sq",
        shape: &shape,
        color: Color::rgba(0.0, 0.0, 0.0, 1.0),
        transform: Affine::translate((50.0, 50.0)),
        size: 10.0,
        opacity: 0.5,
    };
    t.draw(&cmd).unwrap();
    assert!(t.last_frame().is_empty());
    t.present().unwrap();
    assert_eq!(t.frames(), 1);
    assert_eq!(t.last_frame().len(), 1);
    assert_eq!(t.last_frame()[0].element_id, "sq");

    let center = t.last_frame()[0].transform * Point::new(20.0, 30.0);
    assert!((center.x - 50.0).abs() < 1e-9 && (center.y - 50.0).abs() < 1e-9);

    t.invalidate_element("sq");
    assert_eq!(t.invalidated(), ["sq"]);
    assert_eq!(t.size(), (100, 100));
}
