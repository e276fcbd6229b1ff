use super::*;

fn pixel(c: &CpuCanvas, x: usize, y: usize) -> [u8; 4] {
    let (w, _) = c.size();
    let i = (y * w as usize + x) * 4;
    let d = c.pixels_premul();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn square() -> ElementShape {
    ElementShape::from_path_data("M0 0 L10 0 L10 10 L0 10 Z").unwrap()
}

#[test]
fn zero_sized_canvas_is_a_surface_error() {
    assert!(matches!(CpuCanvas::new(0, 10), Err(MossError::Surface(_))));
    assert!(matches!(CpuCanvas::new(70_000, 10), Err(MossError::Surface(_))));
}

#[test]
fn background_fills_the_frame() {
    let mut c = CpuCanvas::new(8, 8).unwrap();
    c.begin_frame(Color::WHITE).unwrap();
    c.present().unwrap();
    assert_eq!(pixel(&c, 0, 0), [255, 255, 255, 255]);
    assert_eq!(pixel(&c, 7, 7), [255, 255, 255, 255]);
}

#[test]
fn path_shapes_fill_with_their_color() {
    let shape = square();
    let mut c = CpuCanvas::new(32, 32).unwrap();
    c.begin_frame(Color::WHITE).unwrap();
    c.draw(&DrawCommand {
        element_id: "sq",
        shape: &shape,
        color: Color::rgba(0.0, 0.0, 0.0, 1.0),
        transform: Affine::translate((16.0, 16.0)),
        size: 12.0,
        opacity: 1.0,
    })
    .unwrap();
    c.present().unwrap();
    assert_eq!(pixel(&c, 16, 16), [0, 0, 0, 255]);
    assert_eq!(pixel(&c, 1, 1), [255, 255, 255, 255]);
}

#[test]
fn opacity_blends_over_background() {
    let shape = square();
    let mut c = CpuCanvas::new(32, 32).unwrap();
    c.begin_frame(Color::WHITE).unwrap();
    c.draw(&DrawCommand {
        element_id: "sq",
        shape: &shape,
        color: Color::rgba(0.0, 0.0, 0.0, 1.0),
        transform: Affine::translate((16.0, 16.0)),
        size: 20.0,
        opacity: 0.5,
    })
    .unwrap();
    c.present().unwrap();
    let [r, _, _, a] = pixel(&c, 16, 16);
    assert_eq!(a, 255);
    assert!(r > 100 && r < 156, "r={r}");
}

#[test]
fn svg_shapes_are_tinted_and_cached() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
    let shape = ElementShape::from_svg_bytes(svg).unwrap();
    let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
    let mut c = CpuCanvas::new(32, 32).unwrap();
    c.begin_frame(Color::WHITE).unwrap();
    let cmd = DrawCommand {
        element_id: "leaf",
        shape: &shape,
        color: red,
        transform: Affine::translate((16.0, 16.0)),
        size: 20.0,
        opacity: 1.0,
    };
    c.draw(&cmd).unwrap();
    c.draw(&cmd).unwrap();
    c.present().unwrap();
    assert_eq!(c.tint_cache_len(), 1);

    let [r, g, b, _] = pixel(&c, 16, 16);
    assert!(r > 240 && g < 16 && b < 16, "{r},{g},{b}");

    c.invalidate_element("leaf");
    assert_eq!(c.tint_cache_len(), 0);
}

#[test]
fn resize_reallocates() {
    let mut c = CpuCanvas::new(4, 4).unwrap();
    c.resize(6, 3).unwrap();
    assert_eq!(c.size(), (6, 3));
    assert_eq!(c.pixels_premul().len(), 6 * 3 * 4);
    assert!(c.resize(0, 3).is_err());
}
