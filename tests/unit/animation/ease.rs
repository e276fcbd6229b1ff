use super::*;

#[test]
fn endpoints_are_fixed() {
    for e in [Ease::Linear, Ease::InQuad] {
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InQuad.apply(-1.0), 0.0);
    assert_eq!(Ease::InQuad.apply(2.0), 1.0);
    assert_eq!(Ease::Linear.apply(f64::NAN), 0.0);
}

#[test]
fn in_quad_is_slow_at_start() {
    assert_eq!(Ease::InQuad.apply(0.5), 0.25);
    assert!((Ease::InQuad.lerp(0.01, 1.0, 0.5) - 0.2575).abs() < 1e-12);
}
