use super::*;
use crate::animation::mode::{FlickerState, RotateState, TitleState};

fn rotate() -> ModeState {
    ModeState::Rotate(RotateState { direction: 1.0 })
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn rotate_enters_holds_and_exits() {
    let t0 = sample(&rotate(), 0.0, 0.4);
    assert!(approx(t0.scale, 0.3));
    assert!(approx(t0.opacity, 0.0));
    assert!(approx(t0.rotation, 0.4));

    let mid = sample(&rotate(), 0.5, 0.4);
    assert_eq!((mid.scale, mid.opacity), (1.0, 1.0));

    let late = sample(&rotate(), 0.95, 0.4);
    assert!(late.opacity > 0.0 && late.opacity < 1.0);
    assert!(late.scale > 1.0);
    assert!(approx(late.scale, 1.375));
    assert!(approx(late.opacity, 0.25));
}

#[test]
fn pulse_breathes_in_the_middle_band() {
    let start = sample(&ModeState::Pulse, 0.0, 0.0);
    assert_eq!((start.scale, start.opacity), (0.0, 0.0));

    for i in 0..=70 {
        let p = 0.15 + f64::from(i) * 0.01;
        let t = sample(&ModeState::Pulse, p.min(0.85), 0.0);
        assert!(t.scale >= 0.85 - 1e-9 && t.scale <= 1.15 + 1e-9, "p={p} scale={}", t.scale);
        assert_eq!(t.opacity, 1.0);
    }

    let end = sample(&ModeState::Pulse, 1.0, 0.0);
    assert!(approx(end.scale, 0.3));
    assert!(approx(end.opacity, 0.0));
}

#[test]
fn flicker_and_title_fade_only_in_the_tail() {
    let flicker = ModeState::Flicker(FlickerState { flicker_count: 5 });
    assert_eq!(sample(&flicker, 0.85, 1.0), InstanceTransform::steady(1.0));
    let tail = sample(&flicker, 0.925, 1.0);
    assert!(approx(tail.opacity, 0.5));
    assert!(approx(tail.scale, 1.25));

    let title = ModeState::Title(TitleState {
        order_index: 0,
        flicker_count: 3,
    });
    assert_eq!(sample(&title, 0.3, 2.0).rotation, 0.0);
    assert_eq!(sample(&title, 1.0, 2.0).opacity, 0.0);
}

#[test]
fn non_finite_inputs_are_sanitized() {
    let t = sample(&rotate(), f64::NAN, f64::INFINITY);
    assert!(t.scale.is_finite() && t.opacity.is_finite() && t.rotation.is_finite());
    assert!(approx(t.scale, 0.3));
}

#[test]
fn persistent_progress_never_reaches_the_exit() {
    for age in [0_u64, 100, 1_000, 10_000, 1_000_000] {
        let p = progress(ConcreteMode::Rotate, Lifespan::Persistent, age, 1.0);
        assert!(p < 0.8, "age={age} p={p}");
        let p = progress(ConcreteMode::Pulse, Lifespan::Persistent, age, 3.0);
        assert!(p < 0.85, "age={age} p={p}");
    }
    let late = progress(ConcreteMode::Rotate, Lifespan::Persistent, 5_000, 1.0);
    assert!(late >= 0.2);
    assert_eq!(sample(&rotate(), late, 0.0).opacity, 1.0);
}

#[test]
fn finite_lifespan_maps_linearly_and_expires() {
    let life = Lifespan::for_mode(ConcreteMode::Rotate, 2.0);
    assert_eq!(life, Lifespan::Ticks(600));
    assert!(approx(progress(ConcreteMode::Rotate, life, 300, 2.0), 0.5));
    assert_eq!(progress(ConcreteMode::Rotate, life, 9_000, 2.0), 1.0);
    assert!(!life.expired(599));
    assert!(life.expired(600));
    assert!(!Lifespan::Persistent.expired(u64::MAX));
}

#[test]
fn rotation_delta_follows_direction_and_speed() {
    let d = rotation_delta(0.5, -1.0, 1.0);
    assert!(approx(d, -std::f64::consts::TAU));
    assert!(approx(rotation_delta(0.25, 1.0, 2.0), std::f64::consts::TAU));
}

#[test]
fn affine_places_shape_at_position() {
    let t = InstanceTransform::steady(0.0);
    let p = t.to_affine(Point::new(10.0, 20.0)) * Point::ZERO;
    assert!(approx(p.x, 10.0) && approx(p.y, 20.0));
}

#[test]
fn expire_policy_spares_accumulating_modes() {
    let expire = RetirementPolicy::Expire;
    assert_eq!(expire.lifespan(ConcreteMode::Layered, 1.0), Lifespan::Persistent);
    assert_eq!(expire.lifespan(ConcreteMode::Grow, 1.0), Lifespan::Persistent);
    assert_eq!(expire.lifespan(ConcreteMode::Pulse, 1.0), Lifespan::Ticks(900));
    assert_eq!(
        RetirementPolicy::default().lifespan(ConcreteMode::Pulse, 1.0),
        Lifespan::Persistent
    );
}

#[test]
fn persistent_pulse_scale_is_continuous_across_cycles() {
    let scale = |age: u64| {
        let p = progress(ConcreteMode::Pulse, Lifespan::Persistent, age, 1.0);
        sample(&ModeState::Pulse, p, 0.0).scale
    };
    let mut prev = scale(136);
    for age in 137..4_000 {
        let s = scale(age);
        assert!((s - prev).abs() < 0.005, "age={age} jump={}", (s - prev).abs());
        prev = s;
    }
}
