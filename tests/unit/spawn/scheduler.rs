use super::*;
use crate::animation::state::RetirementPolicy;
use crate::elements::registry::{ElementConfig, ElementDescriptor};
use crate::elements::shape::ElementShape;
use crate::foundation::core::Canvas;
use crate::foundation::rng::Mulberry32;
use crate::spawn::cluster::ClusterBook;
use std::collections::HashMap;

fn desc(id: &str, mode: AnimationMode) -> ElementDescriptor {
    ElementDescriptor::new(
        id,
        id,
        mode,
        ElementShape::from_path_data("M0 0 L1 0 L1 1 Z").unwrap(),
    )
}

fn registry(entries: &[(&str, AnimationMode, f64)]) -> ElementRegistry {
    let mut reg = ElementRegistry::new();
    let mut configs = HashMap::new();
    for (id, mode, frequency) in entries {
        configs.insert(
            (*id).to_owned(),
            ElementConfig {
                frequency: *frequency,
                animation_mode: *mode,
                ..ElementConfig::default()
            },
        );
    }
    reg.register_with(
        entries.iter().map(|(id, mode, _)| desc(id, *mode)).collect(),
        configs,
    );
    reg
}

fn params(max: usize) -> SchedulerParams {
    SchedulerParams {
        max_instances: max,
        spawn_speed: 1.0,
        reset_interval_seconds: None,
    }
}

struct Rig {
    rng: Mulberry32,
    book: ClusterBook,
    store: InstanceStore,
    factory: InstanceFactory,
    sched: SpawnScheduler,
}

impl Rig {
    fn new(seed: u32) -> Self {
        Self {
            rng: Mulberry32::new(seed),
            book: ClusterBook::new(),
            store: InstanceStore::new(),
            factory: InstanceFactory::new(),
            sched: SpawnScheduler::new(),
        }
    }

    fn step(&mut self, reg: &ElementRegistry, p: SchedulerParams) -> SpawnReport {
        let mut env = SpawnEnv {
            canvas: Canvas::new(400, 300).unwrap(),
            rng: &mut self.rng,
            book: &mut self.book,
            retirement: RetirementPolicy::Persistent,
        };
        self.sched
            .step(1.0 / 60.0, p, reg, &mut self.store, &mut self.factory, &mut env)
    }
}

#[test]
fn ramp_starts_low_and_saturates() {
    let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
    assert!(close(ramp_multiplier(0.0, None), 0.01));
    assert!(close(ramp_multiplier(6.0, None), 0.2575));
    assert!(close(ramp_multiplier(12.0, None), 1.0));
    assert!(close(ramp_multiplier(500.0, None), 1.0));
    assert!(close(ramp_multiplier(9.0, Some(10.0)), 1.0));
    assert!(ramp_multiplier(9.0, Some(1.0)) < 0.6);
    assert!(close(ramp_multiplier(0.1, Some(1.05)), 1.0));
}

#[test]
fn title_timing_scales_with_speed() {
    assert_eq!(title_timing(1.0), (4, 12));
    assert_eq!(title_timing(4.0), (2, 6));
    assert_eq!(title_timing(100.0), (0, 2));
    assert_eq!(title_timing(0.25), (8, 24));
}

#[test]
fn titles_arrive_in_id_order_on_schedule() {
    let reg = registry(&[
        ("t_b", AnimationMode::Title, 0.1),
        ("t_a", AnimationMode::Title, 0.1),
    ]);
    let mut rig = Rig::new(1);
    let mut arrivals = Vec::new();
    for tick in 0..40 {
        let report = rig.step(&reg, params(10));
        for id in report.spawned {
            let inst = rig.store.get(id).unwrap();
            arrivals.push((tick, inst.element_id.clone()));
        }
    }
    assert_eq!(
        arrivals,
        vec![(4, "t_a".to_owned()), (16, "t_b".to_owned())]
    );
    assert!(!rig.sched.titles_pending(&reg));
}

#[test]
fn capacity_blocks_spawns() {
    let reg = registry(&[("p", AnimationMode::Pulse, 1.0)]);
    let mut rig = Rig::new(42);
    for _ in 0..3_000 {
        rig.step(&reg, params(3));
        assert!(rig.store.len() <= 3);
    }
    assert_eq!(rig.store.len(), 3);
}

#[test]
fn zero_frequency_never_spawns() {
    let reg = registry(&[("p", AnimationMode::Pulse, 0.0)]);
    let mut rig = Rig::new(9);
    for _ in 0..2_000 {
        let r = rig.step(&reg, params(100));
        assert!(r.spawned.is_empty());
    }
}

#[test]
fn title_priority_dampens_other_chances() {
    let reg = registry(&[
        ("t", AnimationMode::Title, 0.1),
        ("p", AnimationMode::Pulse, 1.0),
    ]);
    // Slow spawn speed pushes the first title to tick 40.
    let p = SchedulerParams {
        spawn_speed: 0.01,
        ..params(100)
    };
    let mut rig = Rig::new(3);
    let mut seen = None;
    for _ in 0..40 {
        let before = rig.sched.elapsed_seconds();
        let r = rig.step(&reg, p);
        if let Some(c) = r.chance {
            seen = Some((c, before));
            break;
        }
    }
    let (c, before) = seen.unwrap();
    assert!(rig.sched.titles_pending(&reg));
    let expected = 1.0 * 1.5 * ramp_multiplier(before, None) * 0.01 * TITLE_PRIORITY_FACTOR;
    assert!((c - expected).abs() < 1e-15);
}

#[test]
fn reset_restarts_the_ramp_and_titles() {
    let reg = registry(&[("t", AnimationMode::Title, 0.1)]);
    let mut rig = Rig::new(5);
    for _ in 0..10 {
        rig.step(&reg, params(10));
    }
    assert!(!rig.sched.titles_pending(&reg));
    rig.sched.reset();
    assert_eq!(rig.sched.ticks(), 0);
    assert_eq!(rig.sched.elapsed_seconds(), 0.0);
    assert!(rig.sched.titles_pending(&reg));
}

#[test]
fn chance_stays_a_probability_at_extreme_speeds() {
    let reg = registry(&[("l", AnimationMode::Layered, 1.0)]);
    let cfg = crate::engine::config::EngineConfig {
        spawn_speed_multiplier: f64::INFINITY,
        ..crate::engine::config::EngineConfig::default()
    };
    let p = SchedulerParams {
        max_instances: 10_000,
        spawn_speed: cfg.effective_spawn_speed(),
        reset_interval_seconds: None,
    };
    let mut rig = Rig::new(5);
    for _ in 0..800 {
        let chance = rig.step(&reg, p).chance.unwrap();
        assert!(chance.is_finite());
        assert!((0.0..=1.0).contains(&chance));
    }
    assert_eq!(rig.store.len(), 800);
}
