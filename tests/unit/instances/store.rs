use super::*;
use crate::animation::mode::RotateState;

fn inst(id: u64, element: &str) -> Instance {
    Instance {
        id: InstanceId(id),
        element_id: element.to_owned(),
        position: Point::new(1.0, 2.0),
        size: 50.0,
        rotation: 0.0,
        opacity: 1.0,
        animation_mode: AnimationMode::Rotate,
        state: ModeState::Rotate(RotateState { direction: 1.0 }),
        age: 0,
        lifespan: Lifespan::Persistent,
        speed: 1.0,
        rng_draw: 0.5,
    }
}

#[test]
fn insert_get_remove() {
    let mut s = InstanceStore::new();
    s.insert(inst(1, "a"));
    s.insert(inst(2, "b"));
    assert_eq!(s.len(), 2);
    assert_eq!(s.get(InstanceId(2)).unwrap().element_id, "b");
    assert!(s.remove(InstanceId(1)).is_some());
    assert!(s.remove(InstanceId(1)).is_none());
    assert_eq!(s.len(), 1);
}

#[test]
fn sorted_views_follow_ids() {
    let mut s = InstanceStore::new();
    for id in [9, 3, 7, 1] {
        s.insert(inst(id, if id % 3 == 0 { "x" } else { "y" }));
    }
    assert_eq!(
        s.sorted_ids(),
        vec![InstanceId(1), InstanceId(3), InstanceId(7), InstanceId(9)]
    );
    assert_eq!(s.ids_of("x"), vec![InstanceId(3), InstanceId(9)]);
    let ids: Vec<u64> = s.sorted().iter().map(|i| i.id.0).collect();
    assert_eq!(ids, vec![1, 3, 7, 9]);
}

#[test]
fn eviction_removes_lowest_ids() {
    let mut s = InstanceStore::new();
    for id in 1..=5 {
        s.insert(inst(id, "a"));
    }
    assert_eq!(s.evict_oldest(2), 2);
    assert_eq!(s.sorted_ids(), vec![InstanceId(3), InstanceId(4), InstanceId(5)]);
    assert_eq!(s.evict_oldest(10), 3);
    assert!(s.is_empty());
}

#[test]
fn retire_expired_only_drops_finished_lifespans() {
    let mut s = InstanceStore::new();
    let mut done = inst(1, "a");
    done.lifespan = Lifespan::Ticks(10);
    done.age = 10;
    let mut young = inst(2, "a");
    young.lifespan = Lifespan::Ticks(10);
    young.age = 3;
    s.insert(done);
    s.insert(young);
    s.insert(inst(3, "a"));
    assert_eq!(s.retire_expired(), 1);
    assert!(s.get(InstanceId(1)).is_none());
    assert_eq!(s.len(), 2);
}

#[test]
fn instance_transform_uses_its_state() {
    let mut i = inst(1, "a");
    assert_eq!(i.actual_mode(), ConcreteMode::Rotate);
    assert_eq!(i.transform().opacity, 0.0);
    i.age = 600;
    assert_eq!(i.transform().opacity, 1.0);
}
