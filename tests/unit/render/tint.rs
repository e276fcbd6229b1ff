use super::*;

#[test]
fn keys_carry_element_and_color() {
    assert_eq!(tint_key("leaf", Color::rgba(0.0, 0.0, 0.0, 1.0)), "leaf::#000000");
    assert!(tint_key("leaf", Color::WHITE).starts_with(&element_prefix("leaf")));
}

#[test]
fn prefix_invalidation_only_touches_one_element() {
    let mut cache: TintCache<u32> = TintCache::new();
    let mut builds = 0;
    for (id, color) in [
        ("leaf", Color::rgba(0.0, 0.0, 0.0, 1.0)),
        ("leaf", Color::WHITE),
        ("leaflet", Color::rgba(0.0, 0.0, 0.0, 1.0)),
        ("stone", Color::rgba(0.0, 0.0, 0.0, 1.0)),
    ] {
        cache
            .get_or_try_insert_with::<()>(&tint_key(id, color), || {
                builds += 1;
                Ok(builds)
            })
            .unwrap();
    }
    assert_eq!(cache.len(), 4);

    let hit = cache
        .get_or_try_insert_with::<()>(&tint_key("leaf", Color::rgba(0.0, 0.0, 0.0, 1.0)), || Ok(99))
        .unwrap();
    assert_eq!(hit, 1);

    assert_eq!(cache.invalidate_prefix(&element_prefix("leaf")), 2);
    assert!(cache.contains(&tint_key("leaflet", Color::rgba(0.0, 0.0, 0.0, 1.0))));
    assert!(!cache.contains(&tint_key("leaf", Color::WHITE)));
}

#[test]
fn invalidation_spares_ids_nested_under_another() {
    let mut cache: TintCache<u32> = TintCache::new();
    let red = Color::rgba(1.0, 0.0, 0.0, 1.0);
    for (n, id) in ["a", "a::b", "a::b::c"].into_iter().enumerate() {
        cache
            .get_or_try_insert_with::<()>(&tint_key(id, red), || Ok(n as u32))
            .unwrap();
    }

    assert_eq!(cache.invalidate_prefix(&element_prefix("a")), 1);
    assert!(cache.contains(&tint_key("a::b", red)));
    assert!(cache.contains(&tint_key("a::b::c", red)));

    assert_eq!(cache.invalidate_prefix(&element_prefix("a::b")), 1);
    assert!(cache.contains(&tint_key("a::b::c", red)));
}

#[test]
fn build_errors_are_not_cached() {
    let mut cache: TintCache<u8> = TintCache::new();
    let err = cache.get_or_try_insert_with("k", || Err("boom"));
    assert_eq!(err, Err("boom"));
    assert!(cache.is_empty());
}

#[test]
fn tint_keeps_coverage() {
    let mut px = vec![10, 20, 30, 255, 5, 5, 5, 128, 0, 0, 0, 0];
    tint_premul_rgba8(&mut px, Color::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(&px[0..4], &[255, 0, 0, 255]);
    assert_eq!(&px[4..8], &[128, 0, 0, 128]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}
