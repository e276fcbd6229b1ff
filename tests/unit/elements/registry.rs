use super::*;
use crate::elements::shape::ElementShape;

fn shape() -> ElementShape {
    ElementShape::from_path_data("M0 0 L10 0 L10 10 Z").unwrap()
}

fn desc(id: &str, name: &str, mode: AnimationMode) -> ElementDescriptor {
    ElementDescriptor::new(id, name, mode, shape())
}

#[test]
fn inference_follows_names() {
    let mut reg = ElementRegistry::new();
    reg.register(vec![
        desc("a", "Sticker_Leaf", AnimationMode::Pulse),
        desc("b", "circle-dot", AnimationMode::Pulse),
        desc("c", "glyph", AnimationMode::Flicker),
    ]);
    let a = reg.config("a").unwrap();
    assert_eq!((a.frequency, a.animation_mode), (0.8, AnimationMode::Layered));
    let b = reg.config("b").unwrap();
    assert_eq!((b.frequency, b.animation_mode), (0.12, AnimationMode::Rotate));
    let c = reg.config("c").unwrap();
    assert_eq!((c.frequency, c.animation_mode), (0.1, AnimationMode::Flicker));
    assert_eq!(c.size, DEFAULT_ELEMENT_SIZE);
}

#[test]
fn explicit_configs_win_and_survive_reregistration() {
    let mut reg = ElementRegistry::new();
    let mut configs = HashMap::new();
    configs.insert(
        "a".to_owned(),
        ElementConfig {
            frequency: 0.5,
            ..ElementConfig::default()
        },
    );
    reg.register_with(vec![desc("a", "sticker", AnimationMode::Pulse)], configs);
    assert_eq!(reg.config("a").unwrap().frequency, 0.5);

    reg.register(vec![
        desc("a", "sticker", AnimationMode::Pulse),
        desc("b", "x", AnimationMode::Pulse),
    ]);
    assert_eq!(reg.config("a").unwrap().frequency, 0.5);
    assert_eq!(reg.len(), 2);
}

#[test]
fn duplicate_ids_keep_the_first() {
    let mut reg = ElementRegistry::new();
    reg.register(vec![
        desc("a", "first", AnimationMode::Pulse),
        desc("a", "second", AnimationMode::Rotate),
    ]);
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.descriptor("a").unwrap().display_name, "first");
}

#[test]
fn title_order_is_sorted_and_tracks_mode_changes() {
    let mut reg = ElementRegistry::new();
    reg.register(vec![
        desc("t3", "t", AnimationMode::Title),
        desc("t1", "t", AnimationMode::Title),
        desc("p", "p", AnimationMode::Pulse),
    ]);
    assert_eq!(reg.title_order(), ["t1", "t3"]);

    let change = reg
        .update(
            "p",
            ElementConfigPatch {
                animation_mode: Some(AnimationMode::Title),
                ..ElementConfigPatch::default()
            },
        )
        .unwrap();
    assert!(change.touches_titles());
    assert_eq!(reg.title_order(), ["p", "t1", "t3"]);
}

#[test]
fn update_reports_changes_and_rejects_unknown_ids() {
    let mut reg = ElementRegistry::new();
    reg.register(vec![desc("a", "x", AnimationMode::Pulse)]);

    let change = reg
        .update(
            "a",
            ElementConfigPatch {
                animation_speed: Some(2.0),
                color_override: Some(Some(Color::rgba(0.0, 0.0, 0.0, 1.0))),
                ..ElementConfigPatch::default()
            },
        )
        .unwrap();
    assert_eq!(change.mode, None);
    assert!(change.speed_changed && change.color_changed);
    assert_eq!(reg.color("a"), Some(Color::rgba(0.0, 0.0, 0.0, 1.0)));

    let err = reg.update("zzz", ElementConfigPatch::default()).unwrap_err();
    assert!(matches!(err, MossError::Validation(_)));
}

#[test]
fn numeric_fields_are_coerced_at_use() {
    let cfg = ElementConfig {
        frequency: 4.0,
        size: -3.0,
        animation_speed: 0.0,
        ..ElementConfig::default()
    };
    assert_eq!(cfg.effective_frequency(), 1.0);
    assert_eq!(cfg.effective_size(), 1.0);
    assert_eq!(cfg.effective_speed(), 1.0);

    let nan = ElementConfig {
        frequency: f64::NAN,
        animation_speed: f64::NAN,
        ..ElementConfig::default()
    };
    assert_eq!(nan.effective_frequency(), 0.0);
    assert_eq!(nan.effective_speed(), 1.0);
}

#[test]
fn patch_deserializes_color_clear() {
    let p: ElementConfigPatch =
        serde_json::from_value(serde_json::json!({"color_override": null})).unwrap();
    assert_eq!(p.color_override, Some(None));
    let p: ElementConfigPatch = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(p.color_override, None);
}
