use std::collections::HashMap;

use crate::animation::mode::AnimationMode;
use crate::animation::random::RandomModeWeights;
use crate::elements::shape::ElementShape;
use crate::foundation::color::Color;
use crate::foundation::error::{MossError, MossResult};
use crate::foundation::math::finite_clamp;

/// Nominal size given to elements without an explicit configuration.
pub const DEFAULT_ELEMENT_SIZE: f64 = 100.0;

/// Static template data for one visual asset. Immutable once registered.
#[derive(Clone, Debug)]
pub struct ElementDescriptor {
    /// Unique id.
    pub id: String,
    /// Human-readable name; also drives default-config inference.
    pub display_name: String,
    /// Mode used when no configuration overrides it.
    pub default_mode: AnimationMode,
    /// Fill / tint color used when no override is configured.
    pub default_color: Color,
    /// Stroke weight hint carried for hosts; the CPU canvas fills shapes.
    pub stroke_weight: f64,
    /// Drawable handle.
    pub shape: ElementShape,
}

impl ElementDescriptor {
    /// Descriptor with the default color and weight.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        default_mode: AnimationMode,
        shape: ElementShape,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            default_mode,
            default_color: Color::MOSS,
            stroke_weight: 1.0,
            shape,
        }
    }
}

/// Tunable parameters for one element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Spawn probability weight in `[0, 1]`.
    pub frequency: f64,
    /// Nominal pixel size; instances jitter ±30% around it.
    pub size: f64,
    /// Mode instances of this element spawn with.
    pub animation_mode: AnimationMode,
    /// Animation speed multiplier.
    pub animation_speed: f64,
    /// Weights used when `animation_mode` is `random`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_weights: Option<RandomModeWeights>,
    /// Replaces the descriptor color when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_override: Option<Color>,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            size: DEFAULT_ELEMENT_SIZE,
            animation_mode: AnimationMode::Pulse,
            animation_speed: 1.0,
            random_weights: None,
            color_override: None,
        }
    }
}

impl ElementConfig {
    /// Default configuration inferred from a descriptor's name.
    pub fn infer(desc: &ElementDescriptor) -> Self {
        let name = desc.display_name.to_ascii_lowercase();
        let (frequency, animation_mode) = if name.contains("sticker") {
            (0.8, AnimationMode::Layered)
        } else if name.contains("circle") {
            (0.12, AnimationMode::Rotate)
        } else {
            (0.1, desc.default_mode)
        };
        Self {
            frequency,
            animation_mode,
            ..Self::default()
        }
    }

    /// Frequency coerced into `[0, 1]`.
    pub fn effective_frequency(&self) -> f64 {
        finite_clamp(self.frequency, 0.0, 1.0, 0.0)
    }

    /// Size coerced to at least one pixel.
    pub fn effective_size(&self) -> f64 {
        finite_clamp(self.size, 1.0, f64::MAX, DEFAULT_ELEMENT_SIZE)
    }

    /// Speed coerced to a positive finite value; non-positive input means `1`.
    pub fn effective_speed(&self) -> f64 {
        if self.animation_speed.is_finite() && self.animation_speed > 0.0 {
            self.animation_speed
        } else {
            1.0
        }
    }

    /// Weights for random resolution; absent means all defaults.
    pub fn weights(&self) -> RandomModeWeights {
        self.random_weights.clone().unwrap_or_default()
    }

    fn apply(&mut self, patch: ElementConfigPatch) -> ConfigChange {
        let before = self.clone();
        if let Some(v) = patch.frequency {
            self.frequency = v;
        }
        if let Some(v) = patch.size {
            self.size = v;
        }
        if let Some(v) = patch.animation_mode {
            self.animation_mode = v;
        }
        if let Some(v) = patch.animation_speed {
            self.animation_speed = v;
        }
        if let Some(v) = patch.random_weights {
            self.random_weights = Some(v);
        }
        if let Some(v) = patch.color_override {
            self.color_override = v;
        }

        ConfigChange {
            mode: (before.animation_mode != self.animation_mode)
                .then_some((before.animation_mode, self.animation_mode)),
            speed_changed: before.effective_speed() != self.effective_speed(),
            color_changed: before.color_override != self.color_override,
        }
    }
}

/// Partial update merged shallowly into an [`ElementConfig`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementConfigPatch {
    /// New spawn frequency.
    pub frequency: Option<f64>,
    /// New nominal size.
    pub size: Option<f64>,
    /// New animation mode; live instances are hot-swapped.
    pub animation_mode: Option<AnimationMode>,
    /// New speed; propagates to live instances.
    pub animation_speed: Option<f64>,
    /// Replaces the whole weight map.
    pub random_weights: Option<RandomModeWeights>,
    /// `Some(None)` clears the override.
    #[serde(default, with = "double_option")]
    pub color_override: Option<Option<Color>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::foundation::color::Color;

    pub fn serialize<S: Serializer>(v: &Option<Option<Color>>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(inner) => inner.serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<Color>>, D::Error> {
        Option::<Color>::deserialize(d).map(Some)
    }
}

/// What an [`ElementRegistry::update`] changed, so the engine can propagate it to live instances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// `(old, new)` when the mode changed.
    pub mode: Option<(AnimationMode, AnimationMode)>,
    /// The effective animation speed changed.
    pub speed_changed: bool,
    /// The color override changed.
    pub color_changed: bool,
}

impl ConfigChange {
    /// `true` when the change moves the element into or out of the title sequence.
    pub fn touches_titles(&self) -> bool {
        self.mode
            .is_some_and(|(a, b)| a == AnimationMode::Title || b == AnimationMode::Title)
    }
}

/// Registered elements in registration order, plus their configuration.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    descriptors: Vec<ElementDescriptor>,
    configs: HashMap<String, ElementConfig>,
    title_order: Vec<String>,
}

impl ElementRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registered set, inferring configs for elements that have none yet.
    pub fn register(&mut self, descriptors: Vec<ElementDescriptor>) {
        self.register_with(descriptors, HashMap::new());
    }

    /// Replace the registered set using explicit configs where given.
    ///
    /// Configs of ids that remain registered survive; others are dropped. Duplicate ids keep
    /// the first descriptor.
    pub fn register_with(
        &mut self,
        descriptors: Vec<ElementDescriptor>,
        mut configs: HashMap<String, ElementConfig>,
    ) {
        let mut kept = Vec::with_capacity(descriptors.len());
        let mut next_configs = HashMap::with_capacity(descriptors.len());
        for desc in descriptors {
            if next_configs.contains_key(&desc.id) {
                tracing::warn!(id = %desc.id, "duplicate element id ignored");
                continue;
            }
            let cfg = configs
                .remove(&desc.id)
                .or_else(|| self.configs.remove(&desc.id))
                .unwrap_or_else(|| ElementConfig::infer(&desc));
            next_configs.insert(desc.id.clone(), cfg);
            kept.push(desc);
        }
        self.descriptors = kept;
        self.configs = next_configs;
        self.rebuild_title_order();
        tracing::info!(
            elements = self.descriptors.len(),
            titles = self.title_order.len(),
            "elements registered"
        );
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[ElementDescriptor] {
        &self.descriptors
    }

    /// Descriptor at a registration index.
    pub fn at(&self, index: usize) -> Option<&ElementDescriptor> {
        self.descriptors.get(index)
    }

    /// Descriptor by id.
    pub fn descriptor(&self, id: &str) -> Option<&ElementDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Configuration by id.
    pub fn config(&self, id: &str) -> Option<&ElementConfig> {
        self.configs.get(id)
    }

    /// Effective drawing color of an element.
    pub fn color(&self, id: &str) -> Option<Color> {
        let desc = self.descriptor(id)?;
        Some(
            self.configs
                .get(id)
                .and_then(|c| c.color_override)
                .unwrap_or(desc.default_color),
        )
    }

    /// Ids of title elements, sorted by id.
    pub fn title_order(&self) -> &[String] {
        &self.title_order
    }

    /// Merge `patch` into an element's config.
    pub fn update(&mut self, id: &str, patch: ElementConfigPatch) -> MossResult<ConfigChange> {
        let cfg = self
            .configs
            .get_mut(id)
            .ok_or_else(|| MossError::validation(format!("unknown element id '{id}'")))?;
        let change = cfg.apply(patch);
        if change.touches_titles() {
            self.rebuild_title_order();
            tracing::info!(titles = ?self.title_order, "title order recalculated");
        }
        Ok(change)
    }

    fn rebuild_title_order(&mut self) {
        let mut ids: Vec<String> = self
            .descriptors
            .iter()
            .filter(|d| {
                self.configs
                    .get(&d.id)
                    .is_some_and(|c| c.animation_mode == AnimationMode::Title)
            })
            .map(|d| d.id.clone())
            .collect();
        ids.sort();
        self.title_order = ids;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/elements/registry.rs"]
mod tests;
