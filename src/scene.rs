//! JSON scene files for hosts that drive the engine headlessly.
//!
//! A scene names the engine settings and the elements to register. Each element points at an SVG
//! file (relative to the scene's directory) or carries inline path data.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::animation::mode::AnimationMode;
use crate::elements::registry::{ElementConfigPatch, ElementDescriptor};
use crate::elements::shape::ElementShape;
use crate::engine::clock::FrameClock;
use crate::engine::config::EngineConfigPatch;
use crate::engine::runtime::Engine;
use crate::foundation::color::Color;
use crate::foundation::error::{MossError, MossResult};
use crate::render::target::RenderTarget;

/// Top-level scene document.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scene {
    /// Engine settings applied on top of the defaults.
    pub engine: EngineConfigPatch,
    /// Elements in registration order.
    pub elements: Vec<SceneElement>,
}

/// One element entry.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneElement {
    /// Unique id.
    pub id: String,
    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Mode used when the config does not override it.
    #[serde(default = "default_mode")]
    pub default_mode: AnimationMode,
    /// Base color.
    #[serde(default)]
    pub color: Option<Color>,
    /// Stroke weight hint.
    #[serde(default = "default_stroke_weight")]
    pub stroke_weight: f64,
    /// SVG file, relative to the scene directory.
    #[serde(default)]
    pub svg: Option<PathBuf>,
    /// Inline SVG path data.
    #[serde(default)]
    pub path: Option<String>,
    /// Overrides merged into the inferred configuration.
    #[serde(default)]
    pub config: Option<ElementConfigPatch>,
}

fn default_mode() -> AnimationMode {
    AnimationMode::Pulse
}

fn default_stroke_weight() -> f64 {
    1.0
}

impl Scene {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MossResult<Self> {
        serde_json::from_reader(r).map_err(|e| MossError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MossResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MossError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Resolve every element into a descriptor, loading SVG files below `root`.
    pub fn descriptors(&self, root: &Path) -> MossResult<Vec<ElementDescriptor>> {
        self.elements.iter().map(|e| e.descriptor(root)).collect()
    }

    /// Canvas size requested by the scene, falling back to `fallback` per axis.
    pub fn canvas_size(&self, fallback: (u32, u32)) -> (u32, u32) {
        (
            self.engine.canvas_width.unwrap_or(fallback.0),
            self.engine.canvas_height.unwrap_or(fallback.1),
        )
    }

    /// Register the scene's elements on `engine` and merge their config overrides.
    ///
    /// Engine settings are not touched; pass [`Scene::engine`] when constructing the engine.
    pub fn install<T: RenderTarget, C: FrameClock>(
        &self,
        engine: &mut Engine<T, C>,
        root: &Path,
    ) -> MossResult<()> {
        engine.register_elements(self.descriptors(root)?);
        for e in &self.elements {
            if let Some(patch) = &e.config {
                engine.update_element_config(&e.id, patch.clone())?;
            }
        }
        Ok(())
    }
}

impl SceneElement {
    fn descriptor(&self, root: &Path) -> MossResult<ElementDescriptor> {
        let shape = match (&self.svg, &self.path) {
            (Some(svg), None) => {
                let full = root.join(svg);
                let bytes = std::fs::read(&full).map_err(|e| {
                    MossError::asset(format!("read svg '{}': {e}", full.display()))
                })?;
                ElementShape::from_svg_bytes(&bytes)?
            }
            (None, Some(d)) => ElementShape::from_path_data(d)?,
            _ => {
                return Err(MossError::validation(format!(
                    "element '{}' needs exactly one of `svg` or `path`",
                    self.id
                )));
            }
        };

        let mut desc = ElementDescriptor::new(
            self.id.clone(),
            self.name.clone().unwrap_or_else(|| self.id.clone()),
            self.default_mode,
            shape,
        );
        if let Some(c) = self.color {
            desc.default_color = c;
        }
        desc.stroke_weight = self.stroke_weight;
        Ok(desc)
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
