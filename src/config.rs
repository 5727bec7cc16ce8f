use std::path::Path;

use serde::Deserialize;

use crate::error::SceneError;

/// Texture unit each sampler is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextureUnits {
    pub diffuse: u32,
    pub normal: u32,
    pub specular: u32,
    pub emission: u32,
    pub shadow_map: u32,
}

impl Default for TextureUnits {
    fn default() -> Self {
        Self {
            diffuse: 0,
            normal: 1,
            specular: 2,
            emission: 3,
            shadow_map: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub texture_units: TextureUnits,
    /// Field of view of the spot light frustum used for the shadow pass, in degrees.
    pub shadow_fov_degrees: f32,
    /// Clear the material texture units after every submesh so the next one does not sample a
    /// stale texture.
    pub unbind_textures_after_submesh: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_units: TextureUnits::default(),
            shadow_fov_degrees: 90.0,
            unbind_textures_after_submesh: true,
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, SceneError> {
        toml::from_str(source).map_err(|e| SceneError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }
}
