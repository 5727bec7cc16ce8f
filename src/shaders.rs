//! Uniform layouts of the shader programs the geometry pass can run with.
//!
//! Programs are compiled and linked elsewhere; these structs only remember the program handle and
//! where each uniform lives so the scene graph can feed them.

use crate::backend::{ShaderHandle, UniformLocation};

/// Which program and light a single [`crate::scene_graph::Root::draw`] call renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingMode {
    /// Material colour and diffuse texture only.
    Unlit,
    /// Material colour modulated by the root's ambient light colour.
    Ambient,
    Directional,
    Omni,
    /// Spot light with shadow lookup.
    Spot,
    /// Depth only, rendered from the spot light's point of view.
    ShadowDepth,
}

/// Matrices every colour program shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MvpUniforms {
    pub m: UniformLocation,
    pub v: UniformLocation,
    pub p: UniformLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSlot {
    pub sampler: UniformLocation,
    pub has_sampler: UniformLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicGeometryShader {
    pub program: ShaderHandle,
    pub mvp: MvpUniforms,
    pub material_color: UniformLocation,
    pub diffuse: TextureSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientLightShader {
    pub program: ShaderHandle,
    pub mvp: MvpUniforms,
    pub material_color: UniformLocation,
    pub ambient_light_color: UniformLocation,
    pub diffuse: TextureSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalLightShader {
    pub program: ShaderHandle,
    pub mvp: MvpUniforms,
    pub material_color: UniformLocation,
    pub normal_matrix_ecs: UniformLocation,
    pub light_direction_ecs: UniformLocation,
    pub light_color: UniformLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OmniLightShader {
    pub program: ShaderHandle,
    pub mvp: MvpUniforms,
    pub material_color: UniformLocation,
    pub normal_matrix_ecs: UniformLocation,
    pub light_position_ecs: UniformLocation,
    pub light_color: UniformLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotLightShader {
    pub program: ShaderHandle,
    pub mvp: MvpUniforms,
    pub material_color: UniformLocation,
    pub normal_matrix_ecs: UniformLocation,
    pub light_position_ecs: UniformLocation,
    pub light_direction_ecs: UniformLocation,
    pub light_color: UniformLocation,
    pub light_view_projection: UniformLocation,
    pub view_inverse: UniformLocation,
    pub sampler_shadow_map: UniformLocation,
    pub diffuse: TextureSlot,
    pub normal: TextureSlot,
    pub specular: TextureSlot,
    pub emission: TextureSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowMapShader {
    pub program: ShaderHandle,
    pub mvp: UniformLocation,
}

/// Programs registered on the root. A missing entry makes the matching [`ShadingMode`] draw
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSet {
    pub basic: Option<BasicGeometryShader>,
    pub ambient: Option<AmbientLightShader>,
    pub directional: Option<DirectionalLightShader>,
    pub omni: Option<OmniLightShader>,
    pub spot: Option<SpotLightShader>,
    pub shadow_map: Option<ShadowMapShader>,
}

impl ShaderSet {
    pub fn supports(&self, mode: ShadingMode) -> bool {
        match mode {
            ShadingMode::Unlit => self.basic.is_some(),
            ShadingMode::Ambient => self.ambient.is_some(),
            ShadingMode::Directional => self.directional.is_some(),
            ShadingMode::Omni => self.omni.is_some(),
            ShadingMode::Spot => self.spot.is_some(),
            ShadingMode::ShadowDepth => self.shadow_map.is_some(),
        }
    }
}

/// Hands out consecutive uniform locations, the way a linker would number active uniforms.
/// Handy when the real backend resolves names itself and only needs stable keys.
#[derive(Debug)]
pub struct UniformAllocator {
    next: i32,
}

impl UniformAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next(&mut self) -> UniformLocation {
        let location = UniformLocation(self.next);
        self.next += 1;
        location
    }

    fn mvp(&mut self) -> MvpUniforms {
        MvpUniforms {
            m: self.next(),
            v: self.next(),
            p: self.next(),
        }
    }

    fn sampler(&mut self) -> TextureSlot {
        TextureSlot {
            sampler: self.next(),
            has_sampler: self.next(),
        }
    }

    pub fn basic(&mut self, program: ShaderHandle) -> BasicGeometryShader {
        BasicGeometryShader {
            program,
            mvp: self.mvp(),
            material_color: self.next(),
            diffuse: self.sampler(),
        }
    }

    pub fn ambient(&mut self, program: ShaderHandle) -> AmbientLightShader {
        AmbientLightShader {
            program,
            mvp: self.mvp(),
            material_color: self.next(),
            ambient_light_color: self.next(),
            diffuse: self.sampler(),
        }
    }

    pub fn directional(&mut self, program: ShaderHandle) -> DirectionalLightShader {
        DirectionalLightShader {
            program,
            mvp: self.mvp(),
            material_color: self.next(),
            normal_matrix_ecs: self.next(),
            light_direction_ecs: self.next(),
            light_color: self.next(),
        }
    }

    pub fn omni(&mut self, program: ShaderHandle) -> OmniLightShader {
        OmniLightShader {
            program,
            mvp: self.mvp(),
            material_color: self.next(),
            normal_matrix_ecs: self.next(),
            light_position_ecs: self.next(),
            light_color: self.next(),
        }
    }

    pub fn spot(&mut self, program: ShaderHandle) -> SpotLightShader {
        SpotLightShader {
            program,
            mvp: self.mvp(),
            material_color: self.next(),
            normal_matrix_ecs: self.next(),
            light_position_ecs: self.next(),
            light_direction_ecs: self.next(),
            light_color: self.next(),
            light_view_projection: self.next(),
            view_inverse: self.next(),
            sampler_shadow_map: self.next(),
            diffuse: self.sampler(),
            normal: self.sampler(),
            specular: self.sampler(),
            emission: self.sampler(),
        }
    }

    pub fn shadow_map(&mut self, program: ShaderHandle) -> ShadowMapShader {
        ShadowMapShader {
            program,
            mvp: self.next(),
        }
    }

    /// One program per shading mode, programs numbered from 1.
    pub fn full_set(&mut self) -> ShaderSet {
        ShaderSet {
            basic: Some(self.basic(ShaderHandle(1))),
            ambient: Some(self.ambient(ShaderHandle(2))),
            directional: Some(self.directional(ShaderHandle(3))),
            omni: Some(self.omni(ShaderHandle(4))),
            spot: Some(self.spot(ShaderHandle(5))),
            shadow_map: Some(self.shadow_map(ShaderHandle(6))),
        }
    }
}

impl Default for UniformAllocator {
    fn default() -> Self {
        Self::new()
    }
}
