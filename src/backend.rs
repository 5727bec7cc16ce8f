//! Boundary between the scene graph and whatever owns the GPU.
//!
//! Geometry nodes only ever talk to a [`RenderBackend`]; buffer creation, shader compilation
//! and texture uploads stay on the other side of this trait.

use glam::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Location of a uniform inside a linked program. Negative values are inactive uniforms and are
/// still forwarded; the backend decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    #[default]
    Triangles,
}

pub trait RenderBackend {
    fn bind_mesh(&mut self, mesh: MeshHandle);

    fn use_shader_program(&mut self, program: ShaderHandle);

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4);

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3);

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4);

    /// Sampler units and boolean flags.
    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32);

    /// `None` clears whatever is bound to `unit`.
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>);

    fn draw_indexed_range(&mut self, primitive: PrimitiveType, start_index: u32, index_count: u32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    BindMesh(MeshHandle),
    UseShaderProgram(ShaderHandle),
    SetUniformMat4(UniformLocation, Mat4),
    SetUniformVec3(UniformLocation, Vec3),
    SetUniformVec4(UniformLocation, Vec4),
    SetUniformI32(UniformLocation, i32),
    BindTexture(u32, Option<TextureHandle>),
    DrawIndexedRange {
        primitive: PrimitiveType,
        start_index: u32,
        index_count: u32,
    },
}

/// Keeps every call in order. Used by tests and by the demo to inspect a frame.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            BackendCall::DrawIndexedRange {
                start_index,
                index_count,
                ..
            } => Some((*start_index, *index_count)),
            _ => None,
        })
    }

    /// Every matrix uploaded to `location`, in call order.
    pub fn mat4_uploads(&self, location: UniformLocation) -> Vec<Mat4> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::SetUniformMat4(loc, matrix) if *loc == location => Some(*matrix),
                _ => None,
            })
            .collect()
    }

    pub fn vec3_uploads(&self, location: UniformLocation) -> Vec<Vec3> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::SetUniformVec3(loc, value) if *loc == location => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn vec4_uploads(&self, location: UniformLocation) -> Vec<Vec4> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::SetUniformVec4(loc, value) if *loc == location => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn bind_mesh(&mut self, mesh: MeshHandle) {
        self.calls.push(BackendCall::BindMesh(mesh));
    }

    fn use_shader_program(&mut self, program: ShaderHandle) {
        self.calls.push(BackendCall::UseShaderProgram(program));
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4) {
        self.calls.push(BackendCall::SetUniformMat4(location, *value));
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.calls.push(BackendCall::SetUniformVec3(location, value));
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        self.calls.push(BackendCall::SetUniformVec4(location, value));
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.calls.push(BackendCall::SetUniformI32(location, value));
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        self.calls.push(BackendCall::BindTexture(unit, texture));
    }

    fn draw_indexed_range(&mut self, primitive: PrimitiveType, start_index: u32, index_count: u32) {
        self.calls.push(BackendCall::DrawIndexedRange {
            primitive,
            start_index,
            index_count,
        });
    }
}

/// Forwards nothing to a GPU; writes each call to the `log` facade and counts draws.
#[derive(Debug, Default)]
pub struct LogBackend {
    pub draw_count: usize,
    pub index_count: u64,
}

impl LogBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.draw_count = 0;
        self.index_count = 0;
    }
}

impl RenderBackend for LogBackend {
    fn bind_mesh(&mut self, mesh: MeshHandle) {
        log::trace!("bind mesh {:?}", mesh);
    }

    fn use_shader_program(&mut self, program: ShaderHandle) {
        log::trace!("use program {:?}", program);
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &Mat4) {
        log::trace!("uniform {:?} = {:?}", location, value);
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        log::trace!("uniform {:?} = {:?}", location, value);
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        log::trace!("uniform {:?} = {:?}", location, value);
    }

    fn set_uniform_i32(&mut self, location: UniformLocation, value: i32) {
        log::trace!("uniform {:?} = {}", location, value);
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        log::trace!("texture unit {} <- {:?}", unit, texture);
    }

    fn draw_indexed_range(&mut self, primitive: PrimitiveType, start_index: u32, index_count: u32) {
        log::trace!(
            "draw {:?} indices {}..{}",
            primitive,
            start_index,
            start_index + index_count
        );
        self.draw_count += 1;
        self.index_count += u64::from(index_count);
    }
}
