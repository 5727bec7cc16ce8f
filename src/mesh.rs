use glam::Vec3;
use id_arena::{Arena, Id};

use crate::backend::{MeshHandle, TextureHandle};

pub type MeshId = Id<Mesh>;

/// A contiguous index range sharing one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submesh {
    pub material_index: usize,
    pub start_index: u32,
    pub triangles: u32,
}

impl Submesh {
    pub fn new(material_index: usize, start_index: u32, triangles: u32) -> Self {
        Self {
            material_index,
            start_index,
            triangles,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.triangles * 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialTextures {
    pub diffuse: Option<TextureHandle>,
    pub normal: Option<TextureHandle>,
    pub specular: Option<TextureHandle>,
    pub emission: Option<TextureHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Vec3,
    pub opacity: f32,
    pub textures: MaterialTextures,
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse,
            opacity: 1.0,
            textures: MaterialTextures::default(),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_textures(mut self, textures: MaterialTextures) -> Self {
        self.textures = textures;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", Vec3::ONE)
    }
}

/// Mesh as handed over by the asset loader: a GPU buffer handle plus the submesh and material
/// tables needed to issue per-material draws.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub buffer: MeshHandle,
    pub elements: Vec<Submesh>,
    pub materials: Vec<Material>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, buffer: MeshHandle) -> Self {
        Self {
            name: name.into(),
            buffer,
            elements: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_element(mut self, element: Submesh) -> Self {
        self.elements.push(element);
        self
    }

    /// Submeshes with at least one triangle, paired with their material.
    ///
    /// An element whose material index is out of range falls back to the default material.
    pub fn drawable_elements(&self) -> impl Iterator<Item = (&Submesh, Option<&Material>)> {
        self.elements
            .iter()
            .filter(|element| !element.is_empty())
            .map(|element| (element, self.materials.get(element.material_index)))
    }
}

/// Meshes loaded outside the scene graph. Geometry nodes refer to them by [`MeshId`].
pub struct MeshLibrary {
    meshes: Arena<Mesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self {
            meshes: Arena::new(),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.alloc(mesh)
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn get_mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes
            .iter()
            .find(|(_, mesh)| mesh.name == name)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.len() == 0
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().map(|(_, mesh)| mesh)
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawable_elements_skip_empty_submeshes() {
        let mesh = Mesh::new("crate", MeshHandle(1))
            .with_material(Material::new("wood", Vec3::new(0.6, 0.4, 0.2)))
            .with_element(Submesh::new(0, 0, 12))
            .with_element(Submesh::new(0, 36, 0))
            .with_element(Submesh::new(0, 36, 2));

        let starts: Vec<u32> = mesh
            .drawable_elements()
            .map(|(element, _)| element.start_index)
            .collect();

        assert_eq!(starts, vec![0, 36]);
    }

    #[test]
    fn library_lookup_by_name() {
        let mut library = MeshLibrary::new();
        let sphere = library.add_mesh(Mesh::new("sphere", MeshHandle(3)));
        library.add_mesh(Mesh::new("plane", MeshHandle(4)));

        assert_eq!(library.get_mesh_by_name("sphere"), Some(sphere));
        assert_eq!(library.get_mesh_by_name("teapot"), None);
        assert_eq!(library.len(), 2);
    }
}
