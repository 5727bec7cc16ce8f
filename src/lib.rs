//! Hierarchical scene graph for a forward OpenGL-style renderer.
//!
//! A [`Root`] owns a tree of group, transform and geometry nodes. Each frame the driver stores
//! camera and light state on the root and calls [`Root::draw`] once per pass; geometry leaves
//! compose their world matrix from the path to the root and feed it, together with the frame
//! state, to a [`RenderBackend`].

pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame_context;
pub mod light;
pub mod mesh;
pub mod scene_graph;
pub mod shaders;

pub use backend::{RecordingBackend, RenderBackend};
pub use config::SceneConfig;
pub use error::SceneError;
pub use frame_context::FrameContext;
pub use mesh::{Mesh, MeshId, MeshLibrary};
pub use scene_graph::{DrawStats, NodeId, Root, Transform};
pub use shaders::{ShaderSet, ShadingMode};
