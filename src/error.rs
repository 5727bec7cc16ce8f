use thiserror::Error;

use crate::mesh::MeshId;
use crate::scene_graph::NodeId;

/// Misuse of the scene tree or of its configuration.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("node {0:?} does not belong to this scene")]
    UnknownNode(NodeId),

    #[error("node '{0}' cannot have children")]
    NotAGroup(String),

    #[error("node '{0}' already has a parent; nodes cannot be moved between groups")]
    AlreadyAttached(String),

    #[error("the root cannot be attached to another node")]
    CannotAttachRoot,

    #[error("attaching '{child}' under '{parent}' would create a cycle")]
    WouldCreateCycle { parent: String, child: String },

    #[error("the scene has already been initialized")]
    AlreadyInitialized,

    #[error("the scene must be initialized before it is updated or drawn")]
    NotInitialized,

    #[error("geometry node '{node}' refers to mesh {mesh:?} which is not in the mesh library")]
    UnknownMesh { node: String, mesh: MeshId },

    #[error("configuration error: {0}")]
    Config(String),
}
