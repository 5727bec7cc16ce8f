use glam::Mat4;
use id_arena::Id;
use std::cell::Cell;

use crate::mesh::MeshId;
use crate::scene_graph::root::Root;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<Node>;

/// What a node does during traversal.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The single tree owner. Carries no local transform.
    Root,
    /// Plain container; children inherit the parent's world matrix unchanged.
    Group,
    /// Container that applies its own local transform to every child.
    Transform(Transform),
    /// Leaf that renders an externally loaded mesh. `None` draws nothing.
    Geometry { mesh: Option<MeshId> },
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
    pub(crate) root_id: Option<NodeId>,
    world_matrix: Cell<Mat4>,
    inverse_transpose_world_matrix: Cell<Mat4>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent_id: None,
            child_ids: Vec::new(),
            root_id: None,
            world_matrix: Cell::new(Mat4::IDENTITY),
            inverse_transpose_world_matrix: Cell::new(Mat4::IDENTITY),
        }
    }

    /// Fixed at creation; the only mutable part of a node is its [`Transform`], reached through
    /// [`Root::transform_mut`].
    ///
    /// ```compile_fail
    /// # use lightgraph::scene_graph::Root;
    /// let mut root = Root::new();
    /// let group = root.create_group("group");
    /// let _kind = root.get_node(group).unwrap().kind.clone();
    /// ```
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    /// The root this node was wired to by [`Root::init`].
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    pub fn is_group(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Root | NodeKind::Group | NodeKind::Transform(_)
        )
    }

    pub fn transform(&self) -> Option<&Transform> {
        match &self.kind {
            NodeKind::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    pub(crate) fn transform_mut(&mut self) -> Option<&mut Transform> {
        match &mut self.kind {
            NodeKind::Transform(transform) => Some(transform),
            _ => None,
        }
    }

    pub fn mesh(&self) -> Option<MeshId> {
        match self.kind {
            NodeKind::Geometry { mesh } => mesh,
            _ => None,
        }
    }

    /// Identity for every node without a [`Transform`].
    pub fn local_matrix(&self) -> Mat4 {
        self.transform()
            .map(|transform| *transform.get_local_matrix())
            .unwrap_or(Mat4::IDENTITY)
    }

    /// World matrix as of the last [`Root::update`].
    pub fn cached_world_matrix(&self) -> Mat4 {
        self.world_matrix.get()
    }

    pub fn cached_inverse_transpose_world_matrix(&self) -> Mat4 {
        self.inverse_transpose_world_matrix.get()
    }

    pub(crate) fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.set(world_matrix);
        self.inverse_transpose_world_matrix
            .set(world_matrix.inverse().transpose());
    }

    pub fn parent<'a>(&self, root: &'a Root) -> Option<&'a Node> {
        self.parent_id.and_then(|id| root.get_node(id))
    }

    pub fn children<'a, 'b>(&'a self, root: &'b Root) -> impl Iterator<Item = &'b Node> + 'b
    where
        'a: 'b,
    {
        self.child_ids.iter().filter_map(move |id| root.get_node(*id))
    }
}
