use std::cell::Cell;

use glam::{Mat4, Vec3};
use id_arena::Arena;

use crate::backend::RenderBackend;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::frame_context::FrameContext;
use crate::light::{DirectionalLight, OmniLight, SpotLight};
use crate::mesh::{MeshId, MeshLibrary};
use crate::scene_graph::geometry::{draw_geometry, DrawEnv, GeometryOutcome, SkipReason};
use crate::scene_graph::node::{Node, NodeId, NodeKind};
use crate::scene_graph::transform::Transform;
use crate::shaders::{ShaderSet, ShadingMode};

/// Counters of a single [`Root::draw`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: usize,
    pub drawn_nodes: usize,
    pub skipped_nodes: usize,
}

/// Owner of the scene tree and of the per-frame camera, light and shader state.
///
/// Nodes live in an arena owned by the root and are created detached. [`Root::add_child`]
/// builds the tree, [`Root::init`] wires every reachable node to this root once the shape is
/// final, and from then on the tree can be updated and drawn but not restructured.
///
/// World matrices are cached on the nodes. Editing a transform marks the cache stale and the next
/// [`Root::update`] or [`Root::draw`] refreshes it.
pub struct Root {
    nodes: Arena<Node>,
    root_id: NodeId,
    initialized: bool,
    world_dirty: Cell<bool>,
    context: FrameContext,
    shaders: ShaderSet,
    config: SceneConfig,
}

impl Root {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let mut nodes = Arena::new();
        let root_id = nodes.alloc(Node::new("root", NodeKind::Root));
        nodes[root_id].root_id = Some(root_id);

        Self {
            nodes,
            root_id,
            initialized: false,
            world_dirty: Cell::new(true),
            context: FrameContext::default(),
            shaders: ShaderSet::default(),
            config,
        }
    }

    pub fn id(&self) -> NodeId {
        self.root_id
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn create_group(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.alloc(Node::new(name, NodeKind::Group))
    }

    pub fn create_transform(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes
            .alloc(Node::new(name, NodeKind::Transform(Transform::default())))
    }

    pub fn create_geometry(&mut self, name: impl Into<String>, mesh: Option<MeshId>) -> NodeId {
        self.nodes.alloc(Node::new(name, NodeKind::Geometry { mesh }))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// First node with this name. Names are diagnostic; nothing prevents duplicates.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// The only mutable access to a node. Marks the cached world matrices stale.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        let transform = self.nodes.get_mut(id).and_then(Node::transform_mut)?;
        self.world_dirty.set(true);
        Some(transform)
    }

    fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Appends `child` to `parent`'s children. Insertion order is draw order.
    ///
    /// The child must be detached; there is no way to move a node once it has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if self.initialized {
            return Err(SceneError::AlreadyInitialized);
        }
        if child == self.root_id {
            return Err(SceneError::CannotAttachRoot);
        }
        if !parent_node.is_group() {
            return Err(SceneError::NotAGroup(parent_node.name.clone()));
        }
        if child_node.parent_id.is_some() {
            return Err(SceneError::AlreadyAttached(child_node.name.clone()));
        }

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(SceneError::WouldCreateCycle {
                    parent: parent_node.name.clone(),
                    child: child_node.name.clone(),
                });
            }
            ancestor = self.nodes.get(id).and_then(|node| node.parent_id);
        }

        self.nodes[child].parent_id = Some(parent);
        self.nodes[parent].child_ids.push(child);

        Ok(())
    }

    /// Points every node reachable from the root back at it. Runs once, after the tree is built.
    pub fn init(&mut self) -> Result<(), SceneError> {
        if self.initialized {
            return Err(SceneError::AlreadyInitialized);
        }

        let descendants = self.descendants(self.root_id);
        for &id in &descendants {
            self.nodes[id].root_id = Some(self.root_id);
        }
        self.initialized = true;

        log::debug!("scene initialized with {} nodes", descendants.len() + 1);

        Ok(())
    }

    /// Every node below `id`, depth first, in draw order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(id) {
            Some(node) => node.child_ids.iter().rev().copied().collect(),
            None => return result,
        };

        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.child_ids.iter().rev().copied());
            }
        }

        result
    }

    /// Object-to-world matrix of `id`: the parent's world matrix times the node's local one.
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let node = self.node(id)?;
        let local = node.local_matrix();

        match node.parent_id {
            Some(parent) => Ok(self.world_transform(parent)? * local),
            None => Ok(local),
        }
    }

    /// Refreshes the cached world matrix of every node, parents before children.
    pub fn update(&self) -> Result<(), SceneError> {
        if !self.initialized {
            return Err(SceneError::NotInitialized);
        }

        self.refresh_world_matrices();

        Ok(())
    }

    fn refresh_world_matrices(&self) {
        self.update_node_recursive(self.root_id, Mat4::IDENTITY);
        self.world_dirty.set(false);
    }

    fn update_node_recursive(&self, id: NodeId, parent_world_matrix: Mat4) {
        if let Some(node) = self.nodes.get(id) {
            let world_matrix = parent_world_matrix * node.local_matrix();
            node.set_world_matrix(world_matrix);

            for &child_id in &node.child_ids {
                self.update_node_recursive(child_id, world_matrix);
            }
        }
    }

    /// Draws the whole tree with one shading mode, using the root's frame state.
    pub fn draw<B: RenderBackend + ?Sized>(
        &self,
        mode: ShadingMode,
        meshes: &MeshLibrary,
        backend: &mut B,
    ) -> Result<DrawStats, SceneError> {
        self.draw_with_context(&self.context, mode, meshes, backend)
    }

    /// Same as [`Root::draw`] with an explicitly supplied frame state.
    pub fn draw_with_context<B: RenderBackend + ?Sized>(
        &self,
        context: &FrameContext,
        mode: ShadingMode,
        meshes: &MeshLibrary,
        backend: &mut B,
    ) -> Result<DrawStats, SceneError> {
        if !self.initialized {
            return Err(SceneError::NotInitialized);
        }
        self.check_meshes(meshes)?;
        if self.world_dirty.get() {
            self.refresh_world_matrices();
        }
        if !self.shaders.supports(mode) {
            log::warn!("no shader registered for {:?}; nothing will be drawn", mode);
        }

        let env = DrawEnv {
            context,
            shaders: &self.shaders,
            config: &self.config,
        };
        let mut stats = DrawStats::default();

        self.draw_node_recursive(self.root_id, mode, &env, meshes, backend, &mut stats);

        Ok(stats)
    }

    /// Fails before anything reaches the backend if a reachable geometry node names a mesh the
    /// library does not hold.
    fn check_meshes(&self, meshes: &MeshLibrary) -> Result<(), SceneError> {
        for id in self.descendants(self.root_id) {
            let node = self.node(id)?;
            if let Some(mesh_id) = node.mesh() {
                if meshes.get(mesh_id).is_none() {
                    return Err(SceneError::UnknownMesh {
                        node: node.name.clone(),
                        mesh: mesh_id,
                    });
                }
            }
        }

        Ok(())
    }

    fn draw_node_recursive<B: RenderBackend + ?Sized>(
        &self,
        id: NodeId,
        mode: ShadingMode,
        env: &DrawEnv,
        meshes: &MeshLibrary,
        backend: &mut B,
        stats: &mut DrawStats,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        if let NodeKind::Geometry { mesh } = node.kind {
            let world_matrix = node.cached_world_matrix();
            let outcome = match mesh.and_then(|mesh_id| meshes.get(mesh_id)) {
                None => GeometryOutcome::Skipped(SkipReason::NoMesh),
                Some(mesh) => draw_geometry(mesh, &world_matrix, mode, env, backend),
            };

            match outcome {
                GeometryOutcome::Drawn(draws) => {
                    stats.draw_calls += draws;
                    stats.drawn_nodes += 1;
                }
                GeometryOutcome::Skipped(reason) => {
                    log::trace!("skipped '{}' ({:?}) for {:?}", node.name, reason, mode);
                    stats.skipped_nodes += 1;
                }
            }
        }

        for &child_id in &node.child_ids {
            self.draw_node_recursive(child_id, mode, env, meshes, backend, stats);
        }
    }

    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut FrameContext {
        &mut self.context
    }

    pub fn view_mat(&self) -> Mat4 {
        self.context.view
    }

    pub fn projection_mat(&self) -> Mat4 {
        self.context.projection
    }

    pub fn set_view_mat(&mut self, view: Mat4) {
        self.context.view = view;
    }

    pub fn set_projection_mat(&mut self, projection: Mat4) {
        self.context.projection = projection;
    }

    pub fn set_light_view_mat(&mut self, light_view: Mat4) {
        self.context.light_view = light_view;
    }

    pub fn set_light_projection_mat(&mut self, light_projection: Mat4) {
        self.context.light_projection = light_projection;
    }

    pub fn set_ambient_light_color(&mut self, color: Vec3) {
        self.context.ambient_light_color = color;
    }

    pub fn set_active_directional_light(&mut self, light: Option<DirectionalLight>) {
        self.context.directional_light = light;
    }

    pub fn set_active_omni_light(&mut self, light: Option<OmniLight>) {
        self.context.omni_light = light;
    }

    pub fn set_active_spotlight(&mut self, light: Option<SpotLight>) {
        self.context.spotlight = light;
    }

    pub fn shaders(&self) -> &ShaderSet {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderSet {
        &mut self.shaders
    }

    pub fn set_shaders(&mut self, shaders: ShaderSet) {
        self.shaders = shaders;
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}
