//! In-memory host used by the CLI and by tests: readiness flags, a table of
//! named elements, a scene graph, and a counting physics engine.

use glam::Vec3;
use std::collections::{BTreeMap, BTreeSet};
use vrscene_common::{NodeHandle, PhysicsBodyId, Transform};
use vrscene_ecs::{PhysicsShape, Primitive};

use crate::config::InteractionSource;
use crate::host::{Lookup, NodeResolver, PhysicsEngine, ReadinessSignal, SceneGraph};

/// One node of the headless scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    /// Element id for named nodes.
    pub label: Option<String>,
    /// Set for nodes built through [`SceneGraph::create_node`].
    pub primitive: Option<Primitive>,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
    pub position: Vec3,
    pub body: Option<PhysicsBodyId>,
}

impl HeadlessNode {
    fn new(label: Option<String>, primitive: Option<Primitive>) -> Self {
        Self {
            label,
            primitive,
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            body: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Present(NodeHandle),
    Pending,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    ready: BTreeSet<String>,
    elements: BTreeMap<String, Element>,
    nodes: BTreeMap<NodeHandle, HeadlessNode>,
    root: NodeHandle,
    next_node: u64,
    next_body: u64,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// A host with only a root node, nothing ready, and no elements.
    pub fn new() -> Self {
        let root = NodeHandle(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, HeadlessNode::new(Some("scene".into()), None));
        Self {
            ready: BTreeSet::new(),
            elements: BTreeMap::new(),
            nodes,
            root,
            next_node: 1,
            next_body: 1,
        }
    }

    /// Ready host carrying the four default interaction elements, each with
    /// a physics body.
    pub fn with_default_rig() -> Self {
        let mut host = Self::new();
        host.set_ready("physics", true);
        for source in InteractionSource::defaults() {
            host.add_element(&source.element_id);
        }
        host
    }

    pub fn set_ready(&mut self, subsystem: &str, ready: bool) {
        if ready {
            self.ready.insert(subsystem.to_string());
        } else {
            self.ready.remove(subsystem);
        }
    }

    fn alloc_node(&mut self, node: HeadlessNode) -> NodeHandle {
        let handle = NodeHandle(self.next_node);
        self.next_node += 1;
        self.nodes.insert(handle, node);
        handle
    }

    /// Add a named element with a physics body, replacing any previous one.
    pub fn add_element(&mut self, id: &str) -> NodeHandle {
        let handle = self.add_element_without_body(id);
        let body = PhysicsBodyId(self.next_body);
        self.next_body += 1;
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.body = Some(body);
        }
        handle
    }

    /// Add a named element whose physics body has not been created yet.
    pub fn add_element_without_body(&mut self, id: &str) -> NodeHandle {
        let handle = self.alloc_node(HeadlessNode::new(Some(id.to_string()), None));
        self.elements.insert(id.to_string(), Element::Present(handle));
        handle
    }

    /// The element is announced but not yet created.
    pub fn mark_pending(&mut self, id: &str) {
        self.elements.insert(id.to_string(), Element::Pending);
    }

    pub fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&HeadlessNode> {
        self.nodes.get(&handle)
    }

    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(&handle)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl ReadinessSignal for HeadlessHost {
    fn is_ready(&self, subsystem: &str) -> bool {
        self.ready.contains(subsystem)
    }
}

impl NodeResolver for HeadlessHost {
    fn resolve_node(&self, id: &str) -> Lookup<NodeHandle> {
        match self.elements.get(id) {
            Some(Element::Present(handle)) => Lookup::Found(*handle),
            Some(Element::Pending) => Lookup::Pending,
            None => Lookup::Missing,
        }
    }

    fn physics_body(&self, node: NodeHandle) -> Lookup<PhysicsBodyId> {
        match self.nodes.get(&node) {
            Some(HeadlessNode { body: Some(body), .. }) => Lookup::Found(*body),
            Some(_) => Lookup::Pending,
            None => Lookup::Missing,
        }
    }
}

impl SceneGraph for HeadlessHost {
    fn root(&self) -> NodeHandle {
        self.root
    }

    fn create_node(&mut self, primitive: &Primitive) -> NodeHandle {
        self.alloc_node(HeadlessNode::new(None, Some(*primitive)))
    }

    fn attach_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        let previous = self.nodes.get(&child).and_then(|n| n.parent);
        if let Some(old) = previous.and_then(|p| self.nodes.get_mut(&p)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn set_position(&mut self, node: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.position = position;
        }
    }
}

/// Physics engine that only tracks bodies and counts syncs.
#[derive(Debug, Default)]
pub struct HeadlessPhysics {
    bodies: BTreeMap<PhysicsBodyId, Transform>,
    next_id: u64,
    syncs: usize,
}

impl HeadlessPhysics {
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn sync_count(&self) -> usize {
        self.syncs
    }

    pub fn body(&self, id: PhysicsBodyId) -> Option<&Transform> {
        self.bodies.get(&id)
    }
}

impl PhysicsEngine for HeadlessPhysics {
    fn create_body(
        &mut self,
        _shape: Option<&PhysicsShape>,
        transform: &Transform,
    ) -> PhysicsBodyId {
        // Offset away from the ids the host hands out for its own elements.
        self.next_id += 1;
        let id = PhysicsBodyId(10_000 + self.next_id);
        self.bodies.insert(id, *transform);
        id
    }

    fn sync_body(&mut self, body: PhysicsBodyId, transform: &Transform) {
        self.syncs += 1;
        self.bodies.insert(body, *transform);
    }
}
