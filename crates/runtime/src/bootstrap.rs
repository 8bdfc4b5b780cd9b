use vrscene_common::{EntityId, NodeHandle, PhysicsBodyId};
use vrscene_ecs::{
    ArchetypeKind, ComponentKind, ExternalNodeBinding, InteractionState, Interactor, PhysicsBody,
    Primitive,
};
use vrscene_kernel::{ConfigurationError, World, WorldBuilder, WorldError};

use crate::config::{InteractionSource, SceneConfig};
use crate::host::{Host, Lookup, NodeResolver, SystemSource};

/// Why a bootstrap attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// The host knows the resource but has not finished creating it.
    #[error("external resource `{id}` is not available yet")]
    ResourcePending { id: String },
    /// The identifier does not name anything the host has.
    #[error("external resource `{id}` does not exist")]
    MissingExternalResource { id: String },
    #[error(transparent)]
    World(#[from] WorldError),
}

impl From<ConfigurationError> for BootstrapError {
    fn from(err: ConfigurationError) -> Self {
        Self::World(err.into())
    }
}

impl BootstrapError {
    /// Whether a later attempt can succeed without anything changing in the
    /// runtime's configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResourcePending { .. })
    }
}

/// A bootstrapped interaction source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractorHandle {
    pub id: String,
    pub entity: EntityId,
    pub node: NodeHandle,
    pub body: PhysicsBodyId,
}

/// The permanent entities created by the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    pub root: EntityId,
    /// Host node built for the scene root.
    pub root_node: NodeHandle,
    pub interactors: Vec<InteractorHandle>,
}

impl SceneHandles {
    pub fn interactor(&self, id: &str) -> Option<&InteractorHandle> {
        self.interactors.iter().find(|i| i.id == id)
    }
}

/// A bootstrapped world together with its permanent entities.
#[derive(Debug)]
pub struct Scene {
    pub world: World,
    pub handles: SceneHandles,
}

/// Host resources for one interaction source, resolved ahead of any mutation.
struct ResolvedSource<'c> {
    source: &'c InteractionSource,
    node: NodeHandle,
    body: PhysicsBodyId,
}

/// One-shot construction of the scene's permanent entities.
///
/// Every host lookup happens before the world or the scene graph is touched,
/// so a failing attempt leaves nothing behind and can simply be repeated.
/// After that the order is fixed: archetypes, components, systems, the scene
/// root, then the interaction sources in configuration order.
pub struct SceneBootstrap<'c> {
    config: &'c SceneConfig,
}

impl<'c> SceneBootstrap<'c> {
    pub fn new(config: &'c SceneConfig) -> Self {
        Self { config }
    }

    pub fn run<H: Host + ?Sized>(
        &self,
        host: &mut H,
        systems: &mut dyn SystemSource,
    ) -> Result<Scene, BootstrapError> {
        let _span = tracing::info_span!("scene_bootstrap").entered();

        let resolved = self.resolve(&*host)?;

        let mut world = WorldBuilder::new()
            .archetypes(ArchetypeKind::ALL)
            .components(ComponentKind::ALL.iter().copied())
            .systems(systems.build_systems())
            .build()?;

        let root = world
            .create_entity(Some(ArchetypeKind::Scene))?
            .with(InteractionState::default())?
            .id();

        let mut interactors = Vec::with_capacity(resolved.len());
        for r in &resolved {
            let entity = world
                .create_entity(None)?
                .with(ExternalNodeBinding { node: r.node })?
                .with(Interactor::new(r.source.interactor_id.as_str()))?
                .with(PhysicsBody::existing(r.body))?
                .id();
            tracing::debug!(interactor = %r.source.interactor_id, %entity, "interactor bound");
            interactors.push(InteractorHandle {
                id: r.source.interactor_id.clone(),
                entity,
                node: r.node,
                body: r.body,
            });
        }

        // The world is complete; only now touch the host scene graph.
        let host_root = host.root();
        let root_node = host.create_node(&Primitive::new(ArchetypeKind::Scene));
        host.attach_child(host_root, root_node);
        world.set_primitive(root, root_node)?;

        tracing::info!(
            entities = world.entity_count(),
            systems = ?world.system_names(),
            "scene bootstrapped"
        );
        Ok(Scene {
            world,
            handles: SceneHandles {
                root,
                root_node,
                interactors,
            },
        })
    }

    fn resolve<R: NodeResolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<Vec<ResolvedSource<'c>>, BootstrapError> {
        let config = self.config;
        let mut resolved = Vec::with_capacity(config.sources.len());
        for source in &config.sources {
            let id = &source.element_id;
            let node = match resolver.resolve_node(id) {
                Lookup::Found(node) => node,
                Lookup::Pending => return Err(BootstrapError::ResourcePending { id: id.clone() }),
                Lookup::Missing => {
                    return Err(BootstrapError::MissingExternalResource { id: id.clone() });
                }
            };
            let body = match resolver.physics_body(node) {
                Lookup::Found(body) => body,
                Lookup::Pending => {
                    return Err(BootstrapError::ResourcePending {
                        id: format!("{id}#body"),
                    });
                }
                Lookup::Missing => {
                    return Err(BootstrapError::MissingExternalResource {
                        id: format!("{id}#body"),
                    });
                }
            };
            resolved.push(ResolvedSource { source, node, body });
        }
        Ok(resolved)
    }
}
