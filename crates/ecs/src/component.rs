use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vrscene_common::{EntityId, NodeHandle, PhysicsBodyId};

/// Typed access to one variant of [`Component`].
///
/// Implemented for every component record so the world can hand out
/// `&T` / `&mut T` without callers matching on the enum.
pub trait ComponentData: Into<Component> + Sized {
    const KIND: ComponentKind;

    fn from_component(component: &Component) -> Option<&Self>;

    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! declare_components {
    ($($kind:ident),* $(,)?) => {
        /// Discriminant of every registrable component type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ComponentKind {
            $($kind),*
        }

        impl ComponentKind {
            /// Every component kind, in registration order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(ComponentKind::$kind => stringify!($kind)),*
                }
            }
        }

        /// A component instance attached to an entity.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum Component {
            $($kind($kind)),*
        }

        impl Component {
            pub fn kind(&self) -> ComponentKind {
                match self {
                    $(Component::$kind(_) => ComponentKind::$kind),*
                }
            }
        }

        $(
            impl From<$kind> for Component {
                fn from(value: $kind) -> Self {
                    Component::$kind(value)
                }
            }

            impl ComponentData for $kind {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$kind(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$kind(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

declare_components!(
    ExternalNodeBinding,
    Animation,
    GltfLoader,
    GltfModel,
    Image,
    Interactor,
    Loading,
    LoadingCube,
    MediaLoader,
    Held,
    Holdable,
    Hoverable,
    Hovered,
    InteractionState,
    ConstrainOnHeld,
    PhysicsConstraint,
    PhysicsBody,
    PhysicsShape,
    Rotating,
    SpawnPoint,
);

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to a node the host owns. Dropping the component never destroys
/// the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalNodeBinding {
    pub node: NodeHandle,
}

/// A source of interaction (cursor or hand controller).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactor {
    pub id: String,
}

impl Interactor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Link to a body in the host physics engine.
///
/// `uuid == None` means the body has not been created yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub uuid: Option<PhysicsBodyId>,
    pub needs_update: bool,
}

impl PhysicsBody {
    /// A body that already exists in the physics engine and is in sync.
    pub fn existing(uuid: PhysicsBodyId) -> Self {
        Self {
            uuid: Some(uuid),
            needs_update: false,
        }
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            uuid: None,
            needs_update: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Box,
    Sphere,
    Cylinder,
    Capsule,
    Hull,
}

/// How the physics engine sizes a shape: from the mesh bounds or from the
/// explicit extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMode {
    #[default]
    All,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsShape {
    pub shape: ShapeKind,
    pub fit: FitMode,
    pub half_extents: Vec3,
}

impl PhysicsShape {
    pub fn manual_box(half_extents: Vec3) -> Self {
        Self {
            shape: ShapeKind::Box,
            fit: FitMode::Manual,
            half_extents,
        }
    }
}

impl Default for PhysicsShape {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Box,
            fit: FitMode::All,
            half_extents: Vec3::splat(0.5),
        }
    }
}

/// Constraint between a held body and the interactor holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsConstraint {
    pub target: EntityId,
}

/// Scene-wide hover/hold bookkeeping, keyed by interactor id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub hovered: BTreeMap<String, EntityId>,
    pub held: BTreeMap<String, EntityId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hoverable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holdable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hovered {
    pub interactor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Held {
    pub interactor: String,
}

/// Marks an entity that should be physically constrained to whoever holds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstrainOnHeld;

/// Spin about +Y, in radians per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotating {
    pub speed: f32,
}

impl Default for Rotating {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint;

// Media and animation components. Their systems are not part of the frame
// schedule; the kinds stay registered so scenes can carry the data.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub clip: Option<String>,
    pub time_scale: f32,
    pub looping: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            clip: None,
            time_scale: 1.0,
            looping: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GltfLoader {
    pub src: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GltfModel {
    pub src: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLoader {
    pub src: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingCube;
