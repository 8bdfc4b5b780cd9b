use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A fixed entity shape tied to one kind of host scene-graph primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArchetypeKind {
    Scene,
    Bone,
    Group,
    Object3D,
    SkinnedMesh,
    Mesh,
    LineSegments,
    Line,
    LineLoop,
    Points,
    PerspectiveCamera,
    OrthographicCamera,
    AmbientLight,
    DirectionalLight,
    HemisphereLight,
    PointLight,
    SpotLight,
}

impl ArchetypeKind {
    /// Every archetype, in registration order.
    pub const ALL: [ArchetypeKind; 17] = [
        Self::Scene,
        Self::Bone,
        Self::Group,
        Self::Object3D,
        Self::SkinnedMesh,
        Self::Mesh,
        Self::LineSegments,
        Self::Line,
        Self::LineLoop,
        Self::Points,
        Self::PerspectiveCamera,
        Self::OrthographicCamera,
        Self::AmbientLight,
        Self::DirectionalLight,
        Self::HemisphereLight,
        Self::PointLight,
        Self::SpotLight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Bone => "bone",
            Self::Group => "group",
            Self::Object3D => "object3d",
            Self::SkinnedMesh => "skinned-mesh",
            Self::Mesh => "mesh",
            Self::LineSegments => "line-segments",
            Self::Line => "line",
            Self::LineLoop => "line-loop",
            Self::Points => "points",
            Self::PerspectiveCamera => "perspective-camera",
            Self::OrthographicCamera => "orthographic-camera",
            Self::AmbientLight => "ambient-light",
            Self::DirectionalLight => "directional-light",
            Self::HemisphereLight => "hemisphere-light",
            Self::PointLight => "point-light",
            Self::SpotLight => "spot-light",
        }
    }

    pub fn is_camera(self) -> bool {
        matches!(self, Self::PerspectiveCamera | Self::OrthographicCamera)
    }

    pub fn is_light(self) -> bool {
        matches!(
            self,
            Self::AmbientLight
                | Self::DirectionalLight
                | Self::HemisphereLight
                | Self::PointLight
                | Self::SpotLight
        )
    }
}

impl std::fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry handed to the host when it builds a renderable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box { size: Vec3 },
    Sphere { radius: f32 },
}

/// Flat material description for host-built meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Material {
    /// Material that blends with `opacity` below 1.0.
    pub fn translucent(color: u32, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            transparent: opacity < 1.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            opacity: 1.0,
            transparent: false,
        }
    }
}

/// Everything the host needs to build the primitive backing an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub archetype: ArchetypeKind,
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
}

impl Primitive {
    pub fn new(archetype: ArchetypeKind) -> Self {
        Self {
            archetype,
            geometry: None,
            material: None,
        }
    }

    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self {
            archetype: ArchetypeKind::Mesh,
            geometry: Some(geometry),
            material: Some(material),
        }
    }
}
