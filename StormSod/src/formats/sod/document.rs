//! SOD document structure definitions

use crate::error::Result;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::DEFAULT_VERSION;

/// A decoded Storm3D object definition.
///
/// Counts are not stored; the encoder derives every count prefix from the
/// collection lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SodDocument {
    /// Format version, kept at single precision.
    pub version: f32,
    pub materials: Vec<Material>,
    pub nodes: Vec<Node>,
    pub channels: Vec<AnimationChannel>,
    pub texture_references: Vec<TextureReference>,
}

/// RGB colour as three floats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Lighting model of a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LightingModel {
    #[default]
    Constant = 0,
    Lambert = 1,
    Phong = 2,
}

impl LightingModel {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Constant),
            1 => Some(Self::Lambert),
            2 => Some(Self::Phong),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A lighting material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name; `None` when stored as the null string.
    pub name: Option<String>,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    pub lighting_model: LightingModel,
    /// Alpha-map self illumination. Only stored above version 1.8001.
    pub self_illumination: bool,
}

/// Local transform as four basis vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix34 {
    pub right: Vec3,
    pub up: Vec3,
    pub front: Vec3,
    pub position: Vec3,
}

impl Default for Matrix34 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix34 {
    pub const IDENTITY: Self = Self {
        right: Vec3::X,
        up: Vec3::Y,
        front: Vec3::Z,
        position: Vec3::ZERO,
    };

    /// Matrix with the basis vectors as columns, in the file's own axes.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            self.front.extend(0.0),
            self.position.extend(1.0),
        )
    }
}

/// Node kind, stored as a `u16` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum NodeType {
    /// Hierarchy glue or a named hardpoint.
    #[default]
    NullOrHardpoint = 0,
    Mesh = 1,
    /// Sprite defined by name in the `.spr` files.
    Sprite = 3,
    /// Children of this node are discrete LODs.
    LodControl = 11,
    /// Particle emitter defined in the `.spr` files.
    Emitter = 12,
}

impl NodeType {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::NullOrHardpoint),
            1 => Some(Self::Mesh),
            3 => Some(Self::Sprite),
            11 => Some(Self::LodControl),
            12 => Some(Self::Emitter),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NullOrHardpoint => "NULL_OR_HARDPOINT",
            Self::Mesh => "MESH",
            Self::Sprite => "SPRITE",
            Self::LodControl => "LOD_CONTROL",
            Self::Emitter => "EMITTER",
        }
    }
}

/// Type-dependent node data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum NodePayload {
    /// Null, hardpoint, sprite and LOD control nodes carry nothing.
    #[default]
    None,
    /// Emitter id as defined by an `@emitter` entry in the `.spr` files.
    Emitter(String),
    Mesh(Box<MeshPayload>),
}

impl NodePayload {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "empty",
            Self::Emitter(_) => "emitter",
            Self::Mesh(_) => "mesh",
        }
    }

    /// Whether this payload is the one `node_type` carries.
    pub fn matches(&self, node_type: NodeType) -> bool {
        match self {
            Self::None => !matches!(node_type, NodeType::Mesh | NodeType::Emitter),
            Self::Emitter(_) => node_type == NodeType::Emitter,
            Self::Mesh(_) => node_type == NodeType::Mesh,
        }
    }
}

/// One element of the model hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_type: NodeType,
    pub id: String,
    /// Parent id; empty for the root.
    pub parent: String,
    pub transform: Matrix34,
    pub payload: NodePayload,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn mesh(&self) -> Option<&MeshPayload> {
        match &self.payload {
            NodePayload::Mesh(mesh) => Some(&**mesh),
            _ => None,
        }
    }

    pub fn emitter(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::Emitter(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Face culling mode of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CullType {
    NoCull = 0,
    #[default]
    BackfaceCull = 1,
}

/// Vertex and texture-coordinate indices of one face corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceVertex {
    pub vertex: u16,
    pub texture_coordinate: u16,
}

/// A triangle.
pub type Face = [FaceVertex; 3];

/// Faces sharing one lighting material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexLightingGroup {
    /// Lighting material name; `None` selects the default material.
    pub lighting_material: Option<String>,
    pub faces: Vec<Face>,
}

/// Alternate "assimilated" texturing, stored above version 1.9101.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borgification {
    /// Borg bump-map texture, stored only when the bump-map mode is 2.
    pub bump_map: Option<String>,
    /// Borg texture name.
    pub texture: String,
    /// The file stored an empty name and `texture` was derived as
    /// `<texture>_B` (`0_B` for an untextured mesh). The encoder writes the
    /// empty name back as long as `texture` still equals that derived name.
    #[serde(default)]
    pub texture_derived: bool,
}

/// Geometry and texturing of a mesh node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPayload {
    /// Texture material (blending mode such as `alphathreshold`). Files before
    /// version 1.61 do not store it and decode as `"default"`.
    pub texture_material: Option<String>,
    /// Bump-map mode, stored above version 1.9101; 0 otherwise.
    pub bump_map: u32,
    /// Texture name; `None` for untextured meshes.
    pub texture: Option<String>,
    pub borgification: Option<Borgification>,
    pub vertices: Vec<Vec3>,
    pub texture_coordinates: Vec<Vec2>,
    pub vertex_lighting_groups: Vec<VertexLightingGroup>,
    pub cull_type: CullType,
}

impl MeshPayload {
    pub fn face_count(&self) -> usize {
        self.vertex_lighting_groups.iter().map(|g| g.faces.len()).sum()
    }
}

/// Kind of a transform animation channel, stored as a `u16` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum AnimationType {
    Position = 0,
    Scale = 5,
}

impl AnimationType {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Position),
            5 => Some(Self::Scale),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "POSITION",
            Self::Scale => "SCALE",
        }
    }
}

/// Keyframe data, evenly spaced over the channel period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Keyframes {
    Position(Vec<Matrix34>),
    Scale(Vec<f32>),
}

impl Keyframes {
    pub fn len(&self) -> usize {
        match self {
            Self::Position(frames) => frames.len(),
            Self::Scale(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn animation_type(&self) -> AnimationType {
        match self {
            Self::Position(_) => AnimationType::Position,
            Self::Scale(_) => AnimationType::Scale,
        }
    }
}

/// A transform keyframe channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationChannel {
    /// Node this channel animates.
    pub node: String,
    /// Length in seconds of one loop.
    pub period: f32,
    pub animation_type: AnimationType,
    pub keyframes: Keyframes,
}

/// Links a flipbook animation from the `.spr` files to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureReference {
    pub node: String,
    pub animation: String,
    /// Playback offset in seconds.
    pub playback_offset: f32,
}

impl Default for SodDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SodDocument {
    /// Create an empty document at [`DEFAULT_VERSION`].
    pub fn new() -> Self {
        Self::with_version(DEFAULT_VERSION)
    }

    pub fn with_version(version: f32) -> Self {
        Self {
            version,
            materials: Vec::new(),
            nodes: Vec::new(),
            channels: Vec::new(),
            texture_references: Vec::new(),
        }
    }

    /// The first node without a parent.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.parent == id)
    }

    /// Mesh nodes with their payloads.
    pub fn meshes(&self) -> impl Iterator<Item = (&Node, &MeshPayload)> {
        self.nodes.iter().filter_map(|n| n.mesh().map(|m| (n, m)))
    }

    pub fn hardpoints(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == NodeType::NullOrHardpoint)
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
    }

    pub fn channels_for<'a>(
        &'a self,
        node: &'a str,
    ) -> impl Iterator<Item = &'a AnimationChannel> + 'a {
        self.channels.iter().filter(move |c| c.node == node)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// JSON has no NaN or infinity. Non-finite floats are written as `null`,
    /// which [`Self::from_json`] rejects; use the binary encoding to keep them.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: &str, node_type: NodeType) -> Node {
        Node {
            node_type,
            id: id.to_string(),
            parent: parent.to_string(),
            transform: Matrix34::IDENTITY,
            payload: NodePayload::None,
        }
    }

    #[test]
    fn test_tag_mapping() {
        for tag in [0u16, 1, 3, 11, 12] {
            assert_eq!(NodeType::from_u16(tag).map(NodeType::as_u16), Some(tag));
        }
        assert_eq!(NodeType::from_u16(2), None);
        assert_eq!(AnimationType::from_u16(5), Some(AnimationType::Scale));
        assert_eq!(AnimationType::from_u16(4), None);
        assert_eq!(LightingModel::from_u8(2), Some(LightingModel::Phong));
        assert_eq!(LightingModel::from_u8(3), None);
    }

    #[test]
    fn test_payload_matches() {
        assert!(NodePayload::None.matches(NodeType::Sprite));
        assert!(NodePayload::None.matches(NodeType::LodControl));
        assert!(!NodePayload::None.matches(NodeType::Mesh));
        assert!(NodePayload::Emitter("smoke".into()).matches(NodeType::Emitter));
        assert!(!NodePayload::Mesh(Box::default()).matches(NodeType::Emitter));
    }

    #[test]
    fn test_hierarchy_queries() {
        let mut doc = SodDocument::new();
        doc.nodes.push(node("root", "", NodeType::NullOrHardpoint));
        doc.nodes.push(node("lod0", "root", NodeType::LodControl));
        doc.nodes.push(node("hp_weapon", "root", NodeType::NullOrHardpoint));
        doc.nodes.push(node("light", "lod0", NodeType::Sprite));

        assert_eq!(doc.root().map(|n| n.id.as_str()), Some("root"));
        let children: Vec<_> = doc.children("root").map(|n| n.id.as_str()).collect();
        assert_eq!(children, ["lod0", "hp_weapon"]);
        assert_eq!(doc.hardpoints().count(), 2);
        assert!(doc.node("light").is_some());
        assert_eq!(doc.meshes().count(), 0);
    }

    #[test]
    fn test_to_mat4_columns() {
        let transform = Matrix34 {
            position: Vec3::new(4.0, 5.0, 6.0),
            ..Matrix34::IDENTITY
        };
        let mat = transform.to_mat4();
        assert_eq!(mat.w_axis, glam::Vec4::new(4.0, 5.0, 6.0, 1.0));
        assert_eq!(mat.transform_point3(Vec3::ZERO), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_json_roundtrip_keeps_f32() {
        let mut doc = SodDocument::with_version(1.91);
        doc.channels.push(AnimationChannel {
            node: "turret".to_string(),
            period: 0.1,
            animation_type: AnimationType::Scale,
            keyframes: Keyframes::Scale(vec![0.3, 1.7, 2.2]),
        });

        let json = doc.to_json().unwrap();
        let back = SodDocument::from_json(&json).unwrap();
        assert_eq!(back.version.to_bits(), 1.91f32.to_bits());
        assert_eq!(back, doc);
    }
}
