//! SOD (Storm3D Object Definition) model format
//!
//! Binary model container used by Star Trek: Armada I and II. A file holds
//! lighting materials, a node hierarchy (meshes, hardpoints, sprites, LOD
//! switches, emitters), transform animation channels and texture animation
//! references. Versions above 1.6001 up to 1.93 are supported and round-trip
//! byte for byte.

mod animation;
mod document;
mod material;
mod mesh;
mod node;
mod options;
mod primitives;
mod reader;
mod version;
mod writer;

// Public API
pub use animation::TEXTURE_REFERENCE_TAG;
pub use document::{
    AnimationChannel, AnimationType, Borgification, Color, CullType, Face, FaceVertex, Keyframes,
    LightingModel, Material, Matrix34, MeshPayload, Node, NodePayload, NodeType, SodDocument,
    TextureReference, VertexLightingGroup,
};
pub use mesh::{BORG_BUMP_MAP_MODE, BORG_TEXTURE_SUFFIX, DEFAULT_TEXTURE_MATERIAL, END_OF_NODE};
pub use options::{DEFAULT_SCAN_LIMIT, DecodeOptions, SignatureSearch};
pub use primitives::NULL_STRING;
pub use reader::{parse_sod_bytes, parse_sod_bytes_with_options, read_sod, read_sod_with_options};
pub use version::{
    DEFAULT_VERSION, GatedField, MAX_VERSION, MIN_VERSION_EXCLUSIVE, is_present, is_supported,
};
pub use writer::{serialize_sod, write_sod};

/// SOD file signature.
pub const SIGNATURE: &[u8; SIGNATURE_LEN] = b"Storm3D_SW";

/// Signature of the unrelated `StarTrekDB` database container.
pub const DATABASE_SIGNATURE: &[u8; SIGNATURE_LEN] = b"StarTrekDB";

/// Length of both signatures.
pub const SIGNATURE_LEN: usize = 10;

/// Legacy tools render meshes with multiple lighting materials poorly above this.
pub const MATERIAL_WARNING_THRESHOLD: usize = 24;

/// Decode a SOD byte stream (signature expected at offset 0).
///
/// # Errors
/// See [`parse_sod_bytes_with_options`].
pub fn decode(data: &[u8]) -> crate::Result<SodDocument> {
    parse_sod_bytes(data)
}

/// Decode a SOD byte stream with explicit options.
///
/// # Errors
/// See [`parse_sod_bytes_with_options`].
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> crate::Result<SodDocument> {
    parse_sod_bytes_with_options(data, options)
}

/// Encode a document to SOD bytes.
///
/// # Errors
/// See [`serialize_sod`].
pub fn encode(doc: &SodDocument) -> crate::Result<Vec<u8>> {
    serialize_sod(doc)
}
