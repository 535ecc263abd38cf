//! File format handlers for Storm3D formats

pub mod sod;

// Re-export main document types
pub use sod::{
    Material, MeshPayload, Node, NodePayload, NodeType, SodDocument, parse_sod_bytes, read_sod,
    serialize_sod, write_sod,
};
