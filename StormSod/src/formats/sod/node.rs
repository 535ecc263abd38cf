//! Node header and payload dispatch

use super::document::{MeshPayload, Node, NodePayload, NodeType};
use super::primitives::{SodReader, SodWriter};
use crate::error::{Error, Result};

impl Node {
    pub(crate) fn read(reader: &mut SodReader<'_>, version: f32) -> Result<Self> {
        let type_tag = reader.read_u16()?;
        let id = reader.read_string()?;
        let parent = reader.read_string()?;
        let transform = reader.read_matrix34()?;

        let node_type = NodeType::from_u16(type_tag).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown node type {} for node '{}', using NULL_OR_HARDPOINT",
                type_tag,
                id
            );
            NodeType::NullOrHardpoint
        });

        let payload = match node_type {
            NodeType::NullOrHardpoint | NodeType::LodControl | NodeType::Sprite => {
                NodePayload::None
            }
            NodeType::Emitter => NodePayload::Emitter(reader.read_string()?),
            NodeType::Mesh => NodePayload::Mesh(Box::new(MeshPayload::read(reader, version, &id)?)),
        };

        tracing::trace!("Node '{}' ({}) parent '{}'", id, node_type.name(), parent);

        Ok(Self {
            node_type,
            id,
            parent,
            transform,
            payload,
        })
    }

    /// Check that the payload matches the node type and the version.
    pub(crate) fn validate(&self, version: f32) -> Result<()> {
        if !self.payload.matches(self.node_type) {
            return Err(Error::PayloadTypeMismatch {
                node: self.id.clone(),
                node_type: self.node_type.name(),
                payload: self.payload.name(),
            });
        }
        if let NodePayload::Mesh(mesh) = &self.payload {
            mesh.validate(version, &self.id)?;
        }
        Ok(())
    }

    /// Write a node. Callers run [`Self::validate`] first.
    pub(crate) fn write(&self, writer: &mut SodWriter, version: f32) -> Result<()> {
        writer.write_u16(self.node_type.as_u16())?;
        writer.write_string(&self.id)?;
        writer.write_string(&self.parent)?;
        writer.write_matrix34(&self.transform)?;

        match &self.payload {
            NodePayload::None => Ok(()),
            NodePayload::Emitter(emitter) => writer.write_string(emitter),
            NodePayload::Mesh(mesh) => mesh.write(writer, version),
        }
    }
}
