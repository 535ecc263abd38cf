//! SOD file writing and serialization

use super::SIGNATURE;
use super::document::SodDocument;
use super::primitives::SodWriter;
use super::version;
use crate::error::{Error, Result};
use std::path::Path;

/// Write a SOD document to disk
///
/// # Errors
/// Returns an error if the document is inconsistent or the file cannot be written.
pub fn write_sod<P: AsRef<Path>>(doc: &SodDocument, path: P) -> Result<()> {
    let bytes = serialize_sod(doc)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a SOD document to bytes
///
/// Every count prefix is taken from the collection length. The whole
/// document is validated before encoding starts, so a failed call produces
/// no output.
///
/// # Errors
/// Returns [`Error::UnsupportedVersion`] for versions at or below 1.6001, and
/// a mismatch error when a payload or keyframe variant disagrees with its tag
/// or when the version-gated mesh records disagree with the version.
pub fn serialize_sod(doc: &SodDocument) -> Result<Vec<u8>> {
    validate(doc)?;

    let version = doc.version;
    let mut writer = SodWriter::new();
    writer.write_bytes(SIGNATURE);
    writer.write_f32(version)?;

    writer.write_count(doc.materials.len(), "materials")?;
    for material in &doc.materials {
        material.write(&mut writer, version)?;
    }

    writer.write_count(doc.nodes.len(), "nodes")?;
    for node in &doc.nodes {
        node.write(&mut writer, version)?;
    }

    writer.write_count(doc.channels.len(), "animation channels")?;
    for channel in &doc.channels {
        channel.write(&mut writer)?;
    }

    writer.write_count(doc.texture_references.len(), "texture references")?;
    for reference in &doc.texture_references {
        reference.write(&mut writer)?;
    }

    tracing::debug!("Serialized SOD version {} ({} bytes)", version, writer.len());
    Ok(writer.into_bytes())
}

/// Check caller-supplied invariants before any byte is written.
fn validate(doc: &SodDocument) -> Result<()> {
    if !version::is_supported(doc.version) {
        return Err(Error::UnsupportedVersion {
            version: doc.version,
        });
    }
    for node in &doc.nodes {
        node.validate(doc.version)?;
    }
    for channel in &doc.channels {
        channel.validate()?;
    }
    Ok(())
}
