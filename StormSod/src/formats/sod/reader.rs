//! SOD file reading and parsing
//!
//! Based on the Storm3D Object Definition format notes for version 1.8 and
//! the community extensions for the Armada II revisions up to 1.93.

use super::document::{AnimationChannel, Material, Node, SodDocument, TextureReference};
use super::options::DecodeOptions;
use super::primitives::SodReader;
use super::version;
use super::{DATABASE_SIGNATURE, MATERIAL_WARNING_THRESHOLD, SIGNATURE, SIGNATURE_LEN};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a SOD file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid SOD file.
pub fn read_sod<P: AsRef<Path>>(path: P) -> Result<SodDocument> {
    let data = fs::read(path)?;
    parse_sod_bytes(&data)
}

/// Read a SOD file from disk with explicit options
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid SOD file.
pub fn read_sod_with_options<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<SodDocument> {
    let data = fs::read(path)?;
    parse_sod_bytes_with_options(&data, options)
}

/// Parse SOD data from bytes, expecting the signature at offset 0
///
/// # Errors
/// Returns an error if the data is not a complete, supported SOD stream.
pub fn parse_sod_bytes(data: &[u8]) -> Result<SodDocument> {
    parse_sod_bytes_with_options(data, &DecodeOptions::default())
}

/// Parse SOD data from bytes
///
/// # Errors
///
/// Returns [`Error::SignatureNotFound`] or [`Error::WrongFileKind`] if the
/// signature is missing, [`Error::UnsupportedVersion`] for versions at or
/// below 1.6001, and a stream error for truncated or corrupt data.
pub fn parse_sod_bytes_with_options(data: &[u8], options: &DecodeOptions) -> Result<SodDocument> {
    let signature_offset = locate_signature(data, options)?;
    let mut reader = SodReader::new(data, signature_offset + SIGNATURE_LEN);

    let version = reader.read_f32()?;
    if !version::is_supported(version) {
        return Err(Error::UnsupportedVersion { version });
    }
    if version::is_newer_than_known(version) {
        tracing::warn!("SOD version {} is newer than any known revision, reading as 1.93", version);
    }
    tracing::debug!("SOD format version {}", version);

    let material_count = reader.read_u16()? as usize;
    if material_count > MATERIAL_WARNING_THRESHOLD {
        tracing::warn!(
            "Model has {} lighting materials; meshes with multiple lighting materials may not render properly in legacy tools",
            material_count
        );
    }
    let materials = reader.read_array(material_count, |r| Material::read(r, version))?;

    let node_count = reader.read_u16()? as usize;
    let nodes = reader.read_array(node_count, |r| Node::read(r, version))?;

    let channel_count = reader.read_u16()? as usize;
    let channels = reader.read_array(channel_count, AnimationChannel::read)?;

    let reference_count = reader.read_u16()? as usize;
    let texture_references = reader.read_array(reference_count, TextureReference::read)?;

    tracing::debug!(
        "Read {} materials, {} nodes, {} channels, {} texture references",
        materials.len(),
        nodes.len(),
        channels.len(),
        texture_references.len()
    );
    if reader.remaining() > 0 {
        tracing::debug!("Ignoring {} trailing bytes", reader.remaining());
    }

    Ok(SodDocument {
        version,
        materials,
        nodes,
        channels,
        texture_references,
    })
}

/// Find the offset of the `Storm3D_SW` signature.
fn locate_signature(data: &[u8], options: &DecodeOptions) -> Result<usize> {
    let max_offsets = options.signature_search.max_offsets();

    for (offset, window) in data.windows(SIGNATURE_LEN).enumerate().take(max_offsets) {
        if window == SIGNATURE {
            if offset > 0 {
                tracing::debug!("Found Storm3D_SW signature at offset {}", offset);
            }
            return Ok(offset);
        }
        if window == DATABASE_SIGNATURE {
            return Err(Error::WrongFileKind { offset });
        }
    }

    Err(Error::SignatureNotFound)
}
