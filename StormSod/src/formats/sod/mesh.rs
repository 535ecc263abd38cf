//! Mesh node payload
//!
//! Layout, in order:
//!
//! | Field                         | Type         | Present when          |
//! |-------------------------------|--------------|-----------------------|
//! | texture material              | string       | version > 1.61        |
//! | unused                        | `u32`        | version > 1.9101      |
//! | bump-map mode                 | `u32`        | version > 1.9101      |
//! | texture                       | string       | always                |
//! | unknown                       | `u16`        | version == 1.91       |
//! | borgification                 | sub-record   | version > 1.9101      |
//! | vertex / uv / group counts    | `u16` × 3    | always                |
//! | vertices                      | vec3 × n     | always                |
//! | texture coordinates           | vec2 × n     | always                |
//! | vertex lighting groups        | group × n    | always                |
//! | cull type                     | `u8`         | always                |
//! | end of node                   | `u16` = 0    | always                |
//!
//! The borgification sub-record is two `u16` fillers, the borg bump-map name
//! followed by two more fillers (only when bump-map mode is 2), the borg
//! texture name and one trailing filler.
//!
//! An empty borg texture stands for the primary texture name plus `_B`. An
//! untextured mesh stores the primary texture as `"0"`, so its derived borg
//! texture is `0_B`.

use super::document::{
    Borgification, CullType, Face, FaceVertex, MeshPayload, VertexLightingGroup,
};
use super::primitives::{NULL_STRING, SodReader, SodWriter};
use super::version::{self, GatedField};
use crate::error::{Error, Result};

/// Texture material assumed when the file predates the field.
pub const DEFAULT_TEXTURE_MATERIAL: &str = "default";

/// Bump-map mode that stores a borg bump-map texture.
pub const BORG_BUMP_MAP_MODE: u32 = 2;

/// Suffix of the derived borg texture name.
pub const BORG_TEXTURE_SUFFIX: &str = "_B";

/// Required value of the mesh trailer.
pub const END_OF_NODE: u16 = 0;

impl MeshPayload {
    /// Read a mesh payload. `node` is only used for diagnostics.
    pub(crate) fn read(reader: &mut SodReader<'_>, version: f32, node: &str) -> Result<Self> {
        let texture_material = if version::is_present(version, GatedField::TextureMaterial) {
            reader.read_nullable_string()?
        } else {
            Some(DEFAULT_TEXTURE_MATERIAL.to_string())
        };

        let bump_map = if version::is_present(version, GatedField::BumpMap) {
            let _unused = reader.read_u32()?;
            reader.read_u32()?
        } else {
            0
        };

        let texture = reader.read_nullable_string()?;

        if version::is_present(version, GatedField::TextureFiller) {
            let _unknown = reader.read_u16()?;
        }

        let borgification = if version::is_present(version, GatedField::Borgification) {
            Some(read_borgification(reader, bump_map, texture.as_deref())?)
        } else {
            None
        };

        let vertex_count = reader.read_u16()? as usize;
        let uv_count = reader.read_u16()? as usize;
        let group_count = reader.read_u16()? as usize;

        let vertices = reader.read_array(vertex_count, SodReader::read_vec3)?;
        let texture_coordinates = reader.read_array(uv_count, SodReader::read_vec2)?;
        let vertex_lighting_groups = reader.read_array(group_count, read_lighting_group)?;

        let cull_type = match reader.read_u8()? {
            0 => CullType::NoCull,
            1 => CullType::BackfaceCull,
            other => {
                tracing::warn!("Unknown cull type {} on mesh '{}', using BACKFACE_CULL", other, node);
                CullType::BackfaceCull
            }
        };

        let end_of_node = reader.read_u16()?;
        if end_of_node != END_OF_NODE {
            return Err(Error::InvalidEndOfNode {
                node: node.to_string(),
                value: end_of_node,
            });
        }

        tracing::trace!(
            "Mesh '{}': {} vertices, {} uvs, {} groups",
            node,
            vertices.len(),
            texture_coordinates.len(),
            vertex_lighting_groups.len()
        );

        Ok(Self {
            texture_material,
            bump_map,
            texture,
            borgification,
            vertices,
            texture_coordinates,
            vertex_lighting_groups,
            cull_type,
        })
    }

    /// Check that the version-gated parts agree with `version`.
    pub(crate) fn validate(&self, version: f32, node: &str) -> Result<()> {
        let needs_borg = version::is_present(version, GatedField::Borgification);
        match (&self.borgification, needs_borg) {
            (None, true) => {
                return Err(Error::MissingBorgification {
                    node: node.to_string(),
                    version,
                });
            }
            (Some(_), false) => {
                return Err(Error::UnexpectedBorgification {
                    node: node.to_string(),
                    version,
                });
            }
            (Some(borg), true) => {
                let wants_bump_map = self.bump_map == BORG_BUMP_MAP_MODE;
                if borg.bump_map.is_some() != wants_bump_map {
                    return Err(Error::BorgBumpMapMismatch {
                        node: node.to_string(),
                        mode: self.bump_map,
                    });
                }
            }
            (None, false) => {}
        }
        Ok(())
    }

    /// Write a mesh payload. Callers run [`Self::validate`] first.
    pub(crate) fn write(&self, writer: &mut SodWriter, version: f32) -> Result<()> {
        if version::is_present(version, GatedField::TextureMaterial) {
            writer.write_nullable_string(self.texture_material.as_deref())?;
        }

        if version::is_present(version, GatedField::BumpMap) {
            writer.write_u32(0)?;
            writer.write_u32(self.bump_map)?;
        }

        writer.write_nullable_string(self.texture.as_deref())?;

        if version::is_present(version, GatedField::TextureFiller) {
            writer.write_u16(0)?;
        }

        if let Some(borg) = &self.borgification {
            write_borgification(writer, borg, self.texture.as_deref())?;
        }

        writer.write_count(self.vertices.len(), "vertices")?;
        writer.write_count(self.texture_coordinates.len(), "texture coordinates")?;
        writer.write_count(self.vertex_lighting_groups.len(), "vertex lighting groups")?;

        for vertex in &self.vertices {
            writer.write_vec3(*vertex)?;
        }
        for uv in &self.texture_coordinates {
            writer.write_vec2(*uv)?;
        }
        for group in &self.vertex_lighting_groups {
            write_lighting_group(writer, group)?;
        }

        writer.write_u8(self.cull_type as u8)?;
        writer.write_u16(END_OF_NODE)
    }
}

fn read_borgification(
    reader: &mut SodReader<'_>,
    bump_map: u32,
    texture: Option<&str>,
) -> Result<Borgification> {
    let _unknown = reader.read_u16()?;
    let _unknown = reader.read_u16()?;

    let borg_bump_map = if bump_map == BORG_BUMP_MAP_MODE {
        let name = reader.read_string()?;
        let _unknown = reader.read_u16()?;
        let _unknown = reader.read_u16()?;
        Some(name)
    } else {
        None
    };

    let stored = reader.read_string()?;
    let _unknown = reader.read_u16()?;

    let (borg_texture, texture_derived) = if stored.is_empty() {
        (derived_borg_texture(texture), true)
    } else {
        (stored, false)
    };

    Ok(Borgification {
        bump_map: borg_bump_map,
        texture: borg_texture,
        texture_derived,
    })
}

fn write_borgification(
    writer: &mut SodWriter,
    borg: &Borgification,
    texture: Option<&str>,
) -> Result<()> {
    writer.write_u16(0)?;
    writer.write_u16(0)?;

    if let Some(bump_map) = &borg.bump_map {
        writer.write_string(bump_map)?;
        writer.write_u16(0)?;
        writer.write_u16(0)?;
    }

    // Only collapse to the empty name while it still matches the primary texture
    if borg.texture_derived && borg.texture == derived_borg_texture(texture) {
        writer.write_string("")?;
    } else {
        writer.write_string(&borg.texture)?;
    }
    writer.write_u16(0)
}

/// Borg texture implied by an empty stored name.
fn derived_borg_texture(texture: Option<&str>) -> String {
    format!("{}{}", texture.unwrap_or(NULL_STRING), BORG_TEXTURE_SUFFIX)
}

fn read_lighting_group(reader: &mut SodReader<'_>) -> Result<VertexLightingGroup> {
    let face_count = reader.read_u16()? as usize;
    let lighting_material = reader.read_nullable_string()?;
    let faces = reader.read_array(face_count, read_face)?;
    Ok(VertexLightingGroup {
        lighting_material,
        faces,
    })
}

fn write_lighting_group(writer: &mut SodWriter, group: &VertexLightingGroup) -> Result<()> {
    writer.write_count(group.faces.len(), "faces")?;
    writer.write_nullable_string(group.lighting_material.as_deref())?;
    for face in &group.faces {
        for corner in face {
            writer.write_u16(corner.vertex)?;
            writer.write_u16(corner.texture_coordinate)?;
        }
    }
    Ok(())
}

fn read_face(reader: &mut SodReader<'_>) -> Result<Face> {
    let mut face = [FaceVertex::default(); 3];
    for corner in &mut face {
        corner.vertex = reader.read_u16()?;
        corner.texture_coordinate = reader.read_u16()?;
    }
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    fn string(bytes: &mut Vec<u8>, value: &str) {
        bytes.extend_from_slice(&(value.len() as u16).to_le_bytes());
        bytes.extend_from_slice(value.as_bytes());
    }

    fn u16le(bytes: &mut Vec<u8>, value: u16) {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Single-triangle mesh laid out for `version`.
    #[allow(clippy::float_cmp)]
    fn triangle_mesh(version: f32, bump_map: u32, borg_texture: &str, trailer: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        if version > 1.61 {
            string(&mut bytes, "alphathreshold");
        }
        if version > 1.9101 {
            bytes.extend_from_slice(&0u32.to_le_bytes());
            bytes.extend_from_slice(&bump_map.to_le_bytes());
        }
        string(&mut bytes, "fbattle");
        if version == 1.91 {
            u16le(&mut bytes, 0);
        }
        if version > 1.9101 {
            u16le(&mut bytes, 0);
            u16le(&mut bytes, 0);
            if bump_map == 2 {
                string(&mut bytes, "fbattle_bump");
                u16le(&mut bytes, 0);
                u16le(&mut bytes, 0);
            }
            string(&mut bytes, borg_texture);
            u16le(&mut bytes, 0);
        }
        u16le(&mut bytes, 3);
        u16le(&mut bytes, 3);
        u16le(&mut bytes, 1);
        for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        for value in [0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        // One group with the default material and one face
        u16le(&mut bytes, 1);
        string(&mut bytes, "0");
        for index in [0u16, 0, 1, 1, 2, 2] {
            u16le(&mut bytes, index);
        }
        bytes.push(1);
        u16le(&mut bytes, trailer);
        bytes
    }

    fn decode(bytes: &[u8], version: f32) -> Result<MeshPayload> {
        let mut reader = SodReader::new(bytes, 0);
        let mesh = MeshPayload::read(&mut reader, version, "hull")?;
        assert_eq!(reader.remaining(), 0);
        Ok(mesh)
    }

    fn encode(mesh: &MeshPayload, version: f32) -> Vec<u8> {
        let mut writer = SodWriter::new();
        mesh.validate(version, "hull").unwrap();
        mesh.write(&mut writer, version).unwrap();
        writer.into_bytes()
    }

    #[test]
    fn test_read_triangle() {
        let mesh = decode(&triangle_mesh(1.8, 0, "", 0), 1.8).unwrap();
        assert_eq!(mesh.texture_material.as_deref(), Some("alphathreshold"));
        assert_eq!(mesh.texture.as_deref(), Some("fbattle"));
        assert_eq!(mesh.vertices[1], Vec3::X);
        assert_eq!(mesh.texture_coordinates[2], Vec2::Y);
        assert_eq!(mesh.vertex_lighting_groups.len(), 1);
        assert_eq!(mesh.vertex_lighting_groups[0].lighting_material, None);
        assert_eq!(
            mesh.vertex_lighting_groups[0].faces[0][2],
            FaceVertex { vertex: 2, texture_coordinate: 2 }
        );
        assert_eq!(mesh.cull_type, CullType::BackfaceCull);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_nonzero_trailer_is_invalid() {
        let err = decode(&triangle_mesh(1.93, 0, "borg", 5), 1.93).unwrap_err();
        assert!(matches!(err, Error::InvalidEndOfNode { value: 5, .. }));
    }

    #[test]
    fn test_filler_at_191_only() {
        let at_191 = triangle_mesh(1.91, 0, "", 0);
        let at_19 = triangle_mesh(1.9, 0, "", 0);
        assert_eq!(at_191.len(), at_19.len() + 2);

        let mesh_191 = decode(&at_191, 1.91).unwrap();
        let mesh_19 = decode(&at_19, 1.9).unwrap();
        assert_eq!(mesh_191, mesh_19);
        assert_eq!(encode(&mesh_191, 1.91), at_191);
    }

    #[test]
    fn test_no_borgification_before_19101() {
        let mesh = decode(&triangle_mesh(1.9101, 0, "", 0), 1.9101).unwrap();
        assert_eq!(mesh.bump_map, 0);
        assert!(mesh.borgification.is_none());
    }

    #[test]
    fn test_borgification_with_bump_map() {
        let bytes = triangle_mesh(1.93, 2, "fbattle_borg", 0);
        let mesh = decode(&bytes, 1.93).unwrap();
        assert_eq!(mesh.bump_map, 2);

        let borg = mesh.borgification.as_ref().unwrap();
        assert_eq!(borg.bump_map.as_deref(), Some("fbattle_bump"));
        assert_eq!(borg.texture, "fbattle_borg");
        assert!(!borg.texture_derived);
        assert_eq!(encode(&mesh, 1.93), bytes);
    }

    #[test]
    fn test_empty_borg_texture_is_derived() {
        let bytes = triangle_mesh(1.92, 1, "", 0);
        let mesh = decode(&bytes, 1.92).unwrap();

        let borg = mesh.borgification.as_ref().unwrap();
        assert_eq!(borg.bump_map, None);
        assert_eq!(borg.texture, "fbattle_B");
        assert!(borg.texture_derived);
        assert_eq!(encode(&mesh, 1.92), bytes);
    }

    #[test]
    fn test_edited_borg_texture_is_written() {
        let bytes = triangle_mesh(1.93, 0, "", 0);
        let mut mesh = decode(&bytes, 1.93).unwrap();
        let borg = mesh.borgification.as_mut().unwrap();
        assert!(borg.texture_derived);
        borg.texture = "fbattle_assimilated".to_string();

        let reencoded = encode(&mesh, 1.93);
        assert_ne!(reencoded, bytes);
        let back = decode(&reencoded, 1.93).unwrap();
        let borg = back.borgification.unwrap();
        assert_eq!(borg.texture, "fbattle_assimilated");
        assert!(!borg.texture_derived);
    }

    #[test]
    fn test_retextured_mesh_keeps_old_borg_texture() {
        let mut mesh = decode(&triangle_mesh(1.93, 0, "", 0), 1.93).unwrap();
        mesh.texture = Some("fbattle_refit".to_string());

        let back = decode(&encode(&mesh, 1.93), 1.93).unwrap();
        assert_eq!(back.texture.as_deref(), Some("fbattle_refit"));
        assert_eq!(back.borgification.unwrap().texture, "fbattle_B");
    }

    #[test]
    fn test_untextured_mesh_derives_from_null_name() {
        let mut mesh = MeshPayload {
            borgification: Some(Borgification::default()),
            ..MeshPayload::default()
        };
        let bytes = encode(&mesh, 1.93);
        mesh = decode(&bytes, 1.93).unwrap();

        assert_eq!(mesh.texture, None);
        let borg = mesh.borgification.as_ref().unwrap();
        assert_eq!(borg.texture, "0_B");
        assert!(borg.texture_derived);
        assert_eq!(encode(&mesh, 1.93), bytes);
    }

    #[test]
    fn test_texture_material_default_before_161() {
        let bytes = triangle_mesh(1.61, 0, "", 0);
        let mesh = decode(&bytes, 1.61).unwrap();
        assert_eq!(mesh.texture_material.as_deref(), Some(DEFAULT_TEXTURE_MATERIAL));
        assert_eq!(encode(&mesh, 1.61), bytes);
    }

    #[test]
    fn test_validate_borgification() {
        let mesh = MeshPayload::default();
        assert!(matches!(
            mesh.validate(1.93, "hull"),
            Err(Error::MissingBorgification { .. })
        ));

        let mesh = MeshPayload {
            borgification: Some(Borgification::default()),
            ..MeshPayload::default()
        };
        assert!(matches!(
            mesh.validate(1.8, "hull"),
            Err(Error::UnexpectedBorgification { .. })
        ));

        let mesh = MeshPayload {
            bump_map: 2,
            borgification: Some(Borgification::default()),
            ..MeshPayload::default()
        };
        assert!(matches!(
            mesh.validate(1.93, "hull"),
            Err(Error::BorgBumpMapMismatch { mode: 2, .. })
        ));
    }
}
