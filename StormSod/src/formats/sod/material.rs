//! Lighting material records

use super::document::{LightingModel, Material};
use super::primitives::{SodReader, SodWriter};
use super::version::{self, GatedField};
use crate::error::Result;

impl Material {
    pub(crate) fn read(reader: &mut SodReader<'_>, version: f32) -> Result<Self> {
        let name = reader.read_nullable_string()?;
        let ambient = reader.read_color()?;
        let diffuse = reader.read_color()?;
        let specular = reader.read_color()?;
        let shininess = reader.read_f32()?;

        let model_tag = reader.read_u8()?;
        let lighting_model = LightingModel::from_u8(model_tag).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown lighting model {} for material {:?}, using CONSTANT",
                model_tag,
                name
            );
            LightingModel::Constant
        });

        let self_illumination = if version::is_present(version, GatedField::SelfIllumination) {
            reader.read_u8()? != 0
        } else {
            false
        };

        Ok(Self {
            name,
            ambient,
            diffuse,
            specular,
            shininess,
            lighting_model,
            self_illumination,
        })
    }

    pub(crate) fn write(&self, writer: &mut SodWriter, version: f32) -> Result<()> {
        writer.write_nullable_string(self.name.as_deref())?;
        writer.write_color(self.ambient)?;
        writer.write_color(self.diffuse)?;
        writer.write_color(self.specular)?;
        writer.write_f32(self.shininess)?;
        writer.write_u8(self.lighting_model.as_u8())?;

        if version::is_present(version, GatedField::SelfIllumination) {
            writer.write_u8(u8::from(self.self_illumination))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::sod::document::Color;

    fn material_bytes(model: u8, flag: Option<u8>) -> Vec<u8> {
        let mut bytes = vec![4, 0, b'h', b'u', b'l', b'l'];
        for value in [0.1f32, 0.2, 0.3, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 20.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.push(model);
        bytes.extend(flag);
        bytes
    }

    #[test]
    fn test_read_with_self_illumination() {
        let bytes = material_bytes(2, Some(7));
        let mut reader = SodReader::new(&bytes, 0);
        let material = Material::read(&mut reader, 1.93).unwrap();

        assert_eq!(material.name.as_deref(), Some("hull"));
        assert_eq!(material.ambient, Color { r: 0.1, g: 0.2, b: 0.3 });
        assert_eq!(material.shininess, 20.0);
        assert_eq!(material.lighting_model, LightingModel::Phong);
        assert!(material.self_illumination);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_without_flag_byte() {
        let bytes = material_bytes(1, None);
        let mut reader = SodReader::new(&bytes, 0);
        let material = Material::read(&mut reader, 1.8).unwrap();

        assert_eq!(material.lighting_model, LightingModel::Lambert);
        assert!(!material.self_illumination);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_unknown_lighting_model_falls_back() {
        let bytes = material_bytes(9, Some(0));
        let mut reader = SodReader::new(&bytes, 0);
        let material = Material::read(&mut reader, 1.93).unwrap();
        assert_eq!(material.lighting_model, LightingModel::Constant);
    }

    #[test]
    fn test_write_matches_read() {
        for (version, flag) in [(1.93, Some(1)), (1.8, None)] {
            let bytes = material_bytes(2, flag);
            let mut reader = SodReader::new(&bytes, 0);
            let material = Material::read(&mut reader, version).unwrap();

            let mut writer = SodWriter::new();
            material.write(&mut writer, version).unwrap();
            assert_eq!(writer.into_bytes(), bytes);
        }
    }
}
