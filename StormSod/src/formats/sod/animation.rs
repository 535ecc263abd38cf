//! Transform animation channels and texture animation references

use super::document::{AnimationChannel, AnimationType, Keyframes, TextureReference};
use super::primitives::{SodReader, SodWriter};
use crate::error::{Error, Result};

/// Fixed leading tag of a texture animation reference.
pub const TEXTURE_REFERENCE_TAG: u8 = 4;

impl AnimationChannel {
    pub(crate) fn read(reader: &mut SodReader<'_>) -> Result<Self> {
        let node = reader.read_string()?;
        let keyframe_count = reader.read_u16()? as usize;
        let period = reader.read_f32()?;
        let type_tag = reader.read_u16()?;

        let Some(animation_type) = AnimationType::from_u16(type_tag) else {
            return Err(Error::UnknownAnimationType { node, tag: type_tag });
        };

        let keyframes = match animation_type {
            AnimationType::Position => {
                Keyframes::Position(reader.read_array(keyframe_count, SodReader::read_matrix34)?)
            }
            AnimationType::Scale => {
                Keyframes::Scale(reader.read_array(keyframe_count, SodReader::read_f32)?)
            }
        };

        Ok(Self {
            node,
            period,
            animation_type,
            keyframes,
        })
    }

    /// Check that the keyframes match the type tag.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.keyframes.animation_type() != self.animation_type {
            return Err(Error::KeyframeTypeMismatch {
                node: self.node.clone(),
                animation_type: self.animation_type.name(),
                keyframes: self.keyframes.animation_type().name(),
            });
        }
        Ok(())
    }

    /// Write a channel. Callers run [`Self::validate`] first.
    pub(crate) fn write(&self, writer: &mut SodWriter) -> Result<()> {
        writer.write_string(&self.node)?;
        writer.write_count(self.keyframes.len(), "keyframes")?;
        writer.write_f32(self.period)?;
        writer.write_u16(self.animation_type.as_u16())?;

        match &self.keyframes {
            Keyframes::Position(frames) => {
                for frame in frames {
                    writer.write_matrix34(frame)?;
                }
            }
            Keyframes::Scale(frames) => {
                for frame in frames {
                    writer.write_f32(*frame)?;
                }
            }
        }
        Ok(())
    }
}

impl TextureReference {
    pub(crate) fn read(reader: &mut SodReader<'_>) -> Result<Self> {
        let tag = reader.read_u8()?;
        if tag != TEXTURE_REFERENCE_TAG {
            return Err(Error::InvalidAnimationReferenceTag { tag });
        }

        Ok(Self {
            node: reader.read_string()?,
            animation: reader.read_string()?,
            playback_offset: reader.read_f32()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SodWriter) -> Result<()> {
        writer.write_u8(TEXTURE_REFERENCE_TAG)?;
        writer.write_string(&self.node)?;
        writer.write_string(&self.animation)?;
        writer.write_f32(self.playback_offset)
    }
}
