//! Little-endian primitive reading and writing for SOD streams
//!
//! Strings are a `u16` byte count followed by ASCII bytes. The one-byte string
//! `"0"` stands for "no string"; it is converted to and from `None` here and
//! nowhere else.

use super::document::{Color, Matrix34};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Vec2, Vec3};
use std::io::{self, Cursor, Read};

/// Encoded form of an absent string.
pub const NULL_STRING: &str = "0";

/// Bounds-checked reader over an in-memory SOD buffer.
pub(crate) struct SodReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> SodReader<'a> {
    /// Create a reader positioned at `offset`.
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        let mut cursor = Cursor::new(data);
        cursor.set_position(offset as u64);
        Self { cursor }
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    /// Map a failed read to a positioned error.
    fn eof(&self, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEndOfData {
                offset: self.cursor.position(),
            }
        } else {
            Error::Io(err)
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|e| self.eof(e))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.cursor.read_u16::<LittleEndian>().map_err(|e| self.eof(e))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.cursor.read_u32::<LittleEndian>().map_err(|e| self.eof(e))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.cursor.read_f32::<LittleEndian>().map_err(|e| self.eof(e))
    }

    /// Read a length-prefixed ASCII string verbatim.
    ///
    /// The `"0"` sentinel is returned as-is; use [`Self::read_nullable_string`]
    /// for fields where it means "absent".
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.cursor.position();
        let length = self.read_u16()? as usize;
        if length > self.remaining() {
            // Report the offset of the prefix so truncated strings are easy to spot
            return Err(Error::UnexpectedEndOfData { offset: start });
        }

        let mut bytes = vec![0u8; length];
        self.cursor.read_exact(&mut bytes).map_err(|e| self.eof(e))?;

        if !bytes.is_ascii() {
            return Err(Error::MalformedString(
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }

        // ASCII is always valid UTF-8
        String::from_utf8(bytes).map_err(|e| Error::MalformedString(e.to_string()))
    }

    /// Read a string where `"0"` means no value.
    pub fn read_nullable_string(&mut self) -> Result<Option<String>> {
        let value = self.read_string()?;
        Ok(if value == NULL_STRING { None } else { Some(value) })
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        let u = self.read_f32()?;
        let v = self.read_f32()?;
        Ok(Vec2::new(u, v))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        Ok(Vec3::new(x, y, z))
    }

    pub fn read_color(&mut self) -> Result<Color> {
        let r = self.read_f32()?;
        let g = self.read_f32()?;
        let b = self.read_f32()?;
        Ok(Color { r, g, b })
    }

    /// Read a transform stored as right, up, front, position.
    pub fn read_matrix34(&mut self) -> Result<Matrix34> {
        Ok(Matrix34 {
            right: self.read_vec3()?,
            up: self.read_vec3()?,
            front: self.read_vec3()?,
            position: self.read_vec3()?,
        })
    }

    /// Read `count` elements with `read_one`.
    pub fn read_array<T>(
        &mut self,
        count: usize,
        mut read_one: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        // Don't let a corrupt count reserve more than the buffer could hold
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(read_one(self)?);
        }
        Ok(items)
    }
}

/// Growable little-endian writer for SOD output.
#[derive(Default)]
pub(crate) struct SodWriter {
    buffer: Vec<u8>,
}

impl SodWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.write_u8(value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.buffer.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.buffer.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a `u16` element count, failing if `count` does not fit.
    pub fn write_count(&mut self, count: usize, what: &'static str) -> Result<()> {
        let count = u16::try_from(count).map_err(|_| Error::CollectionTooLarge { what, count })?;
        self.write_u16(count)
    }

    /// Write a length-prefixed ASCII string verbatim.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        if !value.is_ascii() {
            return Err(Error::MalformedString(value.to_string()));
        }
        let length = u16::try_from(value.len()).map_err(|_| Error::StringTooLong {
            length: value.len(),
        })?;
        self.write_u16(length)?;
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    /// Write a string where `None` becomes the `"0"` sentinel.
    pub fn write_nullable_string(&mut self, value: Option<&str>) -> Result<()> {
        self.write_string(value.unwrap_or(NULL_STRING))
    }

    pub fn write_vec2(&mut self, value: Vec2) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    pub fn write_color(&mut self, value: Color) -> Result<()> {
        self.write_f32(value.r)?;
        self.write_f32(value.g)?;
        self.write_f32(value.b)
    }

    pub fn write_matrix34(&mut self, value: &Matrix34) -> Result<()> {
        self.write_vec3(value.right)?;
        self.write_vec3(value.up)?;
        self.write_vec3(value.front)?;
        self.write_vec3(value.position)
    }
}
