//! Version gating for optional SOD fields
//!
//! Every field whose presence depends on the format version is decided here.
//! Thresholds are compared in single precision against the `f32` stored in
//! the file, so `1.91` means the bit pattern `1.91f32`.

// Exact float comparisons are the point of this module
#![allow(clippy::float_cmp)]

/// Versions at or below this have no defined layout.
pub const MIN_VERSION_EXCLUSIVE: f32 = 1.6001;

/// Newest known revision.
pub const MAX_VERSION: f32 = 1.93;

/// Version written for newly assembled documents.
pub const DEFAULT_VERSION: f32 = MAX_VERSION;

const TEXTURE_MATERIAL_AFTER: f32 = 1.61;
const SELF_ILLUMINATION_AFTER: f32 = 1.8001;
const BORGIFICATION_AFTER: f32 = 1.9101;
const MESH_FILLER_AT: f32 = 1.91;

/// A version-dependent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatedField {
    /// Material self-illumination flag byte.
    SelfIllumination,
    /// Mesh texture-material name.
    TextureMaterial,
    /// Mesh filler `u32` and bump-map mode `u32`.
    BumpMap,
    /// Extra `u16` after the mesh texture name.
    TextureFiller,
    /// Mesh borgification sub-record.
    Borgification,
}

/// Whether `field` is stored in a file of the given version.
pub fn is_present(version: f32, field: GatedField) -> bool {
    match field {
        GatedField::SelfIllumination => version > SELF_ILLUMINATION_AFTER,
        GatedField::TextureMaterial => version > TEXTURE_MATERIAL_AFTER,
        GatedField::BumpMap | GatedField::Borgification => version > BORGIFICATION_AFTER,
        GatedField::TextureFiller => version == MESH_FILLER_AT,
    }
}

/// Whether a version has a defined data layout. NaN is never supported.
pub fn is_supported(version: f32) -> bool {
    version > MIN_VERSION_EXCLUSIVE
}

/// Whether a version is newer than any known revision.
pub fn is_newer_than_known(version: f32) -> bool {
    version > MAX_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_range() {
        assert!(!is_supported(1.6));
        assert!(!is_supported(1.6001));
        assert!(is_supported(1.7));
        assert!(is_supported(1.93));
        assert!(!is_supported(f32::NAN));
        assert!(is_newer_than_known(1.94));
        assert!(!is_newer_than_known(1.93));
    }

    #[test]
    fn test_self_illumination_gate() {
        assert!(!is_present(1.8, GatedField::SelfIllumination));
        assert!(!is_present(1.8001, GatedField::SelfIllumination));
        assert!(is_present(1.81, GatedField::SelfIllumination));
    }

    #[test]
    fn test_texture_material_gate() {
        assert!(!is_present(1.61, GatedField::TextureMaterial));
        assert!(is_present(1.7, GatedField::TextureMaterial));
    }

    #[test]
    fn test_filler_only_at_191() {
        assert!(is_present(1.91, GatedField::TextureFiller));
        assert!(!is_present(1.9101, GatedField::TextureFiller));
        assert!(!is_present(1.92, GatedField::TextureFiller));
        assert!(!is_present(1.9, GatedField::TextureFiller));
    }

    #[test]
    fn test_borgification_gate() {
        for version in [1.7, 1.8, 1.9, 1.91, 1.9101] {
            assert!(!is_present(version, GatedField::Borgification));
            assert!(!is_present(version, GatedField::BumpMap));
        }
        for version in [1.92, 1.93] {
            assert!(is_present(version, GatedField::Borgification));
            assert!(is_present(version, GatedField::BumpMap));
        }
    }
}
