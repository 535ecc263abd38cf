//! # StormSod
//!
//! A pure-Rust codec for the Storm3D Object Definition (`.sod`) model format
//! used by Star Trek: Armada I and II.
//!
//! ## Supported Versions
//!
//! Every revision above 1.6001 up to 1.93. Decoding and re-encoding a file
//! reproduces it byte for byte.
//!
//! ## Quick Start
//!
//! ### Reading a Model
//!
//! ```no_run
//! use stormsod::formats::sod::read_sod;
//!
//! let doc = read_sod("fbattle.sod")?;
//! println!("SOD version {}", doc.version);
//! for (node, mesh) in doc.meshes() {
//!     println!("{}: {} vertices", node.id, mesh.vertices.len());
//! }
//! # Ok::<(), stormsod::Error>(())
//! ```
//!
//! ### Round Trip
//!
//! ```
//! use stormsod::formats::sod::{decode, encode, SodDocument};
//!
//! let bytes = encode(&SodDocument::new())?;
//! let doc = decode(&bytes)?;
//! assert_eq!(encode(&doc)?, bytes);
//! # Ok::<(), stormsod::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use stormsod::prelude::*;
//!
//! // Now you have access to:
//! // - SodDocument, Node, Material, MeshPayload, AnimationChannel
//! // - decode, encode, read_sod, write_sod, DecodeOptions
//! // - Error, Result
//! ```

pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::sod::{
        AnimationChannel, AnimationType, Borgification, CullType, DecodeOptions, Keyframes,
        LightingModel, Material, Matrix34, MeshPayload, Node, NodePayload, NodeType,
        SignatureSearch, SodDocument, TextureReference, VertexLightingGroup, decode,
        decode_with_options, encode, read_sod, write_sod,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
